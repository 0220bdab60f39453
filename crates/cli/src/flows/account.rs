//! Account management: password, name, deletion.

use pizzeria_auth::{User, hash_password};
use pizzeria_store::{Store, StoreResult, Users};

use crate::flows::{read_password, surface};
use crate::prompt::Prompter;
use crate::session::SessionControl;

/// The account menu. Deleting the account ends the session with a logout;
/// everything else returns to the main menu.
pub async fn account_flow(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<SessionControl> {
    let users = store.users();
    loop {
        let options: Vec<String> = ["Change password", "Change name", "Delete account", "Go back"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let title = format!("{}'s account", user.full_name());
        match prompter.choose_one(&title, &options) {
            0 => change_password(&users, prompter, user).await?,
            1 => change_name(&users, prompter, user).await?,
            2 => {
                if prompter.read_bool("Are you sure you want to delete your account?", false)
                    && surface(users.delete(user.id).await, prompter)?.is_some()
                {
                    prompter.say("Account deleted. Goodbye!");
                    return Ok(SessionControl::Logout);
                }
            }
            _ => return Ok(SessionControl::Continue),
        }
    }
}

async fn change_password(
    users: &Users,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<()> {
    loop {
        let password = read_password(prompter, "Enter your new password:");
        let repeat = prompter.read_text("Repeat the new password:", "");
        if repeat != password {
            prompter.say("Passwords do not match. Try again!");
            continue;
        }
        users.update_password(user.id, &hash_password(&password)).await?;
        prompter.say("Password changed successfully!");
        return Ok(());
    }
}

async fn change_name(users: &Users, prompter: &mut impl Prompter, user: &User) -> StoreResult<()> {
    let first_name = prompter.read_text("Enter your first name:", &user.first_name);
    let last_name = prompter.read_text("Enter your last name:", &user.last_name);
    users.update_name(user.id, &first_name, &last_name).await?;
    prompter.say("Name changed successfully! Log in again to see the change.");
    Ok(())
}
