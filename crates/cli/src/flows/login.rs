//! Login and registration.

use pizzeria_auth::{User, hash_password, verify_password};
use pizzeria_store::{NewUser, Store, StoreResult, Users};

use crate::flows::{read_email, read_password, surface};
use crate::prompt::Prompter;

/// Loop until a user is authenticated. Every failed attempt starts over at
/// the account question.
pub async fn login_flow(store: &Store, prompter: &mut impl Prompter) -> StoreResult<User> {
    prompter.say("Welcome to the Pizza Ordering System!");
    let users = store.users();
    loop {
        let options = vec!["Yes".to_string(), "No".to_string()];
        let has_account = prompter.choose_one("Do you already have an account?", &options) == 0;
        let outcome = if has_account {
            login_once(&users, prompter).await?
        } else {
            register_once(&users, prompter).await?
        };
        if let Some(user) = outcome {
            return Ok(user);
        }
    }
}

async fn login_once(users: &Users, prompter: &mut impl Prompter) -> StoreResult<Option<User>> {
    let email = read_email(prompter, "Please enter your email:");
    let password = prompter.read_text("Please enter your password:", "");
    let Some(user) = users.find_by_email(&email).await? else {
        prompter.say("User does not exist. Try again!");
        return Ok(None);
    };
    if !verify_password(&password, &user.password_hash) {
        prompter.say("Incorrect password. Try again!");
        return Ok(None);
    }
    prompter.say("Login successful!");
    Ok(Some(user))
}

async fn register_once(users: &Users, prompter: &mut impl Prompter) -> StoreResult<Option<User>> {
    let first_name = prompter.read_text("Please enter your first name:", "");
    let last_name = prompter.read_text("Please enter your last name:", "");
    let email = read_email(prompter, "Please enter your email:");
    if users.find_by_email(&email).await?.is_some() {
        prompter.say("A user with this email already exists! Try again.");
        return Ok(None);
    }
    let password = read_password(prompter, "Please enter a password:");
    let repeat = prompter.read_text("Please repeat the password:", "");
    if repeat != password {
        prompter.say("Passwords do not match. Try again!");
        return Ok(None);
    }
    // Development convenience; the flag is stored but has no menu of its own.
    let is_admin = prompter.read_bool("!TEST! Create user as admin?", true);

    let new_user = NewUser {
        email,
        password_hash: hash_password(&password),
        first_name,
        last_name,
        is_admin,
    };
    // A concurrent registration can still race us to the unique email
    // constraint; that surfaces as Conflict and restarts the flow.
    let Some(user) = surface(users.create(&new_user).await, prompter)? else {
        return Ok(None);
    };
    prompter.say("Registration successful!");
    Ok(Some(user))
}
