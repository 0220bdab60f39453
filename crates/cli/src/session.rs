//! Session driver: login, main menu, logout/exit control flow.

use pizzeria_auth::User;
use pizzeria_store::{Store, StoreResult};

use crate::flows;
use crate::prompt::Prompter;

/// How a menu iteration ends. Returned up through the nested menu loops
/// rather than unwinding them from below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    /// Stay in the current menu.
    Continue,
    /// Return to the login screen.
    Logout,
    /// Terminate the session.
    Exit,
}

/// Run login → main menu until the user exits.
pub async fn run(store: &Store, prompter: &mut impl Prompter) -> StoreResult<()> {
    loop {
        let user = flows::login::login_flow(store, prompter).await?;
        loop {
            match main_menu(store, prompter, &user).await? {
                SessionControl::Continue => {}
                SessionControl::Logout => break,
                SessionControl::Exit => {
                    prompter.say("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    }
}

async fn main_menu(
    store: &Store,
    prompter: &mut impl Prompter,
    user: &User,
) -> StoreResult<SessionControl> {
    let options: Vec<String> = ["Account", "Order", "View past orders", "Logout", "Exit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let title = format!("Hello {}, what would you like to do?", user.first_name);

    match prompter.choose_one(&title, &options) {
        0 => flows::account::account_flow(store, prompter, user).await,
        1 => {
            flows::order::order_flow(store, prompter, user).await?;
            Ok(SessionControl::Continue)
        }
        2 => {
            flows::history::history_flow(store, prompter, user).await?;
            Ok(SessionControl::Continue)
        }
        3 => Ok(SessionControl::Logout),
        _ => Ok(SessionControl::Exit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::script::{Reply, ScriptedPrompter};

    #[tokio::test]
    async fn register_then_exit_ends_the_session() {
        let store = Store::open_in_memory().await.expect("open in-memory store");
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(1), // register
            Reply::Text("Ola".into()),
            Reply::Text("Strand".into()),
            Reply::Text("ola@example.com".into()),
            Reply::Text("password123".into()),
            Reply::Text("password123".into()),
            Reply::Bool(false),
            Reply::Choice(4), // main menu: exit
        ]);
        run(&store, &mut prompter).await.unwrap();
        assert!(prompter.said("Registration successful!"));
        assert!(prompter.said("\nGoodbye!"));
    }

    #[tokio::test]
    async fn logout_returns_to_the_login_screen() {
        let store = Store::open_in_memory().await.expect("open in-memory store");
        let mut prompter = ScriptedPrompter::new([
            Reply::Choice(1),
            Reply::Text("Ida".into()),
            Reply::Text("Vik".into()),
            Reply::Text("ida@example.com".into()),
            Reply::Text("password123".into()),
            Reply::Text("password123".into()),
            Reply::Bool(false),
            Reply::Choice(3), // logout
            Reply::Choice(0), // log back in
            Reply::Text("ida@example.com".into()),
            Reply::Text("password123".into()),
            Reply::Choice(4), // exit
        ]);
        run(&store, &mut prompter).await.unwrap();
        assert!(prompter.said("Login successful!"));
        assert!(prompter.said("\nGoodbye!"));
    }
}
