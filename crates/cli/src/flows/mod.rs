//! Interactive flows over the store.
//!
//! Recoverable domain failures are spoken to the user and the flow carries
//! on; infrastructure failures propagate to the session driver.

pub mod account;
pub mod history;
pub mod login;
pub mod order;

use pizzeria_auth::validate_password;
use pizzeria_store::{StoreError, StoreResult};

use crate::prompt::Prompter;

/// Unwrap a store result, speaking domain failures to the user.
/// `Ok(None)` means "told the user, carry on".
pub(crate) fn surface<T>(
    result: Result<T, StoreError>,
    prompter: &mut impl Prompter,
) -> StoreResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) => match err.as_domain() {
            Some(domain) => {
                prompter.say(&domain.to_string());
                Ok(None)
            }
            None => Err(err),
        },
    }
}

/// Prompt until a syntactically valid email is entered.
pub(crate) fn read_email(prompter: &mut impl Prompter, prompt: &str) -> String {
    loop {
        let email = prompter.read_text(prompt, "");
        if pizzeria_auth::validate_email(&email).is_ok() {
            return email;
        }
        prompter.say("Invalid email. Please try again.");
    }
}

/// Prompt until a long-enough password is entered.
pub(crate) fn read_password(prompter: &mut impl Prompter, prompt: &str) -> String {
    loop {
        let password = prompter.read_text(prompt, "");
        if validate_password(&password).is_ok() {
            return password;
        }
        prompter.say("Password must be at least 8 characters long.");
    }
}
