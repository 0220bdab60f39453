//! `pizzeria-cli` — the interactive ordering session.
//!
//! The binary drives a login → main-menu loop over the store. All user
//! interaction goes through the [`prompt::Prompter`] seam so the flows are
//! testable with a scripted prompter.

pub mod flows;
pub mod prompt;
pub mod session;

pub use prompt::{ConsolePrompter, Prompter};
pub use session::SessionControl;
