//! User interaction seam.
//!
//! Flows talk to a [`Prompter`] instead of stdin/stdout directly, which
//! keeps them testable with a scripted implementation.

use std::io::{self, BufRead, Write};

/// Interaction service for the menu-driven flows.
pub trait Prompter {
    /// Present numbered options under a title and return the chosen index.
    /// Re-prompts until a valid choice is entered.
    fn choose_one(&mut self, title: &str, options: &[String]) -> usize;

    /// Read a line of text; an empty entry returns `default`.
    fn read_text(&mut self, prompt: &str, default: &str) -> String;

    /// Yes/no question; an empty entry returns `default`.
    fn read_bool(&mut self, prompt: &str, default: bool) -> bool;

    /// Print a message to the user.
    fn say(&mut self, message: &str);
}

/// Stdin/stdout-backed prompter for the real session.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl ConsolePrompter {
    pub fn new() -> Self {
        Self
    }

    /// One line from stdin, trimmed. EOF ends the session like an explicit
    /// exit: farewell and status 0.
    fn read_line(&self) -> String {
        print!("> ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                println!("\n\nGoodbye!");
                std::process::exit(0);
            }
            Ok(_) => line.trim().to_string(),
        }
    }
}

impl Prompter for ConsolePrompter {
    fn choose_one(&mut self, title: &str, options: &[String]) -> usize {
        loop {
            println!("\n{title}");
            for (i, option) in options.iter().enumerate() {
                println!("[{}] {}", i + 1, option);
            }
            if let Ok(choice) = self.read_line().parse::<usize>() {
                if (1..=options.len()).contains(&choice) {
                    return choice - 1;
                }
            }
            println!("Invalid choice. Please try again.");
        }
    }

    fn read_text(&mut self, prompt: &str, default: &str) -> String {
        if default.is_empty() {
            println!("\n{prompt}");
        } else {
            println!("\n{prompt} [{default}]");
        }
        let line = self.read_line();
        if line.is_empty() {
            default.to_string()
        } else {
            line
        }
    }

    fn read_bool(&mut self, prompt: &str, default: bool) -> bool {
        let suffix = if default { "[Y/n]" } else { "[y/N]" };
        println!("\n{prompt} {suffix}");
        let line = self.read_line().to_lowercase();
        if default { line != "n" } else { line == "y" }
    }

    fn say(&mut self, message: &str) {
        println!("{message}");
    }
}

#[cfg(test)]
pub(crate) mod script {
    //! Scripted prompter for flow tests.

    use std::collections::VecDeque;

    use super::Prompter;

    #[derive(Debug, Clone)]
    pub enum Reply {
        Choice(usize),
        Text(String),
        Bool(bool),
    }

    /// Replays a fixed sequence of replies and records everything said.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        replies: VecDeque<Reply>,
        pub transcript: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
            Self {
                replies: replies.into_iter().collect(),
                transcript: Vec::new(),
            }
        }

        pub fn said(&self, needle: &str) -> bool {
            self.transcript.iter().any(|line| line.contains(needle))
        }

        fn next(&mut self, expected: &str) -> Reply {
            self.replies
                .pop_front()
                .unwrap_or_else(|| panic!("script exhausted, expected {expected}"))
        }
    }

    impl Prompter for ScriptedPrompter {
        fn choose_one(&mut self, title: &str, _options: &[String]) -> usize {
            match self.next("choice") {
                Reply::Choice(i) => i,
                other => panic!("expected Choice for {title:?}, got {other:?}"),
            }
        }

        fn read_text(&mut self, prompt: &str, default: &str) -> String {
            match self.next("text") {
                Reply::Text(s) if s.is_empty() => default.to_string(),
                Reply::Text(s) => s,
                other => panic!("expected Text for {prompt:?}, got {other:?}"),
            }
        }

        fn read_bool(&mut self, prompt: &str, _default: bool) -> bool {
            match self.next("bool") {
                Reply::Bool(b) => b,
                other => panic!("expected Bool for {prompt:?}, got {other:?}"),
            }
        }

        fn say(&mut self, message: &str) {
            self.transcript.push(message.to_string());
        }
    }
}
