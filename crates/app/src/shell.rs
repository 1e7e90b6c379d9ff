//! Line-oriented stand-in for the browser shell.

use shared::agent_api::{Message, Role};

pub const HELP: &str = "\
Commands:
  /view <name>   switch the current app view (docs, sheets, canvas, ...)
  /ask <prompt>  Ask AI from the current view
  /open /close /toggle   show or hide the assistant drawer
  /quick <id>    fill the input with a quick action (image, data, plan, summary)
  /reset         clear the conversation
  /help          show this text
  /quit          exit
Anything else is sent to the assistant.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(String),
    Ask(String),
    Open,
    Close,
    Toggle,
    Quick(String),
    Reset,
    Help,
    Quit,
    /// Text typed into the drawer's input box
    Send(String),
    Unknown(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim().to_string()),
            None => (rest, String::new()),
        };
        match name.to_lowercase().as_str() {
            "view" => Command::View(arg),
            "ask" => Command::Ask(arg),
            "open" => Command::Open,
            "close" => Command::Close,
            "toggle" => Command::Toggle,
            "quick" => Command::Quick(arg),
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Tracks how much of the log has been printed.
#[derive(Debug, Default)]
pub struct Transcript {
    shown: usize,
}

impl Transcript {
    pub fn clear(&mut self) {
        self.shown = 0;
    }

    /// Lines for messages not yet printed. A log shorter than what was
    /// printed means it was reset, so printing starts over.
    pub fn take_new(&mut self, messages: &[Message]) -> Vec<String> {
        if messages.len() < self.shown {
            self.shown = 0;
        }
        let lines = messages[self.shown..].iter().map(format_message).collect();
        self.shown = messages.len();
        lines
    }
}

pub fn format_message(m: &Message) -> String {
    let speaker = match m.role {
        Role::User => "You",
        Role::Model => "SyncSpace AI",
    };
    format!("[{}] {}: {}", m.formatted_time(), speaker, m.text)
}
