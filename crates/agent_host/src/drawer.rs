//! Slide-in assistant drawer.
//!
//! Holds the host-side state around a [`ConversationController`]: whether
//! the drawer is visible, the text being typed and the view whose label is
//! sent as context. Prompts handed over by an "Ask AI" button seed a fresh
//! conversation as the drawer opens.

use crate::conversation::{ConversationController, SubmitOutcome};
use crate::quick_actions::find_quick_action;
use shared::views::AppView;

pub struct AssistantDrawer {
    controller: ConversationController,
    open: bool,
    view: AppView,
    input: String,
}

impl AssistantDrawer {
    pub fn new(controller: ConversationController) -> Self {
        Self {
            controller,
            open: false,
            view: AppView::default(),
            input: String::new(),
        }
    }

    pub fn controller(&self) -> &ConversationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ConversationController {
        &mut self.controller
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn view(&self) -> AppView {
        self.view
    }

    pub fn set_view(&mut self, view: AppView) {
        self.view = view;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Show the drawer. Never sends anything by itself.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the drawer, keeping the conversation.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Hand a prompt to the assistant from elsewhere in the shell.
    ///
    /// A hidden drawer starts a fresh conversation seeded with `prompt`; a
    /// visible one sends it as an ordinary message.
    pub fn ask_ai(&mut self, prompt: &str) -> SubmitOutcome {
        if prompt.trim().is_empty() {
            return SubmitOutcome::Blank;
        }
        if self.open {
            return self.controller.submit(prompt, Some(self.view.label()));
        }
        tracing::debug!(view = self.view.label(), "opening drawer with a seed prompt");
        self.controller.reset();
        self.open = true;
        self.controller.seed(prompt, Some(self.view.label()))
    }

    /// Replace the input buffer with a quick-action template.
    pub fn apply_quick_action(&mut self, id: &str) -> bool {
        match find_quick_action(id) {
            Some(action) => {
                self.input = action.prompt.to_string();
                true
            }
            None => false,
        }
    }

    /// Send the input buffer, clearing it only if the message went out.
    pub fn send_input(&mut self) -> SubmitOutcome {
        let outcome = self.controller.submit(&self.input, Some(self.view.label()));
        if outcome.is_sent() {
            self.input.clear();
        }
        outcome
    }

    /// Zero-state text, shown only while the conversation is empty.
    pub fn greeting(&self, name: &str) -> Option<String> {
        if !self.controller.messages().is_empty() {
            return None;
        }
        Some(format!("Hi {}, welcome back! How can I help?", name))
    }
}
