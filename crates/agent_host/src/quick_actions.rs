//! Prompt templates offered while the conversation is empty.

/// A canned prompt prefix the user completes before sending
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction {
        id: "image",
        label: "Create image",
        prompt: "Create an image of ",
    },
    QuickAction {
        id: "data",
        label: "Analyze data",
        prompt: "Analyze this data: ",
    },
    QuickAction {
        id: "plan",
        label: "Make a plan",
        prompt: "Create a project plan for ",
    },
    QuickAction {
        id: "summary",
        label: "Summarize",
        prompt: "Summarize the following text: ",
    },
];

pub fn find_quick_action(id: &str) -> Option<&'static QuickAction> {
    let id = id.trim().to_lowercase();
    QUICK_ACTIONS.iter().find(|a| a.id == id)
}
