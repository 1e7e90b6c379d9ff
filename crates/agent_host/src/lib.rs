//! Agent Host - the assistant drawer of the workspace shell
//!
//! This crate provides:
//! - The conversation log and the controller that mediates gateway calls
//! - The drawer state driving it (visibility, seed prompt, input buffer)
//! - Quick-action prompt templates

pub mod conversation;
pub mod drawer;
pub mod quick_actions;

pub use conversation::{Conversation, ConversationController, PendingTurn, SubmitOutcome};
pub use drawer::AssistantDrawer;
pub use quick_actions::{find_quick_action, QuickAction, QUICK_ACTIONS};
