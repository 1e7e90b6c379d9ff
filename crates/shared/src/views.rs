//! Views of the workspace shell.
//!
//! The only thing the assistant needs from a view is its label, which is
//! forwarded to the model as the request context.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppView {
    #[default]
    Dashboard,
    Docs,
    Sheets,
    Canvas,
    Presentations,
    Workflows,
    Projects,
    Drive,
    Chat,
    Calls,
    Email,
    ViewAll,
    Settings,
}

impl AppView {
    pub fn all() -> &'static [AppView] {
        &[
            AppView::Dashboard,
            AppView::Docs,
            AppView::Sheets,
            AppView::Canvas,
            AppView::Presentations,
            AppView::Workflows,
            AppView::Projects,
            AppView::Drive,
            AppView::Chat,
            AppView::Calls,
            AppView::Email,
            AppView::ViewAll,
            AppView::Settings,
        ]
    }

    /// Context label sent along with completion requests
    pub fn label(&self) -> &'static str {
        match self {
            AppView::Dashboard => "DASHBOARD",
            AppView::Docs => "DOCS",
            AppView::Sheets => "SHEETS",
            AppView::Canvas => "CANVAS",
            AppView::Presentations => "PRESENTATIONS",
            AppView::Workflows => "WORKFLOWS",
            AppView::Projects => "PROJECTS",
            AppView::Drive => "DRIVE",
            AppView::Chat => "CHAT",
            AppView::Calls => "CALLS",
            AppView::Email => "EMAIL",
            AppView::ViewAll => "VIEW_ALL",
            AppView::Settings => "SETTINGS",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AppView::Dashboard => "Dashboard",
            AppView::Docs => "Docs",
            AppView::Sheets => "Sheets",
            AppView::Canvas => "Canvas",
            AppView::Presentations => "Presentations",
            AppView::Workflows => "Workflows",
            AppView::Projects => "Projects",
            AppView::Drive => "Drive",
            AppView::Chat => "Chat",
            AppView::Calls => "Calls",
            AppView::Email => "Email",
            AppView::ViewAll => "View All",
            AppView::Settings => "Settings",
        }
    }

    /// Accepts either the label ("VIEW_ALL") or the display name ("view all").
    pub fn from_str(s: &str) -> Option<Self> {
        let wanted = s.trim().to_uppercase().replace([' ', '-'], "_");
        AppView::all().iter().copied().find(|v| v.label() == wanted)
    }
}
