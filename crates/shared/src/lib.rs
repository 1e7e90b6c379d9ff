pub mod error;
pub mod views;

pub mod settings {
    use anyhow::{Context, Result};
    use serde::{Deserialize, Serialize};
    use std::path::Path;

    pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
    pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

    fn default_gemini_model() -> String {
        DEFAULT_GEMINI_MODEL.to_string()
    }

    fn default_gemini_endpoint() -> String {
        DEFAULT_GEMINI_ENDPOINT.to_string()
    }

    fn default_user_name() -> String {
        "there".to_string()
    }

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ProviderAuth {
        pub api_key: Option<String>,
    }

    impl ProviderAuth {
        /// The configured key, if it is non-blank.
        pub fn credential(&self) -> Option<&str> {
            self.api_key
                .as_deref()
                .map(str::trim)
                .filter(|k| !k.is_empty())
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct GeminiSettings {
        #[serde(default = "default_gemini_model")]
        pub model: String, // e.g., "gemini-2.5-flash"
        #[serde(default = "default_gemini_endpoint")]
        pub endpoint: String,
        #[serde(default)]
        pub auth: ProviderAuth,
    }

    impl Default for GeminiSettings {
        fn default() -> Self {
            Self {
                model: default_gemini_model(),
                endpoint: default_gemini_endpoint(),
                auth: ProviderAuth::default(),
            }
        }
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AppSettings {
        #[serde(default)]
        pub gemini: GeminiSettings,
        /// Name used in the assistant greeting
        #[serde(default = "default_user_name")]
        pub user_name: String,
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                gemini: GeminiSettings::default(),
                user_name: default_user_name(),
            }
        }
    }

    impl AppSettings {
        pub fn load_from(path: &Path) -> Result<Self> {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            let settings = serde_json::from_str(&contents)
                .with_context(|| format!("parsing settings in {}", path.display()))?;
            Ok(settings)
        }

        /// Replace the Gemini key when `key` is present and non-blank.
        pub fn override_credential(&mut self, key: Option<String>) {
            if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
                self.gemini.auth.api_key = Some(key);
            }
        }
    }
}

pub mod agent_api {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Model,
    }

    impl Role {
        /// Prefix used when a transcript is flattened into plain text.
        pub fn speaker(&self) -> &'static str {
            match self {
                Role::User => "User",
                Role::Model => "Assistant",
            }
        }
    }

    /// One turn of an assistant conversation
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Message {
        pub id: Uuid,
        pub role: Role,
        pub text: String,
        pub timestamp: DateTime<Utc>,
    }

    impl Message {
        pub fn new(role: Role, text: impl Into<String>) -> Self {
            Self {
                id: Uuid::new_v4(),
                role,
                text: text.into(),
                timestamp: Utc::now(),
            }
        }

        pub fn user(text: impl Into<String>) -> Self {
            Self::new(Role::User, text)
        }

        pub fn model(text: impl Into<String>) -> Self {
            Self::new(Role::Model, text)
        }

        /// Format timestamp for display
        pub fn formatted_time(&self) -> String {
            self.timestamp.format("%H:%M").to_string()
        }
    }

    /// The gateway's view of a prior message
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Turn {
        pub role: Role,
        pub text: String,
    }

    impl From<&Message> for Turn {
        fn from(m: &Message) -> Self {
            Self {
                role: m.role,
                text: m.text.clone(),
            }
        }
    }

    /// A fully assembled request for the completion endpoint
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CompletionRequest {
        pub model: String,
        pub system_instruction: String,
        pub prompt: String,
    }
}
