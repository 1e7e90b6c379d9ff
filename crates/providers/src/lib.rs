pub mod gateway;
pub mod gemini;
pub mod transcript;

pub use gateway::{Completion, CompletionGateway, CompletionTransport, DEFAULT_CONTEXT};
pub use gemini::GeminiClient;
