//! LLM provider implementations

pub mod google;
pub mod openai;

// Re-export for convenience
pub use google::GoogleClient;
pub use openai::OpenAiClient;
