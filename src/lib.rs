pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod retry;
pub mod transport;
pub mod validate;
pub mod gateway;
pub mod server;
use serde::{Deserialize, Serialize};

/*

allm-gate: one HTTP endpoint that takes a prompt, forwards it to the
chosen LLM provider and always answers with the same envelope:

  POST /api/llm  { prompt, provider, model?, temperature?, maxTokens? }
    -> 200 { success: true,  text }
    -> 400 { success: false, error }   bad input
    -> 429 { success: false, error }   provider rate limit
    -> 500 { success: false, error }   everything else

src/
├── lib.rs          # Provider enum, re-exports
├── error.rs        # Error type and status mapping
├── config.rs       # Env-driven configuration
├── request.rs      # Inbound request / envelope types
├── validate.rs     # Input validation
├── retry.rs        # Truncation retry budget
├── transport.rs    # Outbound HTTP seam
├── gateway.rs      # Dispatch + error translation
├── server.rs       # axum routes
└── providers/
    ├── google.rs   # generateContent + text extraction
    └── openai.rs   # chat completions

*/

pub use error::Error;
pub use config::{GatewayConfig, ProviderConfig};
pub use gateway::Gateway;
pub use request::{GenerateRequest, GenerateResponse, Reply};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider
{   /// Google (AI Studio: Gemini)
    Google
  , /// OpenAI (GPT-4.1 family)
    OpenAI
}

impl Provider
{   pub const ALL: [Provider; 2] = [Provider::Google, Provider::OpenAI];

    /// Parse the wire name; `None` for anything unsupported
    pub fn parse(name: &str) -> Option<Provider>
    {   match name
        {   "google" => Some(Provider::Google)
          , "openai" => Some(Provider::OpenAI)
          , _ => None
        }
    }

    pub fn as_str(&self) -> &'static str
    {   match self
        {   Provider::Google => "google"
          , Provider::OpenAI => "openai"
        }
    }

    /// Logical model name -> provider model ID table
    pub fn models(&self) -> &'static [(&'static str, &'static str)]
    {   match self
        {   Provider::Google => providers::google::GOOGLE_MODELS
          , Provider::OpenAI => providers::openai::OPENAI_MODELS
        }
    }

    /// Resolve a logical model name. `None` picks the provider default,
    /// unknown names are rejected.
    pub fn resolve_model(
      &self
    , model: Option<&str>
    ) -> Result<&'static str, Error>
    {   let table = self.models();
        match model
        {   None => table.first()
              .map(|(_, id)| *id)
              .ok_or_else(|| Error::InvalidConfiguration(
                format!("no models for {}", self.as_str())
              ))
          , Some(name) => table.iter()
              .find(|(logical, _)| *logical == name)
              .map(|(_, id)| *id)
              .ok_or_else(|| Error::InvalidRequest(
                format!("Unknown model for {}: {}", self.as_str(), name)
              ))
        }
    }
}

impl std::fmt::Display for Provider
{   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {   f.write_str(self.as_str())
    }
}
