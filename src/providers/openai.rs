use std::sync::Arc;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::transport::{OutboundRequest, Transport};

/// Logical model name -> OpenAI model ID
pub const OPENAI_MODELS: &[(&str, &str)] = &[
  ("gpt-4.1-mini", "gpt-4.1-mini")
, ("gpt-4.1-nano", "gpt-4.1-nano")
];

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenAiChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f64
  , pub max_tokens: u32
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAiErrorBody
{   error: Option<OpenAiErrorDetail>
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAiErrorDetail
{   message: Option<String>
}

/// Human-readable message for a failed call
pub fn error_message(status: u16, body: &str) -> String
{   serde_json::from_str::<OpenAiErrorBody>(body)
      .ok()
      .and_then(|b| b.error)
      .and_then(|e| e.message)
      .filter(|m| !m.is_empty())
      .unwrap_or_else(|| format!("OpenAI API error: {}", status))
}

// ===== OpenAI Client =====

/// Chat completions client; one call per prompt, no retry
pub struct OpenAiClient
{   api_key: Option<String>
  , api_base: String
  , transport: Arc<dyn Transport>
}

impl OpenAiClient
{   pub fn new(
      config: &crate::config::ProviderConfig
    , transport: Arc<dyn Transport>
    ) -> Self
    {   debug!("Creating OpenAiClient for {}", config.api_base);
        OpenAiClient
        {   api_key: config.api_key.clone()
          , api_base: config.api_base.trim_end_matches('/').to_string()
          , transport
        }
    }

    fn get_api_key(&self) -> Result<&str, crate::error::Error>
    {   self.api_key.as_deref().ok_or_else(|| {
          error!("No API key for OpenAI");
          crate::error::Error::MissingApiKey(
            crate::config::OPENAI_API_KEY_VAR
          )
        })
    }

    pub async fn generate(
      &self
    , prompt: &str
    , model_id: &str
    , temperature: f64
    , max_tokens: u32
    ) -> Result<String, crate::error::Error>
    {   let api_key = self.get_api_key()?;

        let request = OpenAiChatRequest
        {   model: model_id.to_string()
          , messages: vec![
              ChatMessage
              {   role: "user".to_string()
                , content: prompt.to_string()
              }
            ]
          , temperature
          , max_tokens
        };
        trace!("OpenAI request: {:?}", request);

        let reply = self.transport
          .post_json(OutboundRequest
          {   url: format!("{}/chat/completions", self.api_base)
            , headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", api_key))
              ]
            , body: serde_json::to_value(&request)?
          })
          .await?;

        if !reply.is_success()
        {   let message = error_message(reply.status, &reply.body);
            error!("OpenAI API error {}: {}", reply.status, message);
            if reply.status == 429
            {   return Err(crate::error::Error::RateLimitExceeded(message));
            }
            return Err(crate::error::Error::ApiError(message));
        }

        let chat_response: OpenAiChatResponse
          = serde_json::from_str(&reply.body).map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;

        chat_response.choices
          .into_iter()
          .next()
          .and_then(|c| c.message)
          .and_then(|m| m.content)
          .filter(|text| !text.is_empty())
          .ok_or_else(|| {
            error!("No text in OpenAI response");
            crate::error::Error::EmptyResponse
            {   provider: "OpenAI"
              , meta: None
            }
          })
    }
}
