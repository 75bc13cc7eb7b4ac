use std::sync::Arc;
use serde::{Deserialize, Serialize};
use log::{debug, trace, error, warn};

use crate::retry::RetryPolicy;
use crate::transport::{OutboundRequest, Transport};

const PROVIDER_LABEL: &str = "Google AI";
const FINISH_MAX_TOKENS: &str = "MAX_TOKENS";

/// Logical model name -> Gemini model ID
pub const GOOGLE_MODELS: &[(&str, &str)] = &[
  ("gemini-2.5-flash", "gemini-2.5-flash")
, ("gemini-3-pro-preview", "gemini-3-pro-preview")
];

// ===== Request Types =====

#[derive(Debug, Clone, Serialize)]
pub struct GeminiRequest
{   pub contents: Vec<Content>
  , #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   pub temperature: f64
  , pub max_output_tokens: u32
}

// ===== Response Types =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>
  , #[serde(default)]
    pub parts: Vec<Part>
}

/// A content part; non-text parts deserialize with `text: None`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part
{   #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback
{   #[serde(default)]
    pub block_reason: Option<String>
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
  , #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>
  , /// Flattened text some SDK-style proxies add at the top level
    #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorBody
{   error: Option<GeminiErrorDetail>
}

#[derive(Debug, Clone, Deserialize)]
struct GeminiErrorDetail
{   message: Option<String>
}

/// Human-readable message for a failed call; never echoes the raw body
pub fn error_message(status: u16, body: &str) -> String
{   serde_json::from_str::<GeminiErrorBody>(body)
      .ok()
      .and_then(|b| b.error)
      .and_then(|e| e.message)
      .filter(|m| !m.is_empty())
      .map(|m| format!("{} error {}: {}", PROVIDER_LABEL, status, m))
      .unwrap_or_else(|| format!("{} error {}", PROVIDER_LABEL, status))
}

// ===== Extraction =====

/// What a generateContent response amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction
{   /// Usable text (trimmed)
    Text(String)
  , /// Generation stopped at the token ceiling
    Truncated
    {   block_reason: Option<String>
    }
  , /// Prompt rejected by safety filtering
    Blocked
    {   block_reason: String
      , finish_reason: Option<String>
    }
  , /// No text and nothing that explains why
    Empty
    {   finish_reason: Option<String>
    }
}

impl Extraction
{   /// "finish reason: X; prompt blocked: Y", or `None` if both absent
    pub fn meta(&self) -> Option<String>
    {   let (finish, block) = match self
        {   Extraction::Text(_) => return None
          , Extraction::Truncated { block_reason } => {
              (Some(FINISH_MAX_TOKENS), block_reason.as_deref())
            }
          , Extraction::Blocked { block_reason, finish_reason } => {
              (finish_reason.as_deref(), Some(block_reason.as_str()))
            }
          , Extraction::Empty { finish_reason } => {
              (finish_reason.as_deref(), None)
            }
        };
        let parts: Vec<String> = [
            finish.map(|r| format!("finish reason: {}", r))
          , block.map(|r| format!("prompt blocked: {}", r))
          ]
          .into_iter()
          .flatten()
          .collect();
        if parts.is_empty()
        {   None
        } else
        {   Some(parts.join("; "))
        }
    }

    /// Error for an outcome that will not be retried
    pub fn into_error(self) -> crate::error::Error
    {   let meta = self.meta();
        match self
        {   Extraction::Blocked { block_reason, .. }
          | Extraction::Truncated { block_reason: Some(block_reason) } => {
              crate::error::Error::Blocked(block_reason)
            }
          , _ => crate::error::Error::EmptyResponse
            {   provider: PROVIDER_LABEL
              , meta
            }
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<String>
{   value
      .map(|s| s.trim())
      .filter(|s| !s.is_empty())
      .map(str::to_string)
}

/// Classify a decoded response
pub fn extract_text(response: &GeminiResponse) -> Extraction
{   for candidate in &response.candidates
    {   let Some(content) = &candidate.content else { continue };
        let combined: String = content.parts
          .iter()
          .filter_map(|p| p.text.as_deref())
          .collect();
        let combined = combined.trim();
        if !combined.is_empty()
        {   return Extraction::Text(combined.to_string());
        }
    }

    if let Some(text) = non_empty(response.text.as_ref())
    {   return Extraction::Text(text);
    }

    let finish_reason = response.candidates
      .first()
      .and_then(|c| non_empty(c.finish_reason.as_ref()));
    let block_reason = response.prompt_feedback
      .as_ref()
      .and_then(|f| non_empty(f.block_reason.as_ref()));

    match (finish_reason, block_reason)
    {   (Some(finish), block_reason) if finish == FINISH_MAX_TOKENS => {
          Extraction::Truncated { block_reason }
        }
      , (finish_reason, Some(block_reason)) => {
          Extraction::Blocked { block_reason, finish_reason }
        }
      , (finish_reason, None) => Extraction::Empty { finish_reason }
    }
}

// ===== Google Client =====

/// generateContent client with truncation retry
pub struct GoogleClient
{   api_key: Option<String>
  , api_base: String
  , policy: RetryPolicy
  , transport: Arc<dyn Transport>
}

impl GoogleClient
{   pub fn new(
      config: &crate::config::ProviderConfig
    , transport: Arc<dyn Transport>
    ) -> Self
    {   debug!("Creating GoogleClient for {}", config.api_base);
        GoogleClient
        {   api_key: config.api_key.clone()
          , api_base: config.api_base.trim_end_matches('/').to_string()
          , policy: RetryPolicy::default()
          , transport
        }
    }

    fn get_api_key(&self) -> Result<&str, crate::error::Error>
    {   self.api_key.as_deref().ok_or_else(|| {
          error!("No API key for Google");
          crate::error::Error::MissingApiKey(
            crate::config::GEMINI_API_KEY_VAR
          )
        })
    }

    /// Generate text, retrying once with a bigger budget on truncation
    pub async fn generate(
      &self
    , prompt: &str
    , model_id: &str
    , temperature: f64
    , max_tokens: u32
    ) -> Result<String, crate::error::Error>
    {   let api_key = self.get_api_key()?;
        let mut budget = self.policy.initial_budget(max_tokens);

        for attempt in 1..=self.policy.max_attempts
        {   debug!(
              "Google attempt {}/{} model={} budget={}",
              attempt, self.policy.max_attempts, model_id, budget
            );
            let (response, raw) = self
              .generate_content(api_key, prompt, model_id, temperature, budget)
              .await?;

            let extraction = match extract_text(&response)
            {   Extraction::Text(text) => return Ok(text)
              , other => other
            };

            if let Extraction::Truncated { .. } = extraction
            {   if let Some(next) = self.policy.next_budget(budget)
                {   warn!(
                      "Google response truncated at {} tokens, retrying",
                      budget
                    );
                    budget = next;
                    continue;
                }
            }

            debug!("Google AI empty response: {}", raw);
            return Err(extraction.into_error());
        }

        error!("Google retries exhausted");
        Err(crate::error::Error::RetriesExhausted)
    }

    async fn generate_content(
      &self
    , api_key: &str
    , prompt: &str
    , model_id: &str
    , temperature: f64
    , max_output_tokens: u32
    ) -> Result<(GeminiResponse, String), crate::error::Error>
    {   let request = GeminiRequest
        {   contents: vec![
              Content
              {   role: Some("user".to_string())
                , parts: vec![Part { text: Some(prompt.to_string()) }]
              }
            ]
          , generation_config: GenerationConfig
            {   temperature
              , max_output_tokens
            }
        };
        trace!("Gemini request: {:?}", request);

        let reply = self.transport
          .post_json(OutboundRequest
          {   url: format!(
                "{}/models/{}:generateContent",
                self.api_base, model_id
              )
            , headers: vec![
                ("x-goog-api-key".to_string(), api_key.to_string())
              ]
            , body: serde_json::to_value(&request)?
          })
          .await?;

        if !reply.is_success()
        {   let message = error_message(reply.status, &reply.body);
            error!("{}", message);
            if reply.status == 429
            {   return Err(crate::error::Error::RateLimitExceeded(message));
            }
            return Err(crate::error::Error::ApiError(message));
        }

        let response: GeminiResponse
          = serde_json::from_str(&reply.body).map_err(|e| {
            error!("Parse error: {}", e);
            crate::error::Error::ParseError(e.to_string())
          })?;
        Ok((response, reply.body))
    }
}
