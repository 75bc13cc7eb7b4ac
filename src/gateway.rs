//! Request dispatch and error translation

use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, info};

use crate::providers::{GoogleClient, OpenAiClient};
use crate::request::Reply;
use crate::transport::{ReqwestTransport, Transport};
use crate::validate::{validate_body, ValidRequest};

pub const RATE_LIMIT_MESSAGE: &str
  = "Rate limit reached. Please wait and try again.";
const GENERIC_FAILURE_MESSAGE: &str = "LLM generation failed";

/// Stateless request handler; safe to share across tasks
pub struct Gateway
{   google: GoogleClient
  , openai: OpenAiClient
  , timeout: Duration
}

impl Gateway
{   /// Build with the reqwest transport
    pub fn new(config: &crate::config::GatewayConfig)
      -> Result<Self, crate::error::Error>
    {   let transport = ReqwestTransport::new(
          Some(Duration::from_secs(config.request_timeout_secs))
        )?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build over any transport
    pub fn with_transport(
      config: &crate::config::GatewayConfig
    , transport: Arc<dyn Transport>
    ) -> Self
    {   debug!("Creating Gateway");
        Gateway
        {   google: GoogleClient::new(&config.google, transport.clone())
          , openai: OpenAiClient::new(&config.openai, transport)
          , timeout: Duration::from_secs(config.request_timeout_secs)
        }
    }

    /// Handle one raw `POST /api/llm` body
    pub async fn handle(&self, body: &[u8]) -> Reply
    {   let request = match validate_body(body)
        {   Ok(request) => request
          , Err(e) => {
              debug!("Rejected request: {}", e);
              return Reply::failure(e.status_code(), e.to_string());
            }
        };

        match self.generate(&request).await
        {   Ok(text) => {
              info!(
                "Generated {} chars via {}",
                text.len(), request.provider
              );
              Reply::ok(text)
            }
          , Err(e) => translate_error(&e)
        }
    }

    /// Run the provider call under the request deadline
    pub async fn generate(
      &self
    , request: &ValidRequest
    ) -> Result<String, crate::error::Error>
    {   let call = async {
          match request.provider
          {   crate::Provider::Google => {
                self.google.generate(
                  &request.prompt,
                  request.model_id,
                  request.temperature,
                  request.max_tokens
                ).await
              }
            , crate::Provider::OpenAI => {
                self.openai.generate(
                  &request.prompt,
                  request.model_id,
                  request.temperature,
                  request.max_tokens
                ).await
              }
          }
        };

        tokio::time::timeout(self.timeout, call)
          .await
          .unwrap_or(Err(crate::error::Error::Timeout))
    }
}

/// Map a generation failure onto the envelope
pub fn translate_error(e: &crate::error::Error) -> Reply
{   error!("LLM generation error: {}", e);

    let status = e.status_code();
    if status == 429
    {   return Reply::failure(429, RATE_LIMIT_MESSAGE);
    }

    let message = e.to_string();
    if message.is_empty()
    {   Reply::failure(status, GENERIC_FAILURE_MESSAGE)
    } else
    {   Reply::failure(status, message)
    }
}
