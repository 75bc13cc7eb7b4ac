//! Inbound request validation

use log::debug;
use crate::request::{GenerateRequest, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// A request that passed validation, defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest
{   pub prompt: String
  , pub provider: crate::Provider
  , pub model_id: &'static str
  , pub temperature: f64
  , pub max_tokens: u32
}

fn invalid(msg: impl Into<String>) -> crate::error::Error
{   crate::error::Error::InvalidRequest(msg.into())
}

/// Validate a raw request body.
///
/// Prompt and provider are checked on the raw JSON so their messages do
/// not depend on what the other fields contain.
pub fn validate_body(body: &[u8])
  -> Result<ValidRequest, crate::error::Error>
{   let value: serde_json::Value = serde_json::from_slice(body)
      .map_err(|e| {
        debug!("Rejecting non-JSON body: {}", e);
        invalid(format!("Invalid JSON body: {}", e))
      })?;

    let has_prompt = value.get("prompt")
      .and_then(|p| p.as_str())
      .map_or(false, |p| !p.is_empty());
    if !has_prompt
    {   return Err(invalid("Prompt is required"));
    }

    // provider errors name the value even when other fields are malformed
    match value.get("provider")
    {   None | Some(serde_json::Value::Null) => {
          return Err(invalid("Provider is required"));
        }
      , Some(serde_json::Value::String(name)) => {
          if crate::Provider::parse(name).is_none()
          {   return Err(invalid(format!("Unknown provider: {}", name)));
          }
        }
      , Some(other) => {
          return Err(invalid(format!("Unknown provider: {}", other)));
        }
    }

    let request: GenerateRequest = serde_json::from_value(value)
      .map_err(|e| invalid(format!("Invalid request: {}", e)))?;
    validate(request)
}

/// Validate an already decoded request
pub fn validate(request: GenerateRequest)
  -> Result<ValidRequest, crate::error::Error>
{   let prompt = match request.prompt
    {   Some(p) if !p.is_empty() => p
      , _ => return Err(invalid("Prompt is required"))
    };

    let provider = match request.provider.as_deref()
    {   None => return Err(invalid("Provider is required"))
      , Some(name) => crate::Provider::parse(name)
          .ok_or_else(|| invalid(format!("Unknown provider: {}", name)))?
    };

    let model_id = provider.resolve_model(request.model.as_deref())?;

    let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);
    if !temperature.is_finite()
    {   return Err(invalid("Temperature must be a finite number"));
    }

    let valid = ValidRequest
    {   prompt
      , provider
      , model_id
      , temperature
      , max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    };
    debug!(
      "Validated request provider={} model={} max_tokens={}",
      valid.provider, valid.model_id, valid.max_tokens
    );
    Ok(valid)
}
