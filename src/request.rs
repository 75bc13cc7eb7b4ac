//! Inbound request and response envelope types

use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Body of `POST /api/llm`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest
{   /// The prompt text
    pub prompt: Option<String>
  , /// "google" or "openai"
    pub provider: Option<String>
  , /// Logical model name
    pub model: Option<String>
  , /// Temperature for sampling
    pub temperature: Option<f64>
  , /// Max tokens to generate; whole-valued floats such as `512.0` pass
    #[serde(default, deserialize_with = "whole_tokens")]
    pub max_tokens: Option<u32>
}

fn whole_tokens<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where D: Deserializer<'de>
{   match Option::<f64>::deserialize(deserializer)?
    {   None => Ok(None)
      , Some(v) if v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) => {
          Ok(Some(v as u32))
        }
      , Some(v) => Err(D::Error::custom(
          format!("maxTokens must be a non-negative whole number, got {}", v)
        ))
    }
}

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse
{   pub success: bool
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl GenerateResponse
{   pub fn ok(text: String) -> Self
    {   GenerateResponse
        {   success: true
          , text: Some(text)
          , error: None
        }
    }

    pub fn failure(error: impl Into<String>) -> Self
    {   GenerateResponse
        {   success: false
          , text: None
          , error: Some(error.into())
        }
    }
}

/// An envelope together with the HTTP status it goes out with
#[derive(Debug, Clone, PartialEq)]
pub struct Reply
{   pub status: u16
  , pub envelope: GenerateResponse
}

impl Reply
{   pub fn ok(text: String) -> Self
    {   Reply
        {   status: 200
          , envelope: GenerateResponse::ok(text)
        }
    }

    pub fn failure(status: u16, error: impl Into<String>) -> Self
    {   Reply
        {   status
          , envelope: GenerateResponse::failure(error)
        }
    }
}
