//! Configuration for the gateway and its providers

use serde::{Deserialize, Serialize};
use log::{debug, warn};

pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

const GOOGLE_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";
const OPENAI_API_BASE: &str
  = "https://api.openai.com/v1";
const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig
{   /// Credential, read from the process environment only
    #[serde(skip_serializing)]
    pub api_key: Option<String>
  , /// API base URL
    pub api_base: String
}

impl ProviderConfig
{   pub fn google() -> Self
    {   ProviderConfig
        {   api_key: None
          , api_base: GOOGLE_API_BASE.to_string()
        }
    }

    pub fn openai() -> Self
    {   ProviderConfig
        {   api_key: None
          , api_base: OPENAI_API_BASE.to_string()
        }
    }

    /// Builder helper used by tests and embedders
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self
    {   self.api_key = Some(key.into());
        self
    }
}

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig
{   /// Address the HTTP server binds to
    pub bind: String
  , /// Wall-clock ceiling for one inbound request
    pub request_timeout_secs: u64
  , pub google: ProviderConfig
  , pub openai: ProviderConfig
}

impl Default for GatewayConfig
{   fn default() -> Self
    {   GatewayConfig
        {   bind: DEFAULT_BIND.to_string()
          , request_timeout_secs: DEFAULT_TIMEOUT_SECS
          , google: ProviderConfig::google()
          , openai: ProviderConfig::openai()
        }
    }
}

impl GatewayConfig
{   /// Load from the process environment
    pub fn from_env() -> Self
    {   Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load from any variable lookup; empty values count as unset
    pub fn from_vars<F>(lookup: F) -> Self
    where F: Fn(&str) -> Option<String>
    {   let get = |name: &str| {
          lookup(name).filter(|v| !v.trim().is_empty())
        };
        let mut config = GatewayConfig::default();

        config.google.api_key = get(GEMINI_API_KEY_VAR);
        config.openai.api_key = get(OPENAI_API_KEY_VAR);
        if let Some(base) = get("GOOGLE_API_BASE")
        {   config.google.api_base = base;
        }
        if let Some(base) = get("OPENAI_API_BASE")
        {   config.openai.api_base = base;
        }
        if let Some(bind) = get("ALLM_GATE_BIND")
        {   config.bind = bind;
        }
        if let Some(raw) = get("ALLM_GATE_TIMEOUT_SECS")
        {   match raw.trim().parse::<u64>()
            {   Ok(secs) if secs > 0 => {
                  config.request_timeout_secs = secs;
                }
              , _ => {
                  warn!(
                    "Ignoring invalid ALLM_GATE_TIMEOUT_SECS: {}",
                    raw
                  );
                }
            }
        }

        debug!(
          "Loaded config: bind={} timeout={}s google_key={} openai_key={}",
          config.bind,
          config.request_timeout_secs,
          config.google.api_key.is_some(),
          config.openai.api_key.is_some()
        );
        config
    }
}
