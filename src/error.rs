use std::fmt;

/// Marker the providers put in rate-limit error messages
const RATE_LIMIT_MARKER: &str = "429";

/// Custom error type for gateway operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing for a provider (names the env variable)
    MissingApiKey(&'static str)
  , /// Inbound request failed validation
    InvalidRequest(String)
  , /// HTTP transport error
    HttpError(String)
  , /// Provider answered with a non-success status
    ApiError(String)
  , /// Provider answered with HTTP 429
    RateLimitExceeded(String)
  , /// Failed to parse or build a JSON payload
    ParseError(String)
  , /// Prompt rejected by the provider's safety filter
    Blocked(String)
  , /// Provider answered without any usable text
    EmptyResponse
    {   provider: &'static str
      , meta: Option<String>
    }
  , /// Truncation retries used up without text
    RetriesExhausted
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Timeout error
    Timeout
  , /// Generic error
    Other(String)
}

impl Error
{   /// Whether this error should be reported as rate limiting.
    ///
    /// Besides a real HTTP 429 this also matches any message that merely
    /// contains "429", which is loose but is what callers rely on.
    pub fn is_rate_limited(&self) -> bool
    {   match self
        {   Error::RateLimitExceeded(_) => true
          , other => other.to_string().contains(RATE_LIMIT_MARKER)
        }
    }

    /// HTTP status code the envelope is sent with
    pub fn status_code(&self) -> u16
    {   if let Error::InvalidRequest(_) = self
        {   return 400;
        }
        if self.is_rate_limited()
        {   return 429;
        }
        500
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(var) => {
              write!(f, "{} not configured", var)
            }
          , Error::InvalidRequest(msg) => {
              write!(f, "{}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError(msg) => {
              write!(f, "{}", msg)
            }
          , Error::RateLimitExceeded(msg) => {
              write!(f, "{}", msg)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::Blocked(reason) => {
              write!(f,
                "Google AI blocked the request ({})",
                reason
              )
            }
          , Error::EmptyResponse { provider, meta } => {
              match meta
              {   Some(meta) => write!(f,
                    "No text in {} response ({})",
                    provider, meta
                  )
                , None => write!(f,
                    "No text in {} response",
                    provider
                  )
              }
            }
          , Error::RetriesExhausted => {
              write!(f,
                "No text in Google AI response (exhausted retries)"
              )
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Other(msg) => {
              write!(f, "{}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::Other(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::Other(s.to_string())
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}
