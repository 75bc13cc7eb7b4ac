//! Outbound HTTP seam shared by both providers

use std::time::Duration;
use async_trait::async_trait;
use log::{debug, error, trace};

/// A JSON POST about to be sent to a provider
#[derive(Debug, Clone)]
pub struct OutboundRequest
{   pub url: String
  , pub headers: Vec<(String, String)>
  , pub body: serde_json::Value
}

/// Raw provider answer; status is not interpreted here
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply
{   pub status: u16
  , pub body: String
}

impl HttpReply
{   pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync
{   async fn post_json(
      &self
    , request: OutboundRequest
    ) -> Result<HttpReply, crate::error::Error>;
}

/// reqwest-backed transport
pub struct ReqwestTransport
{   http_client: reqwest::Client
}

impl ReqwestTransport
{   pub fn new(timeout: Option<Duration>)
      -> Result<Self, crate::error::Error>
    {   debug!("Creating ReqwestTransport, timeout={:?}", timeout);
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout
        {   builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::InvalidConfiguration(e.to_string())
        })?;
        Ok(ReqwestTransport { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport
{   async fn post_json(
      &self
    , request: OutboundRequest
    ) -> Result<HttpReply, crate::error::Error>
    {   trace!("POST {}", request.url);

        let mut builder = self.http_client
          .post(&request.url)
          .header("Content-Type", "application/json");
        for (name, value) in &request.headers
        {   builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
          .json(&request.body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            if e.is_timeout()
            {   crate::error::Error::Timeout
            } else
            {   crate::error::Error::HttpError(e.to_string())
            }
          })?;

        let status = response.status().as_u16();
        trace!("Response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          crate::error::Error::HttpError(e.to_string())
        })?;

        Ok(HttpReply { status, body })
    }
}
