//! HTTP surface

use std::collections::BTreeMap;
use std::sync::Arc;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, error};

use crate::request::GenerateResponse;

/// Build the router over a shared gateway
pub fn router(gateway: Arc<crate::gateway::Gateway>) -> Router
{   Router::new()
      .route("/api/llm", post(generate))
      .route("/api/llm/models", get(list_models))
      .route("/healthz", get(healthz))
      .with_state(gateway)
}

async fn generate(
  State(gateway): State<Arc<crate::gateway::Gateway>>
, body: Bytes
) -> (StatusCode, Json<GenerateResponse>)
{   let reply = gateway.handle(&body).await;
    let status = StatusCode::from_u16(reply.status)
      .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.envelope))
}

async fn list_models() -> Json<BTreeMap<&'static str, Vec<&'static str>>>
{   let models = crate::Provider::ALL
      .iter()
      .map(|p| {
        let names = p.models()
          .iter()
          .map(|(name, _)| *name)
          .collect::<Vec<_>>();
        (p.as_str(), names)
      })
      .collect();
    Json(models)
}

async fn healthz() -> StatusCode
{   StatusCode::OK
}

/// Bind and serve until ctrl-c
pub async fn serve(
  config: &crate::config::GatewayConfig
, gateway: Arc<crate::gateway::Gateway>
) -> Result<(), crate::error::Error>
{   let listener = tokio::net::TcpListener::bind(&config.bind)
      .await
      .map_err(|e| {
        error!("Failed to bind {}: {}", config.bind, e);
        crate::error::Error::InvalidConfiguration(
          format!("cannot bind {}: {}", config.bind, e)
        )
      })?;
    info!("allm-gate listening on {}", config.bind);

    axum::serve(listener, router(gateway))
      .with_graceful_shutdown(wait_for_shutdown(tokio::signal::ctrl_c()))
      .await
      .map_err(|e| crate::error::Error::Other(e.to_string()))
}

/// Resolve when `signal` fires. If the signal handler could not be
/// installed this never resolves, so the server keeps running.
pub async fn wait_for_shutdown<F>(signal: F)
where F: std::future::Future<Output = std::io::Result<()>>
{   match signal.await
    {   Ok(()) => info!("Shutting down")
      , Err(e) => {
          error!("Cannot listen for ctrl-c, running until killed: {}", e);
          std::future::pending::<()>().await;
        }
    }
}
