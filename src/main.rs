use std::sync::Arc;
use log::{error, info};

#[tokio::main]
async fn main()
{   dotenv::dotenv().ok();
    env_logger::init();

    let config = allm_gate::GatewayConfig::from_env();
    info!(
      "Starting allm-gate (google key: {}, openai key: {})",
      config.google.api_key.is_some(),
      config.openai.api_key.is_some()
    );

    let gateway = match allm_gate::Gateway::new(&config)
    {   Ok(gateway) => Arc::new(gateway)
      , Err(e) => {
          error!("Failed to create gateway: {}", e);
          std::process::exit(1);
        }
    };

    if let Err(e) = allm_gate::server::serve(&config, gateway).await
    {   error!("Server error: {}", e);
        std::process::exit(1);
    }
}
