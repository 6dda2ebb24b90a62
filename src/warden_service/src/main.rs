use color_eyre::eyre::Result;
use tokio::net::TcpListener;
use warden_adapters::GateSettings;
use warden_service::{AllowedOrigins, GatedService, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = GateSettings::load()?;
    let address = settings.server.address.clone();
    let allowed_origins: AllowedOrigins = settings.server.allowed_origins.iter().collect();

    let service = GatedService::from_settings(GatedService::default_router(), settings)?;

    let listener = TcpListener::bind(&address).await?;
    service
        .run_standalone(listener, Some(allowed_origins))
        .await?;

    Ok(())
}
