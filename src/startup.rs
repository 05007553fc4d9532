use crate::components::calendar::GoogleCalendarClient;
use crate::components::google_auth::{GoogleApi, TokenManager};
use crate::components::report::Generator;
use crate::components::spreadsheet::GoogleSheetsClient;
use crate::components::storage::GoogleDriveClient;
use crate::components::triggers::RedisTriggerStore;
use crate::components::Services;
use crate::config::Config;
use crate::error::{Error, SummaryResult};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config once for the whole process
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Loaded configuration: anchor day {}, timezone {}, filter {}",
                config.anchor_day,
                config.timezone,
                config.calendar_filter.as_str()
            );
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Google and Redis backed platform services
pub fn google_services(config: &Config) -> SummaryResult<Services> {
    let api = GoogleApi::new(TokenManager::new(config)?);

    Ok(Services::new(
        Arc::new(GoogleCalendarClient::new(api.clone(), config.timezone)),
        Arc::new(GoogleDriveClient::new(api.clone())),
        Arc::new(GoogleSheetsClient::new(api)),
        Arc::new(RedisTriggerStore::new(&config.redis_url)?),
    ))
}

/// Wire the generator against the production services
pub fn build_generator(config: Arc<Config>) -> miette::Result<Generator> {
    let services = google_services(&config)?;
    Ok(Generator::new(config, services))
}
