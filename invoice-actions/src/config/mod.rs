use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth_provider: AuthProviderSettings,
    #[serde(default)]
    pub application: ApplicationSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

#[derive(Deserialize, Clone)]
pub struct AuthProviderSettings {
    /// Base URL of the service that verifies credentials and issues tokens.
    pub url: String,
    /// Sign-in strategy handed to the verifier.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

fn default_strategy() -> String {
    "credentials".to_string()
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint; span export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    /// Path of the invoice listing view, invalidated and redirected to after mutations.
    #[serde(default = "default_listing_path")]
    pub listing_path: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            otlp_endpoint: None,
            listing_path: default_listing_path(),
        }
    }
}

fn default_service_name() -> String {
    "invoice-actions".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listing_path() -> String {
    "/dashboard/invoices".to_string()
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to read current dir: {}", e)))?;

    // Support running from the workspace root or from the crate directory
    let configuration_directory = if base_path.ends_with("invoice-actions") {
        base_path.join("config")
    } else {
        base_path.join("invoice-actions").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
