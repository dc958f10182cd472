use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub user_agent: String,
    pub kakao_api_key: String,
    pub kakao_base_url: String,
    pub geocode_region_prefix: String,
    pub geocode_timeout_secs: u64,
    pub opendata_api_url: String,
    pub opendata_service_key: String,
    pub opendata_timeout_secs: u64,
    pub import_page_size: u32,
    pub import_concurrency: usize,
    pub import_deadline_secs: u64,
    /// Cron expression for the server-side scheduled import. `None` disables it.
    pub import_schedule: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("kakao_api_key", &"[redacted]")
            .field("kakao_base_url", &self.kakao_base_url)
            .field("geocode_region_prefix", &self.geocode_region_prefix)
            .field("geocode_timeout_secs", &self.geocode_timeout_secs)
            .field("opendata_api_url", &self.opendata_api_url)
            .field("opendata_service_key", &"[redacted]")
            .field("opendata_timeout_secs", &self.opendata_timeout_secs)
            .field("import_page_size", &self.import_page_size)
            .field("import_concurrency", &self.import_concurrency)
            .field("import_deadline_secs", &self.import_deadline_secs)
            .field("import_schedule", &self.import_schedule)
            .finish()
    }
}
