//! Server configuration

/// Server configuration loaded from environment variables
pub struct Config {
    pub fhir_base_url: String,
    pub bind_address: String,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            fhir_base_url: std::env::var("FHIR_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/fhir".into()),
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".into()]),
        }
    }
}
