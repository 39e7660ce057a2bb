use std::env;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8081/api";

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Base path of the backend REST API, without a trailing slash.
    pub api_base_url: String,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Self::new(api_base_url)
    }

    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self { api_base_url }
    }
}
