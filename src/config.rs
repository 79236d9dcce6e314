//! Environment configuration (SPEC_FULL.md §A.3). `dotenvy` loads `.env` in
//! `main.rs` before this is called, the way the teacher does it.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub api_base_url: String,
    pub frontend_url: String,
    pub google_maps_api_key: String,
    pub openweather_api_key: String,
    /// Absence is not fatal: `use_llm` just degrades to deterministic per plan.
    pub openai_api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        AppConfig {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            bind_address: env::var("BIND_ADDRESS").expect("BIND_ADDRESS must be set"),
            api_base_url: env::var("API_BASE_URL").expect("API_BASE_URL must be set"),
            frontend_url: env::var("FRONTEND_URL").expect("FRONTEND_URL must be set"),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY").expect("GOOGLE_MAPS_API_KEY must be set"),
            openweather_api_key: env::var("OPENWEATHER_API_KEY").expect("OPENWEATHER_API_KEY must be set"),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        }
    }
}
