use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::tag::models::TagNamePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub tag_name_policy: TagNamePolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            tag_name_policy: env::var("TAG_NAME_POLICY")
                .unwrap_or_else(|_| "exact".to_string())
                .parse()
                .context("TAG_NAME_POLICY must be 'exact' or 'case_insensitive'")?,
        })
    }
}
