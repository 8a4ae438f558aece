use anyhow::{bail, Result};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub arxiv: ArxivConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// The single front-end origin allowed to call the API from a browser
    pub cors_allowed_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArxivConfig {
    pub api_url: String,
    /// Entries requested per page from the arXiv API
    pub page_size: u32,
    /// Pause between consecutive page requests
    pub page_delay: Duration,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_url: "http://export.arxiv.org/api/query".to_string(),
            page_size: 100,
            page_delay: Duration::from_secs(3),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = ArxivConfig::default();

        let config = Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .trim()
                    .to_string(),
            },
            arxiv: ArxivConfig {
                api_url: env::var("ARXIV_API_URL").unwrap_or(defaults.api_url),
                page_size: match env::var("ARXIV_PAGE_SIZE") {
                    Ok(v) => v.parse()?,
                    Err(_) => defaults.page_size,
                },
                page_delay: match env::var("ARXIV_PAGE_DELAY_MS") {
                    Ok(v) => Duration::from_millis(v.parse()?),
                    Err(_) => defaults.page_delay,
                },
            },
        };

        if config.arxiv.page_size == 0 {
            bail!("ARXIV_PAGE_SIZE must be greater than zero");
        }

        Ok(config)
    }
}
