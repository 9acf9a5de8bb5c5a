//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Registry database configuration
    pub registry: RegistryConfig,
    /// Orchestrator webhook configuration
    pub orchestrator: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Registry database configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Path to the SQLite database file
    pub db_path: String,
}

/// Orchestrator webhook configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Base URL of the orchestrator webhook
    pub webhook_url: String,
    /// Seconds between remote state polls
    pub poll_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            registry: RegistryConfig {
                db_path: env::var("DATABASE_PATH").unwrap_or_else(|_| {
                    // Default to ~/.agent-console or current directory
                    if let Some(home) = env::var_os("HOME") {
                        format!("{}/.agent-console/agents.db", home.to_string_lossy())
                    } else {
                        ".agent-console/agents.db".to_string()
                    }
                }),
            },
            orchestrator: OrchestratorConfig {
                webhook_url: env::var("ORCHESTRATOR_WEBHOOK_URL")
                    .unwrap_or_else(|_| "http://localhost:5678/webhook".to_string()),
                poll_interval_secs: env::var("STATE_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(5),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
