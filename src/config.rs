//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. `main` loads `.env` before calling [`Config::from_env`].

use std::env;
use std::path::PathBuf;

/// Default Gemini REST endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model name
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default cap on request bodies for upload routes (20 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Model provider configuration
    pub gemini: GeminiConfig,
    /// Upload handling configuration
    pub uploads: UploadConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Directory served for unmatched GET requests
    pub static_dir: PathBuf,
}

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key (empty means every generation call fails)
    pub api_key: String,
    /// Model name, with or without the `models/` prefix
    pub model: String,
    /// REST base URL
    pub base_url: String,
    /// Per-request HTTP timeout
    pub timeout_secs: u64,
}

// Keeps the key out of startup logs
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Upload handling configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory for temporary upload files
    pub dir: PathBuf,
    /// Maximum accepted request body size in bytes
    pub max_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                static_dir: env::var("STATIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("public")),
            },
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
                model: env::var("GEMINI_MODEL")
                    .ok()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(60),
            },
            uploads: UploadConfig {
                dir: env::var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("uploads")),
                max_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|b| b.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "PORT",
        "HOST",
        "STATIC_DIR",
        "GEMINI_API_KEY",
        "GEMINI_MODEL",
        "GEMINI_API_BASE_URL",
        "GEMINI_TIMEOUT_SECS",
        "UPLOAD_DIR",
        "MAX_UPLOAD_BYTES",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
        assert_eq!(config.server.static_dir, PathBuf::from("public"));
        assert!(config.gemini.api_key.is_empty());
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.uploads.dir, PathBuf::from("uploads"));
        assert_eq!(config.uploads.max_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    #[serial]
    fn test_overrides_and_bad_port() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        env::set_var("GEMINI_API_KEY", "secret");
        env::set_var("GEMINI_MODEL", "gemini-2.5-flash");
        env::set_var("UPLOAD_DIR", "/tmp/gateway-uploads");
        env::set_var("MAX_UPLOAD_BYTES", "1024");

        let config = Config::from_env();
        clear_env();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gemini.api_key, "secret");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.uploads.dir, PathBuf::from("/tmp/gateway-uploads"));
        assert_eq!(config.uploads.max_bytes, 1024);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let gemini = GeminiConfig {
            api_key: "super-secret".to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: 60,
        };
        let rendered = format!("{:?}", gemini);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
