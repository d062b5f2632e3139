use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Development-only fallback; a real deployment must set JWT_SECRET.
const FALLBACK_SECRET: &str = "shhhhhhhhhhhhhhhhhhhhhhhhhhhhhhh";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";

/// Process configuration, read from the environment exactly once at
/// startup and passed into the pieces that need it. Business logic never
/// reads env vars directly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret: String,
    pub port: u16,
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the insecure built-in secret");
            FALLBACK_SECRET.to_string()
        });

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_DIR.to_string())
            .into();

        Self {
            secret,
            port,
            upload_dir,
        }
    }
}
