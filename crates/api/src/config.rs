use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Identity-provider token validation.
    pub jwt: JwtConfig,
    /// Root directory of the local object store (default: `storage`).
    pub storage_root: String,
    /// Secret used to sign download URLs (default: the JWT secret).
    pub signed_url_secret: String,
    /// Lifetime of a signed download URL in seconds (default: `3600`).
    pub signed_url_expiry_secs: i64,
    /// Capacity of the media processing queue (default: `64`).
    pub media_queue_capacity: usize,
    /// Externally visible base URL used in signed URLs.
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `AUTH_JWT_SECRET`        | required                   |
    /// | `STORAGE_ROOT`           | `storage`                  |
    /// | `SIGNED_URL_SECRET`      | `AUTH_JWT_SECRET`          |
    /// | `SIGNED_URL_EXPIRY_SECS` | `3600`                     |
    /// | `MEDIA_QUEUE_CAPACITY`   | `64`                       |
    /// | `PUBLIC_BASE_URL`        | `http://localhost:3000`    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        let storage_root = std::env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".into());

        let signed_url_secret = std::env::var("SIGNED_URL_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| jwt.secret.clone());

        let signed_url_expiry_secs: i64 = std::env::var("SIGNED_URL_EXPIRY_SECS")
            .unwrap_or_else(|_| rise_core::signing::DEFAULT_EXPIRY_SECS.to_string())
            .parse()
            .expect("SIGNED_URL_EXPIRY_SECS must be a valid i64");

        let media_queue_capacity: usize = std::env::var("MEDIA_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "64".into())
            .parse()
            .expect("MEDIA_QUEUE_CAPACITY must be a valid usize");

        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            storage_root,
            signed_url_secret,
            signed_url_expiry_secs,
            media_queue_capacity,
            public_base_url,
        }
    }
}
