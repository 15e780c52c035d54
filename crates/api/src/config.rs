use crate::auth::jwt::JwtConfig;

/// Default SQLite database location.
const DEFAULT_DATABASE_URL: &str = "sqlite://cardex.db";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite connection string (default: `sqlite://cardex.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory where passport documents are written (default: `uploads`).
    pub upload_dir: String,
    /// Credentials of the Admin account seeded when no Admin exists.
    pub default_admin: DefaultAdmin,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Seed account created on first start.
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                    |
    /// |--------------------------|----------------------------|
    /// | `HOST`                   | `0.0.0.0`                  |
    /// | `PORT`                   | `3000`                     |
    /// | `DATABASE_URL`           | `sqlite://cardex.db`       |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                       |
    /// | `UPLOAD_DIR`             | `uploads`                  |
    /// | `DEFAULT_ADMIN_USERNAME` | `admin`                    |
    /// | `DEFAULT_ADMIN_EMAIL`    | `admin@cardex.local`       |
    /// | `DEFAULT_ADMIN_PASSWORD` | `admin123`                 |
    /// | `LOG_FORMAT`             | `text` (`json` to switch)  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());

        let default_admin = DefaultAdmin {
            username: std::env::var("DEFAULT_ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            email: std::env::var("DEFAULT_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@cardex.local".into()),
            password: std::env::var("DEFAULT_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".into()),
        };

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            upload_dir,
            default_admin,
            log_json,
            jwt,
        }
    }
}
