use std::io;

use anyhow::anyhow;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "ServerConfig::database_default")]
    pub db_server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            db_server: ServerConfig::database_default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8000, worker_threads: Some(4) }
    }
}

impl ServerConfig {
    fn database_default() -> Self {
        Self { port: 8001, ..Self::default() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Static shared-secret authentication for the memory server.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token")]
    pub token: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { token: default_token(), username: default_username(), password: default_password() }
    }
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/crud_hub.db?mode=rwc";

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token() -> String { "secret-token".into() }
fn default_username() -> String { "admin".into() }
fn default_password() -> String { "password".into() }

fn default_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&default_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    load_from_str(&content).with_context(|| format!("parsing {path}"))
}

/// `Ok(None)` only when the file does not exist; unreadable or malformed files are errors.
pub fn load_if_present(path: &str) -> Result<Option<AppConfig>> {
    match std::fs::read_to_string(path) {
        Ok(content) => load_from_str(&content).map(Some).with_context(|| format!("parsing {path}")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {path}")),
    }
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to environment
    /// variables when the file does not exist, then normalize and validate.
    pub fn load_and_validate() -> Result<Self> {
        Self::load_and_validate_from(&default_path())
    }

    pub fn load_and_validate_from(path: &str) -> Result<Self> {
        let mut cfg = match load_if_present(path)? {
            Some(cfg) => cfg,
            None => Self::from_env(),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Build a config purely from `SERVER_HOST`, `SERVER_PORT`, `DB_SERVER_PORT`,
    /// `DATABASE_URL` and `AUTH_TOKEN`.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host.clone();
            cfg.db_server.host = host;
        }
        if let Some(port) = env_port("SERVER_PORT") {
            cfg.server.port = port;
        }
        if let Some(port) = env_port("DB_SERVER_PORT") {
            cfg.db_server.port = port;
        }
        if let Ok(token) = std::env::var("AUTH_TOKEN") {
            cfg.auth.token = token;
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.db_server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

fn env_port(key: &str) -> Option<u16> {
    std::env::var(key).ok().and_then(|p| p.parse::<u16>().ok())
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(w) if w > 0 => {}
            _ => self.worker_threads = Some(4),
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Fill the URL from `DATABASE_URL`, then from the built-in SQLite default.
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        if self.url.trim().is_empty() {
            self.url = DEFAULT_DATABASE_URL.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(anyhow!("auth.token must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(contents: &str) -> std::path::PathBuf {
        let tmp = std::env::temp_dir().join(format!("configs_{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, contents).unwrap();
        tmp
    }

    #[test]
    fn malformed_file_is_an_error_not_a_fallback() {
        let tmp = temp_config("[server]\nport = \"not-a-number\"\n");
        let path = tmp.to_string_lossy().into_owned();
        let err = AppConfig::load_and_validate_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
        assert!(load_if_present(&path).is_err());
        let _ = std::fs::remove_file(tmp);
    }

    #[test]
    fn missing_file_falls_back_to_env() {
        let tmp = std::env::temp_dir().join(format!("configs_absent_{}.toml", uuid::Uuid::new_v4()));
        let path = tmp.to_string_lossy().into_owned();
        assert!(load_if_present(&path).unwrap().is_none());
        let cfg = AppConfig::load_and_validate_from(&path).unwrap();
        assert!(!cfg.database.url.is_empty());
    }

    #[test]
    fn present_file_is_used() {
        let tmp = temp_config("[server]\nport = 9100\n\n[database]\nurl = \"sqlite::memory:\"\n");
        let cfg = AppConfig::load_and_validate_from(&tmp.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.database.url, "sqlite::memory:");
        let _ = std::fs::remove_file(tmp);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = load_from_str("").unwrap();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.db_server.port, 8001);
        assert_eq!(cfg.auth.token, "secret-token");
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn parses_sections() {
        let cfg = load_from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [auth]
            token = "t0k"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.auth.token, "t0k");
        assert_eq!(cfg.auth.username, "admin");
    }

    #[test]
    fn normalize_fills_defaults() {
        let mut cfg = load_from_str(
            r#"
            [server]
            host = ""
            port = 8000
            worker_threads = 0

            [database]
            url = "postgres://u:p@localhost/db"
            "#,
        )
        .unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }

    #[test]
    fn rejects_zero_port() {
        let mut server = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(server.normalize().is_err());
    }

    #[test]
    fn rejects_unknown_database_scheme() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "sqlite::memory:".into(),
            min_connections: 5,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }
}
