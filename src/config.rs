use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub reset_url_base: String,
    pub upload_dir: PathBuf,
    pub max_body_size: usize,
    pub account_disclosure: AccountDisclosure,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

/// Whether `forgot-password` tells the caller that an email is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountDisclosure {
    /// Same confirmation for known and unknown emails.
    Generic,
    /// Unknown emails fail with `NotFound`.
    Explicit,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("PETNEST_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PETNEST_HOST: {e}"))?;

        let port: u16 = env_or("PETNEST_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PETNEST_PORT: {e}"))?;

        let base_url = env_or("PETNEST_BASE_URL", &format!("http://{host}:{port}"));
        let reset_url_base = env_or("PETNEST_RESET_URL_BASE", &base_url);

        let upload_dir = PathBuf::from(env_or("PETNEST_UPLOAD_DIR", "uploads"));

        let max_body_size: usize = env_or("PETNEST_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid PETNEST_MAX_BODY_SIZE: {e}"))?;

        let account_disclosure = match env_or("PETNEST_ACCOUNT_DISCLOSURE", "generic").as_str() {
            "explicit" => AccountDisclosure::Explicit,
            "generic" => AccountDisclosure::Generic,
            other => {
                return Err(format!(
                    "Invalid PETNEST_ACCOUNT_DISCLOSURE '{other}': expected generic or explicit"
                ));
            }
        };

        let log_level = env_or("PETNEST_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("PETNEST_SMTP_HOST").ok(),
            std::env::var("PETNEST_SMTP_PORT").ok(),
            std::env::var("PETNEST_SMTP_USER").ok(),
            std::env::var("PETNEST_SMTP_PASS").ok(),
            std::env::var("PETNEST_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid PETNEST_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            base_url,
            reset_url_base,
            upload_dir,
            max_body_size,
            account_disclosure,
            log_level,
            smtp,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
