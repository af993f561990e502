use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub session_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub registration: RegistrationMode,
    pub session_ttl_hours: i64,
    pub secure_cookies: bool,
    pub features: Features,
    pub seed_demo: bool,
    pub max_body_size: usize,
    pub log_level: String,
    pub smtp: Option<SmtpConfig>,
}

/// Optional side features, off unless switched on.
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    pub email_notifications: bool,
    pub ai_suggestions: bool,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let session_secret = env_required("NOTEKEEPER_SESSION_SECRET")?;

        let host: IpAddr = env_or("NOTEKEEPER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid NOTEKEEPER_HOST: {e}"))?;

        let port: u16 = env_or("NOTEKEEPER_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid NOTEKEEPER_PORT: {e}"))?;

        let base_url = env_or("NOTEKEEPER_BASE_URL", &format!("http://{host}:{port}"));

        let data_dir = PathBuf::from(env_or("NOTEKEEPER_DATA_DIR", "./data"));

        let registration = match env_or("NOTEKEEPER_REGISTRATION", "open").as_str() {
            "closed" => RegistrationMode::Closed,
            _ => RegistrationMode::Open,
        };

        let session_ttl_hours: i64 = env_or("NOTEKEEPER_SESSION_TTL_HOURS", "12")
            .parse()
            .map_err(|e| format!("Invalid NOTEKEEPER_SESSION_TTL_HOURS: {e}"))?;
        if session_ttl_hours <= 0 {
            return Err("NOTEKEEPER_SESSION_TTL_HOURS must be positive".to_string());
        }

        let secure_cookies = env_flag("NOTEKEEPER_SECURE_COOKIES", true)?;

        let features = Features {
            email_notifications: env_flag("NOTEKEEPER_EMAIL_NOTIFICATIONS", false)?,
            ai_suggestions: env_flag("NOTEKEEPER_AI_SUGGESTIONS", false)?,
        };

        let seed_demo = env_flag("NOTEKEEPER_SEED_DEMO", false)?;

        let max_body_size: usize = env_or("NOTEKEEPER_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid NOTEKEEPER_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("NOTEKEEPER_LOG_LEVEL", "info");

        let smtp = match (
            std::env::var("NOTEKEEPER_SMTP_HOST").ok(),
            std::env::var("NOTEKEEPER_SMTP_PORT").ok(),
            std::env::var("NOTEKEEPER_SMTP_USER").ok(),
            std::env::var("NOTEKEEPER_SMTP_PASS").ok(),
            std::env::var("NOTEKEEPER_SMTP_FROM").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass), Some(from)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid NOTEKEEPER_SMTP_PORT: {e}"))?,
                user,
                pass,
                from,
            }),
            _ => None,
        };

        Ok(Config {
            session_secret,
            host,
            port,
            base_url,
            data_dir,
            registration,
            session_ttl_hours,
            secure_cookies,
            features,
            seed_demo,
            max_body_size,
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

fn env_flag(key: &str, default: bool) -> Result<bool, String> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => parse_flag(&v).ok_or_else(|| format!("Invalid {key}: expected true or false, got '{v}'")),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
