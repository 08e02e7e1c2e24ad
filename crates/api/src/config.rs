//! Process configuration, read from `GATE_*` environment variables.

use std::net::SocketAddr;

use thiserror::Error;

use approvalgate_approval::{NotifierConfig, SiteInfo};
use approvalgate_observability::LogFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// How `POST /login/` learns who is signing in.
///
/// This service never checks passwords; the identity has to come from an
/// authenticating proxy, or be trusted outright in development.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SignInPolicy {
    /// Sign-in is refused.
    #[default]
    Disabled,
    /// Username taken from this request header, set by the proxy in front.
    TrustedHeader(String),
    /// Username taken from the request body as-is. Development only.
    AssertedUsername,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    pub bind_addr: SocketAddr,
    pub site_name: String,
    /// Public base URL; the login URL in emails is `{site_url}/login/`.
    pub site_url: String,
    /// Recipient of new-registration alerts.
    pub admin_email: String,
    /// Bootstrap administrator created at startup.
    pub admin_username: String,
    pub log_format: LogFormat,
    pub session_ttl_hours: i64,
    pub sign_in: SignInPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            site_name: "Our Store".to_string(),
            site_url: "http://localhost:8080".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_username: "admin".to_string(),
            log_format: LogFormat::Json,
            session_ttl_hours: 48,
            sign_in: SignInPolicy::Disabled,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(addr) = get("GATE_BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e| ConfigError::Invalid {
                key: "GATE_BIND_ADDR",
                message: format!("{e}"),
            })?;
        }
        if let Some(name) = get("GATE_SITE_NAME") {
            config.site_name = name;
        }
        if let Some(url) = get("GATE_SITE_URL") {
            config.site_url = url.trim_end_matches('/').to_string();
        }
        if let Some(email) = get("GATE_ADMIN_EMAIL") {
            config.admin_email = email;
        }
        if let Some(username) = get("GATE_ADMIN_USERNAME") {
            config.admin_username = username;
        }
        if let Some(format) = get("GATE_LOG_FORMAT") {
            config.log_format = format.parse().map_err(|e| ConfigError::Invalid {
                key: "GATE_LOG_FORMAT",
                message: format!("{e}"),
            })?;
        }
        if let Some(ttl) = get("GATE_SESSION_TTL_HOURS") {
            config.session_ttl_hours = ttl.parse().map_err(|e| ConfigError::Invalid {
                key: "GATE_SESSION_TTL_HOURS",
                message: format!("{e}"),
            })?;
        }

        let trust_body = match get("GATE_TRUST_ASSERTED_USERNAME").as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "GATE_TRUST_ASSERTED_USERNAME",
                    message: format!("'{other}' is not a boolean"),
                });
            }
        };
        config.sign_in = match (get("GATE_IDENTITY_HEADER"), trust_body) {
            (Some(_), true) => {
                return Err(ConfigError::Invalid {
                    key: "GATE_IDENTITY_HEADER",
                    message: "cannot be combined with GATE_TRUST_ASSERTED_USERNAME".to_string(),
                });
            }
            (Some(header), false) => SignInPolicy::TrustedHeader(header.to_ascii_lowercase()),
            (None, true) => SignInPolicy::AssertedUsername,
            (None, false) => SignInPolicy::Disabled,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.site_url.starts_with("http://") || self.site_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "GATE_SITE_URL",
                message: format!("'{}' is not an http(s) URL", self.site_url),
            });
        }
        if !self.admin_email.contains('@') {
            return Err(ConfigError::Invalid {
                key: "GATE_ADMIN_EMAIL",
                message: format!("'{}' is not an email address", self.admin_email),
            });
        }
        if let SignInPolicy::TrustedHeader(name) = &self.sign_in {
            if axum::http::HeaderName::from_bytes(name.as_bytes()).is_err() {
                return Err(ConfigError::Invalid {
                    key: "GATE_IDENTITY_HEADER",
                    message: format!("'{name}' is not a header name"),
                });
            }
        }
        if self.session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "GATE_SESSION_TTL_HOURS",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn notifier(&self) -> NotifierConfig {
        NotifierConfig {
            site: SiteInfo::new(self.site_name.clone(), self.site_url.clone()),
            admin_email: self.admin_email.clone(),
        }
    }
}
