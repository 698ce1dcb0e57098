//! Error handling for brand-forge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a failed availability probe is worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeErrorKind {
    /// Timeouts, throttling, malformed registry replies
    Transient,
    /// The lookup can never succeed (e.g. unsupported TLD)
    Permanent,
}

impl std::fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeErrorKind::Transient => write!(f, "transient"),
            ProbeErrorKind::Permanent => write!(f, "permanent"),
        }
    }
}

/// Main error type for brand-forge
#[derive(Error, Debug, Clone)]
pub enum BrandForgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Probe error ({kind}) for '{domain}': {message}")]
    Probe {
        domain: String,
        kind: ProbeErrorKind,
        message: String,
    },

    #[error("Name generation failed ({provider}): {message}")]
    Generation { provider: String, message: String },

    #[error("SEO optimization failed: {message}")]
    Seo { message: String },

    #[error("Trademark service error: {message}")]
    Trademark { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BrandForgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid user input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a transient probe error (retried by the caller)
    pub fn transient_probe(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            domain: domain.into(),
            kind: ProbeErrorKind::Transient,
            message: message.into(),
        }
    }

    /// Create a permanent probe error (never retried)
    pub fn permanent_probe(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            domain: domain.into(),
            kind: ProbeErrorKind::Permanent,
            message: message.into(),
        }
    }

    /// Create a name generation error
    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an SEO collaborator error
    pub fn seo(message: impl Into<String>) -> Self {
        Self::Seo {
            message: message.into(),
        }
    }

    /// Create a trademark service error
    pub fn trademark(message: impl Into<String>) -> Self {
        Self::Trademark {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Probe classification of this error.
    ///
    /// Errors raised outside the probe path are classified by what they say
    /// about the registry: timeouts, throttling and server faults are worth
    /// another attempt, anything else is not.
    pub fn probe_kind(&self) -> ProbeErrorKind {
        match self {
            Self::Probe { kind, .. } => *kind,
            Self::Timeout { .. } | Self::Parse { .. } => ProbeErrorKind::Transient,
            Self::Network { status_code, .. } => match status_code {
                None | Some(429) | Some(500..=599) => ProbeErrorKind::Transient,
                Some(_) => ProbeErrorKind::Permanent,
            },
            _ => ProbeErrorKind::Permanent,
        }
    }

    /// Check if retrying the failed probe could help
    pub fn is_transient(&self) -> bool {
        self.probe_kind() == ProbeErrorKind::Transient
    }

    /// Check if the user can fix this by answering the prompt again
    pub fn is_recoverable_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or environment variables", message)
            }
            Self::InvalidInput { message } => {
                format!("⚠️  {}\n💡 Enter comma-separated numbers like 1,4,7 or 'all' / 'regenerate'", message)
            }
            Self::Probe { domain, message, .. } => {
                format!("⚠️  Could not check domain '{}': {}", domain, message)
            }
            Self::Generation { provider, message } => {
                format!("❌ Name generation failed ({}): {}\n💡 Check your API key and rate limits, then retry", provider, message)
            }
            Self::Seo { message } => {
                format!("⚠️  SEO analysis unavailable: {}", message)
            }
            Self::Trademark { message } => {
                format!("⚠️  Trademark service unavailable: {}", message)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, timeout_secs } => {
                format!("⏱️  Operation '{}' timed out after {}s\n💡 Try increasing BRAND_FORGE_PROBE_TIMEOUT_SECS", operation, timeout_secs)
            }
            Self::Parse { message, .. } => {
                format!("❌ Parse error: {}\n💡 This might be a temporary issue, try again", message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Cancelled => "⏹️  Cancelled".to_string(),
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for BrandForgeError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", 30)
        } else if err.is_connect() {
            Self::network("Connection failed", status_code, url)
        } else if err.is_request() {
            Self::network("Request failed", status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for BrandForgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for BrandForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for BrandForgeError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", 30)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BrandForgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::invalid_input($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::invalid_input(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::BrandForgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::BrandForgeError::internal(format!($fmt, $($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_classification() {
        assert!(BrandForgeError::transient_probe("a.com", "throttled").is_transient());
        assert!(!BrandForgeError::permanent_probe("a.zz", "no registry").is_transient());
        assert!(BrandForgeError::timeout("RDAP request", 8).is_transient());
        assert!(BrandForgeError::network("busy", Some(429), None).is_transient());
        assert!(BrandForgeError::network("bad gateway", Some(502), None).is_transient());
        assert!(!BrandForgeError::network("forbidden", Some(403), None).is_transient());
    }

    #[test]
    fn test_recoverable_input() {
        assert!(validation_error!("index {} out of range", 21).is_recoverable_input());
        assert!(!BrandForgeError::generation("openai", "boom").is_recoverable_input());
    }
}
