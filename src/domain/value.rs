use std::fmt;

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A client credential or endpoint value was rejected at construction.
pub enum ConfigError {
    Empty { field: &'static str },
    InvalidApiKey,
    InvalidBaseUrl { input: String, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidApiKey => f.write_str("api key contains characters not allowed in a header"),
            Self::InvalidBaseUrl { input, reason } => {
                write!(f, "invalid base URL {input:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Per-tenant API key, sent as `Authorization: App <key>`.
///
/// Invariant: non-empty after trimming, visible ASCII only. `Debug` never prints the key.
pub struct ApiKey(String);

impl ApiKey {
    pub const FIELD: &'static str = "api_key";

    /// Scheme prefix of the `Authorization` header.
    pub const SCHEME: &'static str = "App";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty { field: Self::FIELD });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::InvalidApiKey);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", Self::SCHEME, self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Tenant base URL, e.g. `https://xxxxx.api.infobip.com`.
///
/// Invariant: absolute `http`/`https` URL with a host and no path, query or fragment.
/// Stored without a trailing `/`. A bare host gets `https://` prepended.
pub struct BaseUrl(String);

impl BaseUrl {
    pub const FIELD: &'static str = "base_url";

    /// Create a validated [`BaseUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Empty { field: Self::FIELD });
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("https://{trimmed}")
        };
        let invalid = |reason| ConfigError::InvalidBaseUrl {
            input: trimmed.to_owned(),
            reason,
        };

        let url = Url::parse(&candidate).map_err(|_| invalid("not a URL"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host"));
        }
        if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not have a path, query or fragment"));
        }

        Ok(Self(candidate.trim_end_matches('/').to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `base + "/" + path`, with one separator regardless of a leading `/` in `path`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_trims_and_rejects_empty() {
        let key = ApiKey::new("  secret-key ").unwrap();
        assert_eq!(key.as_str(), "secret-key");
        assert_eq!(key.authorization(), "App secret-key");
        assert_eq!(
            ApiKey::new("   "),
            Err(ConfigError::Empty {
                field: ApiKey::FIELD
            })
        );
        assert_eq!(ApiKey::new("abc\ndef"), Err(ConfigError::InvalidApiKey));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret-key").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(***)");
    }

    #[test]
    fn base_url_normalizes() {
        let url = BaseUrl::new("https://xyz.api.infobip.com/").unwrap();
        assert_eq!(url.as_str(), "https://xyz.api.infobip.com");

        let url = BaseUrl::new("xyz.api.infobip.com").unwrap();
        assert_eq!(url.as_str(), "https://xyz.api.infobip.com");

        let url = BaseUrl::new("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.join("/sms/1/logs"), "http://127.0.0.1:8080/sms/1/logs");
        assert_eq!(url.join("sms/1/logs"), "http://127.0.0.1:8080/sms/1/logs");
    }

    #[test]
    fn base_url_rejects_paths_and_other_schemes() {
        assert!(BaseUrl::new("").is_err());
        assert!(BaseUrl::new("https://xyz.api.infobip.com/v1").is_err());
        assert!(BaseUrl::new("https://xyz.api.infobip.com?x=1").is_err());
        assert!(BaseUrl::new("ftp://xyz.api.infobip.com").is_err());
    }

    #[test]
    fn config_error_messages_are_human_readable() {
        let err = ConfigError::Empty { field: "api_key" };
        assert_eq!(err.to_string(), "api_key must not be empty");

        let err = ConfigError::InvalidBaseUrl {
            input: "x".to_owned(),
            reason: "missing host",
        };
        assert_eq!(err.to_string(), "invalid base URL \"x\": missing host");
    }
}
