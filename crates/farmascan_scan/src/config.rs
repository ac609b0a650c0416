//! Configuration for scan classification and debouncing

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

/// Custom scheme registered by the mobile app.
pub const DEFAULT_APP_SCHEME: &str = "myfarmaciafrontend";

/// Route of the record detail screen.
pub const DEFAULT_RECORD_ROUTE: &str = "detalle";

/// ASCII alphanumerics, underscore, colon and hyphen; 4 to 64 characters.
pub const DEFAULT_IDENTIFIER_PATTERN: &str = "^[A-Za-z0-9_:-]{4,64}$";

pub const DEFAULT_MAX_PAYLOAD_LENGTH: usize = 512;

pub const DEFAULT_COOLDOWN_MS: u64 = 1200;

/// How a session is re-armed after a decode has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RearmPolicy {
    /// Re-arm automatically once `cooldown_ms` has elapsed (or on retry)
    #[default]
    Cooldown,
    /// Stay disarmed until the user explicitly retries
    Manual,
}

impl RearmPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RearmPolicy::Cooldown => "cooldown",
            RearmPolicy::Manual => "manual",
        }
    }
}

/// Main configuration for scan handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Custom URI scheme of the app, without "://"
    #[serde(default = "default_app_scheme")]
    pub app_scheme: String,

    /// Internal routes a deep link may target
    #[serde(default = "default_allowed_deep_link_paths")]
    pub allowed_deep_link_paths: BTreeSet<String>,

    /// Maximum sanitized payload length, in characters
    #[serde(default = "default_max_payload_length")]
    pub max_payload_length: usize,

    /// Identifier format rule, applied as a whole-string match
    #[serde(default = "default_identifier_pattern")]
    pub identifier_pattern: String,

    /// Delay before an accepted scan re-arms under [`RearmPolicy::Cooldown`]
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    #[serde(default)]
    pub rearm: RearmPolicy,

    /// Route that record lookups navigate to
    #[serde(default = "default_record_route")]
    pub record_route: String,
}

fn default_app_scheme() -> String {
    DEFAULT_APP_SCHEME.to_string()
}

fn default_allowed_deep_link_paths() -> BTreeSet<String> {
    BTreeSet::from([DEFAULT_RECORD_ROUTE.to_string()])
}

fn default_max_payload_length() -> usize {
    DEFAULT_MAX_PAYLOAD_LENGTH
}

fn default_identifier_pattern() -> String {
    DEFAULT_IDENTIFIER_PATTERN.to_string()
}

fn default_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

fn default_record_route() -> String {
    DEFAULT_RECORD_ROUTE.to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            app_scheme: default_app_scheme(),
            allowed_deep_link_paths: default_allowed_deep_link_paths(),
            max_payload_length: default_max_payload_length(),
            identifier_pattern: default_identifier_pattern(),
            cooldown_ms: default_cooldown_ms(),
            rearm: RearmPolicy::default(),
            record_route: default_record_route(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScanConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Check everything that does not need the compiled identifier pattern.
    ///
    /// [`Classifier::new`](crate::Classifier::new) runs this and then checks
    /// the pattern and the allow-list against each other.
    pub fn validate(&self) -> Result<()> {
        validate_scheme(&self.app_scheme)?;
        for route in &self.allowed_deep_link_paths {
            validate_route(route)?;
        }
        validate_route(&self.record_route)?;
        if self.max_payload_length == 0 {
            return Err(ConfigError::InvalidLimit {
                name: "max_payload_length",
                value: 0,
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ).
fn validate_scheme(scheme: &str) -> Result<()> {
    let invalid = |reason: &str| ConfigError::InvalidScheme {
        scheme: scheme.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = scheme.chars();
    match chars.next() {
        None => return Err(invalid("scheme is empty")),
        Some(first) if !first.is_ascii_alphabetic() => {
            return Err(invalid("scheme must start with a letter"))
        }
        Some(_) => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.') {
        return Err(invalid("scheme may only contain letters, digits, '+', '-' and '.'"));
    }
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        return Err(invalid("web schemes cannot be used as the app scheme"));
    }
    Ok(())
}

fn validate_route(route: &str) -> Result<()> {
    if route.is_empty() {
        return Err(ConfigError::InvalidRoute {
            route: route.to_string(),
            reason: "route is empty".to_string(),
        });
    }
    if !route
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(ConfigError::InvalidRoute {
            route: route.to_string(),
            reason: "routes may only contain letters, digits, '_' and '-'".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.app_scheme, "myfarmaciafrontend");
        assert!(config.allowed_deep_link_paths.contains("detalle"));
        assert_eq!(config.max_payload_length, 512);
        assert_eq!(config.cooldown(), Duration::from_millis(1200));
        assert_eq!(config.rearm, RearmPolicy::Cooldown);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ScanConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ScanConfig::from_toml_str(
            r#"
app_scheme = "otraapp"
allowed_deep_link_paths = ["detalle", "receta"]
cooldown_ms = 800
rearm = "manual"
"#,
        )
        .unwrap();
        assert_eq!(config.app_scheme, "otraapp");
        assert_eq!(config.allowed_deep_link_paths.len(), 2);
        assert_eq!(config.cooldown_ms, 800);
        assert_eq!(config.rearm, RearmPolicy::Manual);
        assert_eq!(config.max_payload_length, 512);
    }

    #[test]
    fn test_rejects_web_scheme() {
        let err = ScanConfig::from_toml_str("app_scheme = \"HTTPS\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidScheme { .. }));
    }

    #[test]
    fn test_rejects_malformed_scheme() {
        for scheme in ["", "1app", "my app", "app://"] {
            let config = ScanConfig {
                app_scheme: scheme.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidScheme { .. })),
                "scheme {:?} should be rejected",
                scheme
            );
        }
    }

    #[test]
    fn test_rejects_route_with_slash() {
        let err = ScanConfig::from_toml_str("allowed_deep_link_paths = [\"a/b\"]").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRoute { .. }));
    }

    #[test]
    fn test_rejects_zero_max_length() {
        let err = ScanConfig::from_toml_str("max_payload_length = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLimit { .. }));
    }

    #[test]
    fn test_unknown_rearm_policy_is_parse_error() {
        let err = ScanConfig::from_toml_str("rearm = \"sometimes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = ScanConfig {
            cooldown_ms: 1500,
            rearm: RearmPolicy::Manual,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ScanConfig::load(&path).unwrap(), config);
    }
}
