//! Configuration manager for the provider.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";
const DEFAULT_SCHEME: &str = "ldaps";
const SCHEMES: [&str; 3] = ["ldap", "ldaps", "ldapi"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot open configuration file {path:?}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("configuration file is not valid YAML")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid directory url")]
    Url(#[from] url::ParseError),
    #[error("unsupported directory url scheme `{0}`")]
    Scheme(String),
    #[error("bind user `{0}` has no password")]
    MissingPassword(String),
}

/// Provider configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(skip)]
    path: PathBuf,
    /// Related to LDAP3 configuration.
    pub ldap: Ldap,
}

/// LDAP configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ldap {
    /// Directory URL, `ldaps://dc.example.com:636` for instance.
    pub url: String,
    /// Domain managed by the provider.
    pub domain: String,
    /// Bind user, either a DN or a `user@domain` principal.
    pub user: Option<String>,
    /// Password credential to connect.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Upgrade plain `ldap://` connections.
    #[serde(default)]
    pub starttls: bool,
    /// Accept any server certificate.
    #[serde(default)]
    pub no_tls_verify: bool,
    /// Connection timeout, in seconds.
    pub timeout: Option<u64>,
}

impl Ldap {
    /// Connection timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

impl Configuration {
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Reads the `config.yaml` file from the specified path or the default
    /// location.
    pub fn read(self) -> Result<Self, ConfigError> {
        let file_path = if self.path.is_file() {
            self.path.clone()
        } else {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        let file = File::open(&file_path).map_err(|source| {
            tracing::error!(path = ?file_path, error = %source, "configuration file not found");
            ConfigError::Io {
                path: file_path.clone(),
                source,
            }
        })?;

        let config: Configuration = serde_yaml::from_reader(file)?;
        config.path(file_path).normalize()
    }

    /// Parse a configuration from YAML text.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str::<Configuration>(yaml)?.normalize()
    }

    fn normalize(mut self) -> Result<Self, ConfigError> {
        self.ldap.url = normalize_url(&self.ldap.url)?;
        Ok(self)
    }
}

/// Normalizes a URL string by ensuring it starts with a directory scheme.
/// Bare hosts get `ldaps://`.
fn normalize_url(url: &str) -> Result<String, ConfigError> {
    let url_with_scheme = if url.contains("://") {
        url.to_string()
    } else {
        format!("{DEFAULT_SCHEME}://{url}")
    };

    let parsed_url = Url::parse(&url_with_scheme)?;
    if !SCHEMES.contains(&parsed_url.scheme()) {
        return Err(ConfigError::Scheme(parsed_url.scheme().to_owned()));
    }

    Ok(parsed_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
ldap:
  url: dc01.example.com:636
  domain: example.com
  user: administrator@example.com
  password: secret
  timeout: 5
"#;

    #[test]
    fn test_parse() {
        let config = Configuration::parse(CONFIG).unwrap();

        assert_eq!(config.ldap.url, "ldaps://dc01.example.com:636");
        assert_eq!(config.ldap.domain, "example.com");
        assert_eq!(config.ldap.user.as_deref(), Some("administrator@example.com"));
        assert_eq!(config.ldap.password.as_deref(), Some("secret"));
        assert_eq!(config.ldap.timeout(), Some(Duration::from_secs(5)));
        assert!(!config.ldap.starttls);
        assert!(!config.ldap.no_tls_verify);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("ldap://127.0.0.1:389").unwrap(),
            "ldap://127.0.0.1:389"
        );
        assert!(matches!(
            normalize_url("https://example.com"),
            Err(ConfigError::Scheme(scheme)) if scheme == "https"
        ));
    }

    #[test]
    fn test_password_not_serialized() {
        let config = Configuration::parse(CONFIG).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        assert!(!yaml.contains("secret"));
    }

    #[test]
    fn test_missing_file() {
        let config = Configuration::default()
            .path(PathBuf::from("/nonexistent/provider.yaml"))
            .read();

        // Falls back on `config.yaml`, absent from the crate root.
        assert!(matches!(config, Err(ConfigError::Io { .. })));
    }
}
