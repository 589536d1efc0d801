//! cephwatch.toml configuration parser.
//!
//! The config file carries one `[monitor]` table:
//!
//! ```toml
//! [monitor]
//! user = "ceph"
//! hosts = ["mon-1", "mon-2", "mon-3"]
//! timeout = "10s"
//! ```
//!
//! `hosts` is the failover order: monitors are tried front to back
//! until one answers. A scalar `hosts = "mon-1"` is accepted and
//! treated as a one-element list.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback per-attempt timeout when `timeout` is absent or unparseable.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("monitor user must not be empty")]
    NoUser,

    #[error("monitor host list must not be empty")]
    NoHosts,

    #[error("invalid timeout {0:?} (expected e.g. \"10s\", \"500ms\", \"1m\")")]
    BadTimeout(String),
}

/// Top-level config file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub monitor: MonitorConfig,
}

impl WatchConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: WatchConfig = toml::from_str(&content)?;
        config.monitor.validate()?;
        Ok(config)
    }
}

/// Monitor connection settings: SSH user, ordered host list, and the
/// per-attempt timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// SSH user on the monitor hosts.
    pub user: String,
    /// Monitor hosts in failover order.
    #[serde(deserialize_with = "one_or_many")]
    pub hosts: Vec<String>,
    /// Per-attempt timeout, e.g. "10s" or "500ms".
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl MonitorConfig {
    /// Check the invariants a health check relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user.is_empty() {
            return Err(ConfigError::NoUser);
        }
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        if parse_duration(&self.timeout).is_none() {
            return Err(ConfigError::BadTimeout(self.timeout.clone()));
        }
        Ok(())
    }

    /// Connection targets in failover order.
    pub fn targets(&self) -> impl Iterator<Item = MonTarget> + '_ {
        self.hosts.iter().map(|host| MonTarget {
            user: self.user.clone(),
            host: host.clone(),
        })
    }

    /// Per-attempt timeout as a `Duration`.
    pub fn attempt_timeout(&self) -> Duration {
        parse_duration(&self.timeout).unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// One monitor connection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonTarget {
    pub user: String,
    pub host: String,
}

impl fmt::Display for MonTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.host)
    }
}

fn default_timeout() -> String {
    "10s".to_string()
}

/// Accept either `hosts = "mon-1"` or `hosts = ["mon-1", "mon-2"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(host) => vec![host],
        OneOrMany::Many(hosts) => hosts,
    })
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(toml_str: &str) -> WatchConfig {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn parse_full_config() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = ["mon-1", "mon-2", "mon-3"]
timeout = "5s"
"#,
        );
        assert_eq!(config.monitor.user, "ceph");
        assert_eq!(config.monitor.hosts, vec!["mon-1", "mon-2", "mon-3"]);
        assert_eq!(config.monitor.attempt_timeout(), Duration::from_secs(5));
        config.monitor.validate().unwrap();
    }

    #[test]
    fn scalar_host_coerced_to_list() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = "mon-1"
"#,
        );
        assert_eq!(config.monitor.hosts, vec!["mon-1"]);
    }

    #[test]
    fn timeout_defaults_to_ten_seconds() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = ["mon-1"]
"#,
        );
        assert_eq!(config.monitor.attempt_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn empty_host_list_rejected() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = []
"#,
        );
        assert!(matches!(
            config.monitor.validate(),
            Err(ConfigError::NoHosts)
        ));
    }

    #[test]
    fn empty_user_rejected() {
        let config = parse(
            r#"
[monitor]
user = ""
hosts = ["mon-1"]
"#,
        );
        assert!(matches!(config.monitor.validate(), Err(ConfigError::NoUser)));
    }

    #[test]
    fn bad_timeout_rejected() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = ["mon-1"]
timeout = "soon"
"#,
        );
        assert!(matches!(
            config.monitor.validate(),
            Err(ConfigError::BadTimeout(_))
        ));
    }

    #[test]
    fn targets_preserve_host_order() {
        let config = parse(
            r#"
[monitor]
user = "ceph"
hosts = ["mon-2", "mon-1"]
"#,
        );
        let targets: Vec<String> = config.monitor.targets().map(|t| t.to_string()).collect();
        assert_eq!(targets, vec!["ceph@mon-2", "ceph@mon-1"]);
    }

    #[test]
    fn from_file_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[monitor]
user = "ceph"
hosts = ["mon-1"]
timeout = "2s"
"#
        )
        .unwrap();

        let config = WatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.monitor.hosts, vec!["mon-1"]);
        assert_eq!(config.monitor.attempt_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn from_file_missing_path() {
        let err = WatchConfig::from_file(Path::new("/nonexistent/cephwatch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn parse_duration_values() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration("soon"), None);
    }
}
