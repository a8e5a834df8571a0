use crate::error::{Result, SprigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PORT: u16 = 5000;

/// Which address label URLs point at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// All interfaces (`0.0.0.0`).
    #[default]
    All,
    /// The machine's private network address, detected at runtime.
    Private,
}

impl BindMode {
    /// Address to listen on.
    pub fn host(self) -> IpAddr {
        match self {
            BindMode::All => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            BindMode::Private => reachable_address(),
        }
    }
}

/// Address other devices on the network can reach this machine at.
///
/// Used for links even when listening on all interfaces, since `0.0.0.0`
/// is not something a phone can connect to.
pub fn reachable_address() -> IpAddr {
    detect_private_address().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

impl fmt::Display for BindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindMode::All => write!(f, "all"),
            BindMode::Private => write!(f, "private"),
        }
    }
}

impl FromStr for BindMode {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(BindMode::All),
            "private" => Ok(BindMode::Private),
            other => Err(SprigError::Config(format!(
                "unknown bind mode {other:?} (expected \"all\" or \"private\")"
            ))),
        }
    }
}

/// Local address the OS would route outbound traffic from.
///
/// Connecting a UDP socket sends nothing; it only makes the kernel pick a
/// source address.
pub fn detect_private_address() -> Option<IpAddr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(("10.255.255.255", 1)).ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (!ip.is_unspecified()).then_some(ip)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Credential for the compression service. Optimization is off without it.
    pub api_key: Option<String>,
    pub max_width: u32,
    pub max_height: u32,
    pub timeout_secs: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            max_width: 1024,
            max_height: 1024,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub columns: usize,
    pub rows: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self { columns: 3, rows: 7 }
    }
}

/// Configuration for sprig, stored in `<home>/config.json`.
///
/// Every field has a default, so partial files load fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprigConfig {
    pub bind: BindMode,
    pub port: u16,
    /// Overrides `bind`/`port` when building label URLs.
    pub base_url: Option<String>,
    pub optimizer: OptimizerConfig,
    pub labels: LabelConfig,
}

impl Default for SprigConfig {
    fn default() -> Self {
        Self {
            bind: BindMode::All,
            port: DEFAULT_PORT,
            base_url: None,
            optimizer: OptimizerConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

/// Settable configuration keys, as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    Bind,
    Port,
    LabelColumns,
    LabelRows,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::BaseUrl,
        ConfigKey::Bind,
        ConfigKey::Port,
        ConfigKey::LabelColumns,
        ConfigKey::LabelRows,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Bind => "bind",
            ConfigKey::Port => "port",
            ConfigKey::LabelColumns => "label-columns",
            ConfigKey::LabelRows => "label-rows",
        }
    }
}

impl FromStr for ConfigKey {
    type Err = SprigError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| SprigError::Config(format!("unknown config key: {s}")))
    }
}

impl SprigConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SprigError::Io)?;
        let config: SprigConfig =
            serde_json::from_str(&content).map_err(SprigError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SprigError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SprigError::Serialization)?;
        fs::write(config_path, content).map_err(SprigError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::BaseUrl => self.base_url.clone().unwrap_or_default(),
            ConfigKey::Bind => self.bind.to_string(),
            ConfigKey::Port => self.port.to_string(),
            ConfigKey::LabelColumns => self.labels.columns.to_string(),
            ConfigKey::LabelRows => self.labels.rows.to_string(),
        }
    }

    /// Set a key from its command-line string form. An empty `base-url`
    /// clears the override.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ConfigKey::BaseUrl => {
                self.base_url = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::Bind => self.bind = value.parse()?,
            ConfigKey::Port => self.port = parse_number(key, value)?,
            ConfigKey::LabelColumns => self.labels.columns = parse_positive(key, value)?,
            ConfigKey::LabelRows => self.labels.rows = parse_positive(key, value)?,
        }
        Ok(())
    }

    /// Base URL that plant status links are built from.
    pub fn label_base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", reachable_address(), self.port),
        }
    }
}

fn parse_number<T: FromStr>(key: ConfigKey, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SprigError::Config(format!("invalid value for {}: {value:?}", key.name())))
}

fn parse_positive(key: ConfigKey, value: &str) -> Result<usize> {
    match parse_number::<usize>(key, value)? {
        0 => Err(SprigError::Config(format!("{} must be at least 1", key.name()))),
        n => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SprigConfig::default();
        assert_eq!(config.bind, BindMode::All);
        assert_eq!(config.port, 5000);
        assert_eq!(config.labels, LabelConfig { columns: 3, rows: 7 });
        assert!(config.optimizer.api_key.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = SprigConfig::load(dir.path()).unwrap();
        assert_eq!(config, SprigConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = SprigConfig::default();
        config.set(ConfigKey::Port, "8080").unwrap();
        config.set(ConfigKey::Bind, "private").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = SprigConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.port, 8080);
        assert_eq!(loaded.bind, BindMode::Private);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SprigConfig =
            serde_json::from_str(r#"{"port": 9000, "optimizer": {"api_key": "k"}}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.optimizer.api_key.as_deref(), Some("k"));
        assert_eq!(config.optimizer.max_width, 1024);
        assert_eq!(config.labels.rows, 7);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = SprigConfig::default();
        assert!(config.set(ConfigKey::Port, "seventy").is_err());
        assert!(config.set(ConfigKey::Bind, "everywhere").is_err());
        assert!(config.set(ConfigKey::LabelRows, "0").is_err());
        assert_eq!(config, SprigConfig::default());
    }

    #[test]
    fn test_empty_base_url_clears_override() {
        let mut config = SprigConfig::default();
        config.set(ConfigKey::BaseUrl, "http://plants.local").unwrap();
        assert_eq!(config.label_base_url(), "http://plants.local");
        config.set(ConfigKey::BaseUrl, "").unwrap();
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_base_url_never_points_at_unspecified_address() {
        let config = SprigConfig::default();
        assert_eq!(config.bind.host(), IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        let url = config.label_base_url();
        let host = url
            .strip_prefix("http://")
            .and_then(|rest| rest.strip_suffix(":5000"))
            .unwrap();
        assert!(!host.parse::<IpAddr>().unwrap().is_unspecified());
    }

    #[test]
    fn test_config_key_names_roundtrip() {
        for key in ConfigKey::ALL {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), key);
        }
        assert!("file-ext".parse::<ConfigKey>().is_err());
    }
}
