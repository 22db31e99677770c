//! # Configuration
//!
//! Every value the port mapping flow depends on (SSDP target, control path,
//! LAN client address, lease...) lives in [`IgdConfig`].
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. the defaults embedded from `pmoigd.yaml`
//! 2. a user `config.yaml` file (explicit path, `PMOIGD_CONFIG`,
//!    `./.pmoigd/config.yaml`, then `~/.pmoigd/config.yaml`)
//! 3. environment variables `PMOIGD_CONFIG__<KEY>`
//!
//! ```no_run
//! use pmoigd::IgdConfig;
//!
//! let config = IgdConfig::load(None)?;
//! println!("searching for {}", config.device_type);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::{
    env, fs,
    net::{SocketAddr, UdpSocket},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::soap::WAN_IP_CONNECTION_NS;

// Embedded defaults
const DEFAULT_CONFIG: &str = include_str!("pmoigd.yaml");

const ENV_CONFIG_FILE: &str = "PMOIGD_CONFIG";
const ENV_PREFIX: &str = "PMOIGD_CONFIG__";
const CONFIG_DIR_NAME: &str = ".pmoigd";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Address used when the LAN address cannot be guessed.
const FALLBACK_LOCAL_IP: &str = "127.0.0.1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgdConfig {
    /// SSDP multicast group and port, `host:port`
    pub multicast_address: String,
    /// ST header of the M-SEARCH
    pub search_target: String,
    /// Token looked for in the ST header of the responses
    pub device_type: String,
    /// Length of the discovery window
    pub search_window_ms: u64,
    /// MX header of the M-SEARCH (seconds, at least 1)
    pub mx: u32,
    /// Service URN used for `xmlns:u` and the SOAPAction header
    pub service_type: String,
    /// Suffix appended to the device LOCATION to reach the control endpoint
    pub control_path: String,
    /// LAN address receiving the forwarded traffic, detected when absent
    pub internal_client: Option<String>,
    pub description: String,
    /// Lease in seconds, 0 for an indefinite mapping
    pub lease_duration: u32,
    /// SOAP request timeout, 0 disables it
    pub http_timeout_secs: u64,
}

impl Default for IgdConfig {
    fn default() -> Self {
        Self {
            multicast_address: "239.255.255.250:1900".to_string(),
            search_target: "ssdp:all".to_string(),
            device_type: "urn:schemas-upnp-org:device:InternetGatewayDevice".to_string(),
            search_window_ms: 3000,
            mx: 1,
            service_type: WAN_IP_CONNECTION_NS.to_string(),
            control_path: "/ctl/IPConn".to_string(),
            internal_client: None,
            description: "TestMapping".to_string(),
            lease_duration: 10,
            http_timeout_secs: 30,
        }
    }
}

impl IgdConfig {
    /// Loads the configuration using the process environment.
    ///
    /// A missing user file is not an error: the embedded defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env::vars())
    }

    /// Same as [`IgdConfig::load`] with an explicit set of environment
    /// variables.
    pub fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let mut value: Value =
            serde_yaml::from_str(DEFAULT_CONFIG).context("Invalid embedded configuration")?;

        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_config_file(&vars),
        };

        if let Some(file) = file {
            if file.exists() {
                let data = fs::read(&file)
                    .with_context(|| format!("Cannot read config file {}", file.display()))?;
                let external: Value = serde_yaml::from_slice(&data)
                    .with_context(|| format!("Invalid YAML in {}", file.display()))?;
                if !external.is_null() {
                    merge_yaml(&mut value, &external);
                }
                info!(config_file=%file.display(), "Loaded config file");
            } else {
                info!(config_file=%file.display(), "Config file not found, using defaults");
            }
        }

        apply_env_overrides(&mut value, &vars)?;

        let config: IgdConfig =
            serde_yaml::from_value(value).context("Invalid pmoigd configuration")?;
        debug!(?config, "Configuration resolved");
        Ok(config)
    }

    fn find_config_file(vars: &[(String, String)]) -> Option<PathBuf> {
        if let Some((_, path)) = vars.iter().find(|(k, _)| k == ENV_CONFIG_FILE) {
            info!(env_var = ENV_CONFIG_FILE, path=%path, "Trying to load config from env");
            return Some(PathBuf::from(path));
        }

        let local = Path::new(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|p| p.exists())
    }

    pub fn search_window(&self) -> Duration {
        Duration::from_millis(self.search_window_ms)
    }

    /// `None` when the timeout is disabled.
    pub fn http_timeout(&self) -> Option<Duration> {
        match self.http_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Configured LAN address, or the address of the interface holding the
    /// default route.
    pub fn resolve_internal_client(&self) -> String {
        match self.internal_client.as_deref().map(str::trim) {
            Some(ip) if !ip.is_empty() => ip.to_string(),
            _ => guess_local_ip(),
        }
    }
}

/// Guesses the LAN address by connecting a UDP socket (nothing is sent).
///
/// Falls back to `127.0.0.1` with a warning, which a gateway will forward
/// nowhere useful: set `internal_client` when this happens.
pub fn guess_local_ip() -> String {
    local_ip_towards(SocketAddr::from(([8, 8, 8, 8], 80)))
}

fn local_ip_towards(route_target: SocketAddr) -> String {
    let guessed = UdpSocket::bind("0.0.0.0:0")
        .and_then(|socket| {
            socket.connect(route_target)?;
            socket.local_addr()
        })
        .map(|addr| addr.ip());

    match guessed {
        Ok(ip) => {
            debug!(%ip, "Local address guessed");
            ip.to_string()
        }
        Err(e) => {
            warn!(
                "⚠️ Cannot guess the LAN address ({}), falling back to {}",
                e, FALLBACK_LOCAL_IP
            );
            FALLBACK_LOCAL_IP.to_string()
        }
    }
}

fn merge_yaml(base: &mut Value, other: &Value) {
    match (base, other) {
        (Value::Mapping(base_map), Value::Mapping(other_map)) => {
            for (k, v) in other_map {
                let key = lower_key(k);
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, v),
                    None => {
                        base_map.insert(key, v.clone());
                    }
                }
            }
        }
        (base, other) => *base = other.clone(),
    }
}

fn lower_key(key: &Value) -> Value {
    match key {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

fn apply_env_overrides(config: &mut Value, vars: &[(String, String)]) -> Result<()> {
    let map: &mut Mapping = config
        .as_mapping_mut()
        .ok_or_else(|| anyhow!("Configuration root is not a map"))?;

    for (key, value) in vars {
        if let Some(field) = key.strip_prefix(ENV_PREFIX) {
            let field = field.to_lowercase();
            debug!(field=%field, "Config override from environment");
            map.insert(Value::String(field), convert_env_value(value));
        }
    }
    Ok(())
}

fn convert_env_value(value: &str) -> Value {
    if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
        return parsed;
    }
    Value::String(value.to_string())
}
