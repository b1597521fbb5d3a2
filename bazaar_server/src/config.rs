use std::env;

use bazaar_common::helpers::{parse_boolean_flag, parse_env_value};
use bazaar_engine::helpers::Network;
use log::*;

const DEFAULT_BZR_HOST: &str = "127.0.0.1";
const DEFAULT_BZR_PORT: u16 = 8380;
const DEFAULT_NOTIFICATION_BUFFER: usize = 64;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The network whose address version bytes are used when reading payment output scripts.
    pub network: Network,
    /// The capacity of the outbound notification channel. When it is full, reconciliation waits for the consumer.
    pub notification_buffer: usize,
    /// If true, every notification payload is written to the log at info level.
    pub log_notifications: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BZR_HOST.to_string(),
            port: DEFAULT_BZR_PORT,
            network: Network::Mainnet,
            notification_buffer: DEFAULT_NOTIFICATION_BUFFER,
            log_notifications: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to its value. Values that cannot be used
    /// are logged and replaced by their defaults.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let host = lookup("BZR_HOST").unwrap_or_else(|| DEFAULT_BZR_HOST.into());
        let port = parse_env_value(lookup("BZR_PORT"), DEFAULT_BZR_PORT).unwrap_or_else(|s| {
            error!("🪛️ {s} is not a valid port for BZR_PORT. Using the default, {DEFAULT_BZR_PORT}, instead.");
            DEFAULT_BZR_PORT
        });
        let network = parse_env_value(lookup("BZR_NETWORK"), Network::Mainnet).unwrap_or_else(|s| {
            error!(
                "🪛️ {s} is not a valid network for BZR_NETWORK. Use one of mainnet, testnet or regtest. Using mainnet."
            );
            Network::Mainnet
        });
        let buffer = parse_env_value(lookup("BZR_NOTIFICATION_BUFFER"), DEFAULT_NOTIFICATION_BUFFER);
        let notification_buffer = match buffer {
            Ok(0) => {
                warn!(
                    "🪛️ BZR_NOTIFICATION_BUFFER must be at least 1. Using the default, {DEFAULT_NOTIFICATION_BUFFER}."
                );
                DEFAULT_NOTIFICATION_BUFFER
            },
            Ok(n) => n,
            Err(s) => {
                error!(
                    "🪛️ {s} is not a valid size for BZR_NOTIFICATION_BUFFER. Using the default, \
                     {DEFAULT_NOTIFICATION_BUFFER}."
                );
                DEFAULT_NOTIFICATION_BUFFER
            },
        };
        let log_notifications = parse_boolean_flag(lookup("BZR_LOG_NOTIFICATIONS"), true);
        Self { host, port, network, notification_buffer, log_notifications }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8380);
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.notification_buffer, 64);
        assert!(config.log_notifications);
        let config = ServerConfig::new("0.0.0.0", 9000);
        assert_eq!(config.port, 9000);
        assert_eq!(config.notification_buffer, 64);
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("BZR_HOST", "0.0.0.0"),
            ("BZR_PORT", "9100"),
            ("BZR_NETWORK", "testnet"),
            ("BZR_NOTIFICATION_BUFFER", "8"),
            ("BZR_LOG_NOTIFICATIONS", "false"),
        ]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9100);
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.notification_buffer, 8);
        assert!(!config.log_notifications);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let _ = env_logger::try_init();
        let config = config_from(&[
            ("BZR_PORT", "abc"),
            ("BZR_NETWORK", "dogecoin"),
            ("BZR_NOTIFICATION_BUFFER", "0"),
            ("BZR_LOG_NOTIFICATIONS", "maybe"),
        ]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8380);
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.notification_buffer, 64);
        assert!(config.log_notifications);
        let config = config_from(&[("BZR_NOTIFICATION_BUFFER", "-3")]);
        assert_eq!(config.notification_buffer, 64);
    }
}
