use std::collections::HashMap;

/// Process configuration, loaded once at startup from environment variables
/// (optionally pre-populated from a `.env` file, mirroring the original's
/// `pydantic-settings` `env_file=".env"` behavior).
#[derive(Debug, Clone)]
pub struct Config {
    /// Which GT06 location variant outbound packets are built with.
    pub gt06_location_packet_protocol_number: u8,
    /// `outputProtocol -> (host, port)` for downstream session addresses.
    pub output_protocol_host_addresses: HashMap<String, (String, u16)>,
    /// Key into `output_protocol_host_addresses`, assigned to a device the
    /// first time it is observed.
    pub default_output_protocol: String,
    /// Input sources to start, by capability-registry name (e.g. `mt02`).
    pub workers_input_source: Vec<String>,
    pub mt02_api_base_url: String,
    pub mt02_api_token: String,
    pub mt02_poll_interval_secs: u64,
    pub store_backend: StoreBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: String,
    pub redis_db: i64,
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

impl Config {
    /// Loads configuration from the process environment, applying the
    /// documented defaults for every optional knob.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gt06_location_packet_protocol_number = match env_opt("GT06_LOCATION_PACKET_PROTOCOL_NUMBER") {
            Some(raw) => parse_protocol_number(&raw)?,
            None => 0xA0,
        };

        let output_protocol_host_addresses = match env_opt("OUTPUT_PROTOCOL_HOST_ADRESSES") {
            Some(raw) => parse_host_addresses(&raw)?,
            None => HashMap::new(),
        };

        let default_output_protocol =
            env_opt("DEFAULT_OUTPUT_PROTOCOL").unwrap_or_else(|| "gt06".to_string());

        let workers_input_source = match env_opt("WORKERS_INPUT_SOURCE") {
            Some(raw) => parse_input_sources(&raw)?,
            None => vec!["mt02".to_string()],
        };

        let mt02_api_base_url =
            env_opt("MT02_API_BASE_URL").unwrap_or_else(|| "https://api.mt02.example.com".to_string());
        let mt02_api_token = env_opt("MT02_API_KEY").unwrap_or_default();
        let mt02_poll_interval_secs = match env_opt("MT02_POLL_INTERVAL_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("MT02_POLL_INTERVAL_SECS", raw))?,
            None => 30,
        };

        let store_backend = match env_opt("STORE_BACKEND").as_deref() {
            Some("redis") => StoreBackend::Redis,
            Some("memory") | None => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string()));
            }
        };
        let redis_host = env_opt("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let redis_port = match env_opt("REDIS_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("REDIS_PORT", raw))?,
            None => 6379,
        };
        let redis_password = env_opt("REDIS_PASSWORD").unwrap_or_default();
        let redis_db = match env_opt("REDIS_DB") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("REDIS_DB", raw))?,
            None => 0,
        };

        let log_level = env_opt("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            gt06_location_packet_protocol_number,
            output_protocol_host_addresses,
            default_output_protocol,
            workers_input_source,
            mt02_api_base_url,
            mt02_api_token,
            mt02_poll_interval_secs,
            store_backend,
            redis_host,
            redis_port,
            redis_password,
            redis_db,
            log_level,
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_protocol_number(raw: &str) -> Result<u8, ConfigError> {
    let trimmed = raw.trim_start_matches("0x").trim_start_matches("0X");
    let value =
        u8::from_str_radix(trimmed, 16).map_err(|_| ConfigError::Invalid("GT06_LOCATION_PACKET_PROTOCOL_NUMBER", raw.to_string()))?;
    if trackgate_gt06::LOCATION_PROTOCOLS.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::Invalid(
            "GT06_LOCATION_PACKET_PROTOCOL_NUMBER",
            raw.to_string(),
        ))
    }
}

/// Parses `{"gt06": ["host", port], ...}` — a JSON-encoded map, since
/// environment variables are flat strings but this knob is shaped like a map.
fn parse_host_addresses(raw: &str) -> Result<HashMap<String, (String, u16)>, ConfigError> {
    serde_json::from_str::<HashMap<String, (String, u16)>>(raw)
        .map_err(|e| ConfigError::Invalid("OUTPUT_PROTOCOL_HOST_ADRESSES", e.to_string()))
}

/// Parses `["mt02", ...]` — the set of capability-registry source names to
/// start; the registry resolves each name to its statically compiled
/// `InputSource`, replacing the original's per-source `{module, worker}`
/// dynamic import.
fn parse_input_sources(raw: &str) -> Result<Vec<String>, ConfigError> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|e| ConfigError::Invalid("WORKERS_INPUT_SOURCE", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_number_accepts_every_documented_variant() {
        for raw in ["0x12", "0x22", "0x32", "0xA0", "0xa0"] {
            assert!(parse_protocol_number(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn protocol_number_rejects_unknown_values() {
        assert!(parse_protocol_number("0x99").is_err());
        assert!(parse_protocol_number("not-hex").is_err());
    }

    #[test]
    fn host_addresses_parse_a_map_of_host_port_pairs() {
        let parsed = parse_host_addresses(r#"{"gt06": ["tracking.example.com", 5023]}"#).unwrap();
        assert_eq!(
            parsed.get("gt06"),
            Some(&("tracking.example.com".to_string(), 5023))
        );
    }

    #[test]
    fn input_sources_parse_a_json_array() {
        assert_eq!(parse_input_sources(r#"["mt02"]"#).unwrap(), vec!["mt02".to_string()]);
    }
}
