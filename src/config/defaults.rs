/// Configuration default values
///
/// All default values for configuration options live here so they can be
/// changed in one place.
// Fetch defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// Ingestion defaults
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;
pub const DEFAULT_FAILURE_LABEL: &str = "Error: could not fetch playlist";

// Player defaults
pub const DEFAULT_PLAYER_COMMAND: &str = "vlc";

// Config file lookup
pub const DEFAULT_CONFIG_FILE: &str = "iptv-catalog.toml";
pub const ENV_PREFIX: &str = "IPTV_CATALOG_";
