//! Buffer limits for the two sides of a call.

use tracing::warn;

/// Default capacity of a call's parameter buffer.
pub const DEFAULT_MAX_PARAMS_LEN: usize = 4096;
/// Default capacity of a call's response buffer.
pub const DEFAULT_MAX_RESPONSE_LEN: usize = 4096;

const ENV_MAX_RESPONSE_LEN: &str = "WIRERPC_MAX_RESPONSE_LEN";
const ENV_MAX_PARAMS_LEN: &str = "WIRERPC_MAX_PARAMS_LEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Capacity given to each call's parameter encoding.
    pub max_params_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { max_params_len: DEFAULT_MAX_PARAMS_LEN }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_params_len(mut self, len: usize) -> Self {
        self.max_params_len = len;
        self
    }

    /// Reads `WIRERPC_MAX_PARAMS_LEN`, keeping the default when absent or invalid.
    pub fn from_env() -> Self {
        Self { max_params_len: read_len(ENV_MAX_PARAMS_LEN, DEFAULT_MAX_PARAMS_LEN) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Size of the response buffer provisioned for every dispatch.
    pub max_response_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { max_response_len: DEFAULT_MAX_RESPONSE_LEN }
    }
}

impl ServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_response_len(mut self, len: usize) -> Self {
        self.max_response_len = len;
        self
    }

    /// Reads `WIRERPC_MAX_RESPONSE_LEN`, keeping the default when absent or invalid.
    pub fn from_env() -> Self {
        Self { max_response_len: read_len(ENV_MAX_RESPONSE_LEN, DEFAULT_MAX_RESPONSE_LEN) }
    }
}

fn read_len(var: &str, default: usize) -> usize {
    match std::env::var(var) {
        Ok(raw) => parse_len(var, &raw).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_len(var: &str, raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(len) if len > 0 => Some(len),
        _ => {
            warn!(var, value = raw, "ignoring invalid length");
            None
        }
    }
}
