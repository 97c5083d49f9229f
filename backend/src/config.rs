use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use anyhow::Context;

/// Overrides the listen address, e.g. `127.0.0.1:8080`.
pub const ADDR_ENV: &str = "LIGHTS_OUT_ADDR";

/// Fixed port the desktop client expects.
pub const DEFAULT_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 7000));

/// Used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: DEFAULT_ADDR }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let Some(raw) = lookup(ADDR_ENV) else {
            return Ok(Self::default());
        };
        let addr = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {ADDR_ENV} value {raw:?}"))?;
        Ok(Self { addr })
    }
}
