use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Runtime configuration, read from flags with environment fallbacks.
#[derive(Debug, Clone, Parser)]
#[command(name = "linkpane", version, about = "Browse two directory trees and hard-link between them")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "LINKPANE_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory the client opens first.
    #[arg(long, env = "DEFAULT_DIR", default_value = "/data")]
    pub default_dir: PathBuf,

    /// Progress events buffered per link session before the engine waits on the socket.
    #[arg(long, env = "LINKPANE_CHANNEL_CAPACITY", default_value_t = 64)]
    pub channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            default_dir: PathBuf::from("/data"),
            channel_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let config = Config::try_parse_from([
            "linkpane",
            "--bind",
            "0.0.0.0:9000",
            "--default-dir",
            "/srv/media",
            "--channel-capacity",
            "8",
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.default_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.channel_capacity, 8);
    }
}
