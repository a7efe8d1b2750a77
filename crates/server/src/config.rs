//! Command line arguments and the server configuration they produce.

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 42069;

/// Serve the httpfromtcp routes over a hand-written HTTP/1.1 stack
#[derive(Parser, Debug)]
#[command(name = "httpfromtcp", version, about, long_about = None)]
pub struct Cli {
    /// Host name or address to listen on
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// File served by the /video route
    #[arg(long, default_value = "assets/vim.mp4")]
    pub video: PathBuf,

    /// Base URL that /httpbin/<path> is proxied to
    #[arg(long, default_value = "https://httpbin.org")]
    pub upstream: String,

    /// Maximum level of the log output
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            video_path: self.video,
            upstream: self.upstream.trim_end_matches('/').to_string(),
        }
    }
}

/// Everything the server needs to know to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub video_path: PathBuf,
    /// Upstream base URL without a trailing slash
    pub upstream: String,
}

impl ServerConfig {
    /// The `host:port` pair to bind.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            video_path: PathBuf::from("assets/vim.mp4"),
            upstream: "https://httpbin.org".to_string(),
        }
    }
}
