use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ServerError {
    pub fn bind<S: ToString>(address: S, source: io::Error) -> Self {
        Self::Bind { address: address.to_string(), source }
    }
}

/// Failures talking to the proxy upstream.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("upstream request failed: {source}")]
    Upstream {
        #[from]
        source: reqwest::Error,
    },
}
