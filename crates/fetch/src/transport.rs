//! Network transport for tarball downloads.

use reqwest::blocking::Client;
use std::io::Write;
use tracing::debug;

use crate::{Error, Result};

/// Downloads a URL into a writer.
pub trait Transport {
    /// Stream the body of `url` into `dest`, returning the byte count.
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// [`Transport`] over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a srcfetch user agent.
    pub fn new() -> Result<Self> {
        // Another component may already have installed a provider; either way one is set.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = Client::builder()
            .user_agent(concat!("srcfetch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        debug!(%url, "Downloading");

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::download(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::download(url, format!("HTTP {}", response.status())));
        }

        let bytes =
            std::io::copy(&mut response, dest).map_err(|e| Error::download(url, e.to_string()))?;
        debug!(%url, bytes, "Download complete");
        Ok(bytes)
    }
}
