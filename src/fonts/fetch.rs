use std::{io::Read, time::Duration};

use crate::foundation::{
    config::FontPolicy,
    error::{BadgeError, BadgeResult},
};

/// Upper bound on a single stylesheet or font binary.
const MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

/// Source of font stylesheets and binaries.
///
/// Implementations must be shareable across the threads that fetch imports in parallel.
pub trait FontFetcher: Send + Sync {
    fn fetch_text(&self, url: &str) -> BadgeResult<String>;
    fn fetch_bytes(&self, url: &str) -> BadgeResult<Vec<u8>>;
}

/// Blocking HTTP fetcher.
#[derive(Clone, Debug)]
pub struct HttpFontFetcher {
    agent: ureq::Agent,
}

impl HttpFontFetcher {
    pub fn new(policy: &FontPolicy) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(policy.timeout_secs))
            .user_agent(&policy.user_agent)
            .build();
        Self { agent }
    }

    fn get(&self, url: &str) -> BadgeResult<ureq::Response> {
        self.agent
            .get(url)
            .call()
            .map_err(|e| BadgeError::font_fetch(format!("GET {url}: {e}")))
    }
}

impl FontFetcher for HttpFontFetcher {
    fn fetch_text(&self, url: &str) -> BadgeResult<String> {
        let mut body = String::new();
        self.get(url)?
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_string(&mut body)
            .map_err(|e| BadgeError::font_fetch(format!("read {url}: {e}")))?;
        Ok(body)
    }

    fn fetch_bytes(&self, url: &str) -> BadgeResult<Vec<u8>> {
        let mut body = Vec::new();
        self.get(url)?
            .into_reader()
            .take(MAX_RESPONSE_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| BadgeError::font_fetch(format!("read {url}: {e}")))?;
        Ok(body)
    }
}
