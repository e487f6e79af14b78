// fetch.rs
use crate::inspections::FeedError;
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("rat_inspect/", env!("CARGO_PKG_VERSION"));

/// The one network capability the lookup core needs: GET a URL, get bytes.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FeedError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FeedError> {
        (**self).fetch(url)
    }
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>, FeedError> {
        let start = Instant::now();

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .map_err(|e| FeedError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(host = url.host_str().unwrap_or("?"), %status, "fetch failed");
            return Err(FeedError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        debug!(
            host = url.host_str().unwrap_or("?"),
            path = url.path(),
            bytes = body.len(),
            elapsed = ?start.elapsed(),
            "fetch ok"
        );
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub mod fake {
    use super::Fetch;
    use crate::inspections::FeedError;
    use std::sync::Mutex;
    use url::Url;

    /// Answers requests from canned bodies. The first route whose needle is a
    /// substring of the (decoded) URL wins; unmatched URLs answer `[]`.
    #[derive(Default)]
    pub struct FakeFetch {
        routes: Vec<(String, Result<String, u16>)>,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeFetch {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, needle: &str, body: &str) -> Self {
            self.routes.push((needle.to_string(), Ok(body.to_string())));
            self
        }

        pub fn fail(mut self, needle: &str, status: u16) -> Self {
            self.routes.push((needle.to_string(), Err(status)));
            self
        }

        pub fn requested(&self) -> Vec<String> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    impl Fetch for FakeFetch {
        fn fetch(&self, url: &Url) -> Result<Vec<u8>, FeedError> {
            let decoded: String = url::form_urlencoded::parse(url.query().unwrap_or("").as_bytes())
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            let seen = format!("{}?{}", url.path(), decoded);

            if let Ok(mut r) = self.requests.lock() {
                r.push(seen.clone());
            }

            for (needle, answer) in &self.routes {
                if seen.contains(needle.as_str()) {
                    return match answer {
                        Ok(body) => Ok(body.clone().into_bytes()),
                        Err(status) => Err(FeedError::Status {
                            status: *status,
                            body: String::new(),
                        }),
                    };
                }
            }
            Ok(b"[]".to_vec())
        }
    }
}
