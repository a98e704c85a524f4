//! HTTP entitlement check.

use async_trait::async_trait;
use flatconf_core::{Entitlement, EntitlementCheck};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Fixed timeout for the whole request.
pub const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Asks an HTTP endpoint whether this repository may run the tool.
///
/// Construction never fails: a bad URL or client setup error is reported as
/// `Entitlement::Unavailable` when the check runs.
pub struct HttpEntitlementCheck {
    url: String,
    repository: Option<String>,
    timeout: Duration,
}

impl HttpEntitlementCheck {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            repository: None,
            timeout: CHECK_TIMEOUT,
        }
    }

    /// Send the repository name as a `repository` query parameter.
    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository.filter(|r| !r.is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn request_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.url)
            .map_err(|err| format!("invalid entitlement URL {:?}: {}", self.url, err))?;
        if let Some(repository) = &self.repository {
            url.query_pairs_mut().append_pair("repository", repository);
        }
        Ok(url)
    }
}

/// Only 401 and 403 are treated as an explicit denial.
fn classify(status: StatusCode) -> Entitlement {
    if status.is_success() {
        Entitlement::Granted
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Entitlement::Denied(format!("entitlement service returned {}", status))
    } else {
        Entitlement::Unavailable(format!("entitlement service returned {}", status))
    }
}

#[async_trait]
impl EntitlementCheck for HttpEntitlementCheck {
    async fn check(&self) -> Entitlement {
        let url = match self.request_url() {
            Ok(url) => url,
            Err(reason) => return Entitlement::Unavailable(reason),
        };
        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(err) => return Entitlement::Unavailable(err.to_string()),
        };

        debug!(%url, "checking entitlement");
        match client.get(url).send().await {
            Ok(response) => classify(response.status()),
            Err(err) if err.is_timeout() => {
                Entitlement::Unavailable(format!("timed out after {:?}", self.timeout))
            }
            Err(err) => Entitlement::Unavailable(err.to_string()),
        }
    }
}
