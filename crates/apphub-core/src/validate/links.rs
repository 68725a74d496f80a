use async_trait::async_trait;

use crate::Reporter;
use crate::error::{Error, Result, ValidationError};

/// Probe whether an `href` answers.
#[async_trait]
pub trait LinkProber: Send + Sync {
    /// `Ok` for a 2xx answer, otherwise the reason it failed.
    async fn probe(&self, url: &str) -> std::result::Result<(), String>;
}

/// [`LinkProber`] issuing a plain `GET`.
#[derive(Debug, Clone)]
pub struct HttpLinkProber {
    client: reqwest::Client,
}

impl HttpLinkProber {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LinkProber for HttpLinkProber {
    async fn probe(&self, url: &str) -> std::result::Result<(), String> {
        let resp = self.client.get(url).send().await.map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("status {status}"));
        }
        Ok(())
    }
}

/// Probe every `(app id, href)` pair in order, stopping at the first dead link.
///
/// With `wrap` set the failure is attributed to its app as
/// `check <id> -> <message>`.
///
/// # Errors
///
/// Returns [`ValidationError::UnreachableHref`] for the first failure.
pub async fn check_links(
    targets: &[(String, String)],
    links: &dyn LinkProber,
    wrap: bool,
    reporter: &dyn Reporter,
) -> Result<()> {
    for (id, href) in targets {
        tracing::debug!(app = %id, %href, "probing href");
        if let Err(reason) = links.probe(href).await {
            let err = Error::from(ValidationError::UnreachableHref {
                href: href.clone(),
                reason,
            });
            return Err(if wrap { err.in_app(id) } else { err });
        }
        reporter.checked(id);
    }
    tracing::info!(links = targets.len(), "all links reachable");
    Ok(())
}
