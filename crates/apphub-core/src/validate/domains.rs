use std::collections::BTreeMap;

use crate::error::ValidationError;

/// Host of `href`, lowercased, with one leading `www.` removed.
///
/// # Example
///
/// ```
/// use apphub_core::validate::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.Example.com/app").as_deref(), Some("example.com"));
/// assert_eq!(normalize_domain("http://dapp.io:3000").as_deref(), Some("dapp.io"));
/// ```
pub fn normalize_domain(href: &str) -> Option<String> {
    let host = match url::Url::parse(href) {
        Ok(u) => u.host_str().map(str::to_lowercase),
        Err(_) => apphub_schema::pattern::url_host(href).map(str::to_lowercase),
    }?;
    if let Some(rest) = host.strip_prefix("www.") {
        return Some(rest.to_string());
    }
    Some(host)
}

/// Accumulates domain -> name -> owning app ids across a batch.
#[derive(Debug, Default, Clone)]
pub struct DomainIndex {
    domains: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl DomainIndex {
    /// Record one app. Apps whose `href` has no host are not indexed.
    pub fn insert(&mut self, app_id: &str, name: &str, href: &str) {
        let Some(domain) = normalize_domain(href) else {
            tracing::debug!(app = app_id, href, "no host in href, skipping domain index");
            return;
        };
        self.domains
            .entry(domain)
            .or_default()
            .entry(name.to_string())
            .or_default()
            .push(app_id.to_string());
    }

    /// Every (domain, name) pair claimed by more than one app, in domain order.
    pub fn duplicates(&self) -> Vec<ValidationError> {
        let mut out = Vec::new();
        for (domain, names) in &self.domains {
            for (name, apps) in names {
                if apps.len() > 1 {
                    out.push(ValidationError::DuplicateNameForDomain {
                        domain: domain.clone(),
                        name: name.clone(),
                        apps: apps.clone(),
                    });
                }
            }
        }
        out
    }

    /// Fail on the first duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateNameForDomain`] listing every app
    /// sharing the domain and name.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self.duplicates().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Check a batch of `(app id, name, href)` for duplicate names per domain.
///
/// # Errors
///
/// Returns [`ValidationError::DuplicateNameForDomain`] for the first offending
/// domain.
pub fn check_unique_domains<'a, I>(apps: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut index = DomainIndex::default();
    for (id, name, href) in apps {
        index.insert(id, name, href);
    }
    index.check()
}
