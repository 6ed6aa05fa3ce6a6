//! Clone URL construction

use crate::error::{Error, Result};
use url::Url;

/// Builds clone URLs for one organization's assignment repositories
///
/// Classroom repositories are named `<assignment>-<student identifier>`.
#[derive(Debug, Clone)]
pub struct RepoLocator {
    host: String,
    organization: String,
    token: Option<String>,
}

impl RepoLocator {
    /// Create a locator for `host` (e.g. `github.com`) and an organization login
    pub fn new(host: &str, organization: &str, token: Option<String>) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            organization: organization.to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// URL without credentials, safe to show to the operator
    pub fn display_url(&self, assignment: &str, student: &str) -> Result<String> {
        Ok(self.base_url(assignment, student)?.to_string())
    }

    /// URL carrying the access token, for the clone itself
    pub fn clone_url(&self, assignment: &str, student: &str) -> Result<String> {
        let mut url = self.base_url(assignment, student)?;
        if let Some(token) = &self.token {
            url.set_username(token)
                .map_err(|()| Error::Parse(format!("cannot add credentials to {url}")))?;
        }
        Ok(url.to_string())
    }

    /// Replace the access token in git diagnostics
    pub fn redact(&self, text: &str) -> String {
        self.token
            .as_deref()
            .map_or_else(|| text.to_string(), |token| redact(text, token))
    }

    fn base_url(&self, assignment: &str, student: &str) -> Result<Url> {
        let raw = format!(
            "https://{}/{}/{assignment}-{student}.git",
            self.host, self.organization
        );
        Url::parse(&raw).map_err(|e| Error::Parse(format!("invalid clone URL {raw}: {e}")))
    }
}

/// Remove any userinfo from a URL; non-URLs are returned unchanged
pub fn strip_credentials(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let _ = parsed.set_username("");
            let _ = parsed.set_password(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Replace every occurrence of `secret` in `text`
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        text.to_string()
    } else {
        text.replace(secret, "***")
    }
}
