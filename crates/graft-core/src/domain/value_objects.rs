//! Domain value objects: Identity, TemplateKey, Credential.
//!
//! These are pure value types with equality-by-value and no I/O. Each one
//! enforces its invariant at construction, so code holding an `Identity` or a
//! `TemplateKey` never has to re-check it.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Identity ─────────────────────────────────────────────────────────────────

/// A declared module identity, e.g. `github.com/acme/billing`.
///
/// Used both as the manifest declaration and as the required prefix of
/// internal import paths.
///
/// Invariant: non-empty, no whitespace, no quote characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidIdentity {
                identity: value,
                reason: "identity cannot be empty".into(),
            });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidIdentity {
                identity: value,
                reason: "identity cannot contain whitespace".into(),
            });
        }
        if trimmed.contains(['"', '`', '\\']) {
            return Err(DomainError::InvalidIdentity {
                identity: value,
                reason: "identity cannot contain quotes or backslashes".into(),
            });
        }
        if trimmed.starts_with('/') || trimmed.ends_with('/') {
            return Err(DomainError::InvalidIdentity {
                identity: value,
                reason: "identity cannot start or end with '/'".into(),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `path` is this identity or one of its sub-packages.
    ///
    /// `a/b` matches `a/b` and `a/b/sub` but never `a/bc`.
    pub fn is_prefix_of(&self, path: &str) -> bool {
        match path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Replace this identity's prefix in `path` with `to`.
    ///
    /// Returns `None` when `path` is not covered by this identity.
    pub fn rebase(&self, path: &str, to: &Identity) -> Option<String> {
        if !self.is_prefix_of(path) {
            return None;
        }
        let rest = &path[self.0.len()..];
        Some(format!("{}{}", to.0, rest))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

// ── TemplateKey ──────────────────────────────────────────────────────────────

/// Logical template identifier, e.g. `layered`.
///
/// Doubles as the cache entry key and the cache directory name, so it is
/// restricted to `[a-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateKey(String);

impl TemplateKey {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let normalized = value.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::InvalidTemplateKey {
                key: value,
                reason: "key cannot be empty".into(),
            });
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidTemplateKey {
                key: value,
                reason: "only letters, digits, '-' and '_' are allowed".into(),
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TemplateKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TemplateKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateKey> for String {
    fn from(key: TemplateKey) -> Self {
        key.0
    }
}

// ── Credential ───────────────────────────────────────────────────────────────

/// Bearer credential for private template remotes.
///
/// `Debug` and `Display` are redacted; the raw value is only reachable through
/// [`Credential::expose`], which the fetcher uses to build the clone URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for an empty or whitespace-only token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replace every occurrence of the secret in `text` with `***`.
    pub fn redact(&self, text: &str) -> String {
        text.replace(self.0.as_str(), "***")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Inject `credential` into the authority of `url`.
///
/// `https://github.com/org/repo.git` becomes
/// `https://<credential>@github.com/org/repo.git`. URLs without a scheme are
/// returned unchanged (local paths, scp-style remotes).
pub fn authenticated_url(url: &str, credential: Option<&Credential>) -> String {
    let Some(credential) = credential else {
        return url.to_string();
    };

    match url.split_once("://") {
        Some((scheme, rest)) => {
            // Drop any userinfo already present.
            let rest = match rest.split_once('/') {
                Some((authority, path)) => match authority.rsplit_once('@') {
                    Some((_, host)) => format!("{host}/{path}"),
                    None => rest.to_string(),
                },
                None => rest.rsplit_once('@').map_or(rest, |(_, h)| h).to_string(),
            };
            format!("{}://{}@{}", scheme, credential.expose(), rest)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_rejects_empty_and_whitespace() {
        assert!(Identity::new("").is_err());
        assert!(Identity::new("   ").is_err());
        assert!(Identity::new("github.com/a b").is_err());
    }

    #[test]
    fn identity_rejects_quotes() {
        assert!(Identity::new("github.com/\"x\"").is_err());
        assert!(Identity::new("github.com/x\\y").is_err());
    }

    #[test]
    fn identity_trims_surrounding_whitespace() {
        let id = Identity::new("  github.com/acme/api \n").unwrap();
        assert_eq!(id.as_str(), "github.com/acme/api");
    }

    #[test]
    fn identity_prefix_is_segment_exact() {
        let id = Identity::new("a/b").unwrap();
        assert!(id.is_prefix_of("a/b"));
        assert!(id.is_prefix_of("a/b/sub"));
        assert!(!id.is_prefix_of("a/bc"));
        assert!(!id.is_prefix_of("x/a/b"));
    }

    #[test]
    fn identity_rebase_keeps_remainder() {
        let old = Identity::new("a/b").unwrap();
        let new = Identity::new("x/y").unwrap();
        assert_eq!(old.rebase("a/b", &new).as_deref(), Some("x/y"));
        assert_eq!(old.rebase("a/b/sub/pkg", &new).as_deref(), Some("x/y/sub/pkg"));
        assert_eq!(old.rebase("a/bc", &new), None);
    }

    #[test]
    fn template_key_is_normalized() {
        let key = TemplateKey::new(" Layered ").unwrap();
        assert_eq!(key.as_str(), "layered");
    }

    #[test]
    fn template_key_rejects_path_characters() {
        assert!(TemplateKey::new("../etc").is_err());
        assert!(TemplateKey::new("a/b").is_err());
        assert!(TemplateKey::new("").is_err());
    }

    #[test]
    fn credential_is_redacted() {
        let cred = Credential::new("ghp_secret").unwrap();
        assert_eq!(format!("{cred:?}"), "Credential(***)");
        assert_eq!(cred.to_string(), "***");
        assert_eq!(
            cred.redact("fatal: https://ghp_secret@github.com denied"),
            "fatal: https://***@github.com denied"
        );
    }

    #[test]
    fn blank_credential_is_none() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("  ").is_none());
    }

    #[test]
    fn authenticated_url_injects_token() {
        let cred = Credential::new("tok").unwrap();
        assert_eq!(
            authenticated_url("https://github.com/org/repo.git", Some(&cred)),
            "https://tok@github.com/org/repo.git"
        );
    }

    #[test]
    fn authenticated_url_replaces_existing_userinfo() {
        let cred = Credential::new("tok").unwrap();
        assert_eq!(
            authenticated_url("https://old@github.com/org/repo.git", Some(&cred)),
            "https://tok@github.com/org/repo.git"
        );
    }

    #[test]
    fn authenticated_url_without_credential_is_unchanged() {
        assert_eq!(
            authenticated_url("https://github.com/org/repo.git", None),
            "https://github.com/org/repo.git"
        );
        let cred = Credential::new("tok").unwrap();
        assert_eq!(
            authenticated_url("/srv/git/repo.git", Some(&cred)),
            "/srv/git/repo.git"
        );
    }
}
