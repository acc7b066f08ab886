use std::borrow::Borrow;
use std::fmt;

/// Binding-facing identifier derived from a raw descriptor name.
///
/// Produced only by [`NamingConfig::canonicalize`](crate::NamingConfig::canonicalize)
/// during ingestion, but constructible directly so downstream code can look entities up
/// by an identifier it already holds.
///
/// Implements `Borrow<str>`, so catalog maps keyed by `CanonicalName` can be queried
/// with a plain `&str`.
///
/// # Examples
///
/// ```
/// use vkbind_core::CanonicalName;
///
/// let name = CanonicalName::new("Extent2D");
/// assert_eq!(name.as_str(), "Extent2D");
/// assert_eq!(name.to_string(), "Extent2D");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CanonicalName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CanonicalName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CanonicalName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for CanonicalName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
