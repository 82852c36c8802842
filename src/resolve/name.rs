//! Fully-qualified names

use std::fmt;

/// A dot-separated fully-qualified name such as `org.example.MyMojo`.
///
/// The root name is the empty string and stands for the default package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FqName(String);

impl FqName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last segment of the name
    pub fn short_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or("")
    }

    /// Everything before the last segment; the root for single-segment names
    pub fn parent(&self) -> FqName {
        match self.0.rfind('.') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        }
    }

    pub fn child(&self, name: &str) -> FqName {
        if self.is_root() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    /// Append several segments at once
    pub fn descendant<'a, I>(&self, segments: I) -> FqName
    where
        I: IntoIterator<Item = &'a str>,
    {
        segments
            .into_iter()
            .fold(self.clone(), |name, segment| name.child(segment))
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// `kotlin.collections` starts with `kotlin`, but not with `kot`
    pub fn starts_with(&self, prefix: &FqName) -> bool {
        prefix.is_root()
            || self.0 == prefix.0
            || (self.0.starts_with(&prefix.0) && self.0[prefix.0.len()..].starts_with('.'))
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FqName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
