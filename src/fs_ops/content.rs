//! Content names: the entries under the source root that get relocated.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use crate::errors::LswapError;

/// A single entry name directly under a root (no separators, not `.`/`..`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentName(String);

impl ContentName {
    pub fn new(raw: impl Into<String>) -> Result<Self, LswapError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(LswapError::EmptyContentName);
        }
        if raw.contains('/') || raw.contains(std::path::MAIN_SEPARATOR) {
            return Err(LswapError::InvalidContentName(raw));
        }
        let mut comps = Path::new(&raw).components();
        match (comps.next(), comps.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(raw)),
            _ => Err(LswapError::InvalidContentName(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for ContentName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for ContentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty, duplicate-free list of content names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentList(Vec<ContentName>);

impl ContentList {
    /// Build from already-split names.
    pub fn new<I, S>(names: I) -> Result<Self, LswapError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for raw in names {
            let name = ContentName::new(raw)?;
            if !seen.insert(name.clone()) {
                return Err(LswapError::DuplicateContent(name.0));
            }
            out.push(name);
        }
        if out.is_empty() {
            return Err(LswapError::MissingInput("contents"));
        }
        Ok(Self(out))
    }

    /// Build from comma-delimited chunks, as given on the command line or in
    /// the config file. `"a,b"` and `["a", "b"]` produce the same list.
    pub fn from_delimited<I, S>(chunks: I) -> Result<Self, LswapError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = Vec::new();
        for chunk in chunks {
            names.extend(chunk.as_ref().split(',').map(str::to_string));
        }
        Self::new(names)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentName> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ContentList {
    type Item = &'a ContentName;
    type IntoIter = std::slice::Iter<'a, ContentName>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromStr for ContentList {
    type Err = LswapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_delimited([s])
    }
}

impl fmt::Display for ContentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name.as_str())?;
        }
        Ok(())
    }
}
