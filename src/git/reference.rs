use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::error::VdiffError;

// Leading hash on a line, e.g. `git log --oneline` output.
static COMMIT_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-fA-F0-9]{5,40})\b").expect("valid commit regex"));
static STASH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(stash@\{\d+\})").expect("valid stash regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Commit,
    Stash,
}

/// A validated commit hash or stash slot, exactly as it appeared in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    id: String,
    kind: ReferenceKind,
}

impl Reference {
    /// Match the leading part of `token` against the accepted shapes.
    /// Commit hashes are tried before stash slots.
    pub fn parse(token: &str) -> Option<Self> {
        if let Some(m) = COMMIT_HASH.captures(token).and_then(|c| c.get(1)) {
            return Some(Self {
                id: m.as_str().to_string(),
                kind: ReferenceKind::Commit,
            });
        }
        STASH_ID
            .captures(token)
            .and_then(|c| c.get(1))
            .map(|m| Self {
                id: m.as_str().to_string(),
                kind: ReferenceKind::Stash,
            })
    }

    /// Like [`Reference::parse`] but reports a rejected token as an error.
    pub fn validate(token: &str) -> Result<Self, VdiffError> {
        Self::parse(token).ok_or_else(|| VdiffError::InvalidReference(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Short form for status lines: hashes are cut to 7 chars.
    pub fn short(&self) -> &str {
        match self.kind {
            ReferenceKind::Commit if self.id.len() > 7 => &self.id[..7],
            _ => &self.id,
        }
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
