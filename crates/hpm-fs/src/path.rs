//! Slash-normalized paths
//!
//! Package configs are written on Windows as often as not, so every path that
//! is compared with another one (config values, `HOUDINI_PATH` entries,
//! directory listings) is normalized first: `\` becomes `/` and trailing
//! separators are dropped, so `C:\plugins\` and `C:/plugins` are equal.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A path stored with forward slashes and no trailing separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(normalize(&path.as_ref().to_string_lossy()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Platform path for filesystem calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Append `segment`, which may itself contain separators of either kind.
    pub fn join(&self, segment: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        Self(normalize(&format!("{base}/{segment}")))
    }

    /// Everything before the last separator. The root has no parent.
    pub fn parent(&self) -> Option<Self> {
        let (head, _) = self.0.rsplit_once('/')?;
        match head {
            "" if self.0.len() > 1 => Some(Self("/".to_string())),
            "" => None,
            head => Some(Self(head.to_string())),
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        let name = self.0.rsplit('/').next()?;
        (!name.is_empty()).then_some(name)
    }

    /// File name without its extension: `mops` for `packages/mops.json`.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_name().map(|name| split_extension(name).0)
    }

    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| split_extension(name).1)
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Split at the last dot. A leading dot (`.hidden`) is not an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
    }
}

/// Trailing separators are trimmed except on roots such as `/` or `C:/`.
fn normalize(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let trimmed = slashed.trim_end_matches('/');
    if trimmed.is_empty() && !slashed.is_empty() {
        return "/".to_string();
    }
    if is_drive(trimmed) && slashed.len() > trimmed.len() {
        return format!("{trimmed}/");
    }
    trimmed.to_string()
}

/// `C:` and friends.
fn is_drive(path: &str) -> bool {
    matches!(path.as_bytes(), [letter, b':'] if letter.is_ascii_alphabetic())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for NormalizedPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NormalizedPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
