//! Output naming and code-splitting policy.
//!
//! Client entry files carry a hash of the whole build so any change busts
//! the browser cache; split chunks carry a hash of their own contents so an
//! edit to one chunk leaves the others cacheable. The server bundle is one
//! file with a fixed name.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::types::{ChunkSelection, LibraryTarget};

/// Hash length used when a placeholder does not give one.
pub const DEFAULT_HASH_LENGTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Name,
    Id,
    Ext,
    BuildHash(Option<usize>),
    ChunkHash(Option<usize>),
}

/// Parsed output filename template, e.g. `[name].[chunkhash:8].js`.
///
/// Supported placeholders: `[name]`, `[id]`, `[ext]`, `[hash]`,
/// `[chunkhash]` and `[contenthash]`; the hash placeholders accept a length
/// suffix such as `[hash:8]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilenameTemplate {
    raw: String,
    segments: Vec<Segment>,
}

/// Values substituted into a [`FilenameTemplate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameContext<'a> {
    pub name: &'a str,
    pub id: usize,
    pub ext: &'a str,
    pub build_hash: &'a str,
    pub chunk_hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TemplateError(String);

impl FilenameTemplate {
    pub fn parse(raw: &str) -> std::result::Result<Self, TemplateError> {
        if raw.trim().is_empty() {
            return Err(TemplateError("template is empty".to_string()));
        }

        let mut segments = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find('[') {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 1..];
            let close = after
                .find(']')
                .ok_or_else(|| TemplateError(format!("unclosed placeholder at `{}`", &rest[open..])))?;
            segments.push(parse_placeholder(&after[..close])?);
            rest = &after[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether rendered names depend on file contents.
    pub fn has_hash(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::BuildHash(_) | Segment::ChunkHash(_)))
    }

    pub fn render(&self, ctx: &FilenameContext<'_>) -> String {
        let mut out = String::with_capacity(self.raw.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Name => out.push_str(ctx.name),
                Segment::Id => out.push_str(&ctx.id.to_string()),
                Segment::Ext => out.push_str(ctx.ext),
                Segment::BuildHash(len) => out.push_str(truncate(ctx.build_hash, *len)),
                Segment::ChunkHash(len) => out.push_str(truncate(ctx.chunk_hash, *len)),
            }
        }
        out
    }
}

fn parse_placeholder(inner: &str) -> std::result::Result<Segment, TemplateError> {
    let (kind, len) = match inner.split_once(':') {
        Some((kind, len)) => {
            let len: usize = len
                .parse()
                .map_err(|_| TemplateError(format!("invalid hash length in `[{inner}]`")))?;
            if len == 0 {
                return Err(TemplateError(format!("hash length must be positive in `[{inner}]`")));
            }
            (kind, Some(len))
        }
        None => (inner, None),
    };

    match (kind, len) {
        ("name", None) => Ok(Segment::Name),
        ("id", None) => Ok(Segment::Id),
        ("ext", None) => Ok(Segment::Ext),
        ("hash", len) => Ok(Segment::BuildHash(len)),
        ("chunkhash" | "contenthash", len) => Ok(Segment::ChunkHash(len)),
        _ => Err(TemplateError(format!("unknown placeholder `[{inner}]`"))),
    }
}

fn truncate(hash: &str, len: Option<usize>) -> &str {
    let len = len.unwrap_or(DEFAULT_HASH_LENGTH).min(hash.len());
    &hash[..len]
}

impl TryFrom<String> for FilenameTemplate {
    type Error = TemplateError;

    fn try_from(raw: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<FilenameTemplate> for String {
    fn from(template: FilenameTemplate) -> Self {
        template.raw
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Where and how a profile writes its files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPolicy {
    /// Absolute output directory
    pub path: PathBuf,

    /// URL prefix the files are served from
    pub public_path: String,

    /// Template for entry files
    pub filename: FilenameTemplate,

    /// Template for split chunks
    pub chunk_filename: FilenameTemplate,

    /// Remove stale files from `path` before emitting
    pub clean: bool,

    pub library_target: LibraryTarget,
}

/// Forced grouping of matching modules into one named chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheGroup {
    pub name: String,

    /// Regex matched against the resolved module path
    pub test: String,

    pub chunks: ChunkSelection,

    /// Create the group even below the default size threshold
    pub enforce: bool,

    /// Groups with higher priority win; default grouping is 0
    pub priority: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPolicy {
    #[serde(default)]
    pub cache_groups: Vec<CacheGroup>,

    /// Upper bound on emitted chunks; `None` means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chunks: Option<usize>,
}

/// Remove everything under `dir` and recreate it empty.
pub fn clean_output_dir(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => tracing::debug!(dir = %dir.display(), "removed previous build output"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}
