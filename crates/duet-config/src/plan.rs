//! Chunk planning: which module lands in which emitted file, and what that
//! file is called.
//!
//! The planner applies a profile's [`SplitPolicy`] to a flat list of
//! modules and renders filenames from its [`OutputPolicy`]. It is what
//! makes the naming guarantees observable without running a bundler.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ConfigError, Result};
use crate::externals::{ExternalsPolicy, module_package};
use crate::output::{CacheGroup, FilenameContext, OutputPolicy, SplitPolicy};
use crate::types::ChunkSelection;

/// Priority of the implicit "stay in the chunk that imported you" grouping.
pub const DEFAULT_GROUP_PRIORITY: i32 = 0;

/// How a module is reached from the entry points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleOrigin {
    /// Statically imported from the named entry point
    Entry(String),
    /// Behind the named dynamic import
    Dynamic(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModule {
    /// Resolved module path
    pub id: String,
    pub source: String,
    pub origin: ModuleOrigin,
}

impl SourceModule {
    pub fn new(id: impl Into<String>, source: impl Into<String>, origin: ModuleOrigin) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            origin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Entry,
    Group,
    Dynamic,
}

impl ChunkKind {
    pub fn is_initial(self) -> bool {
        !matches!(self, Self::Dynamic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedChunk {
    pub id: usize,
    pub name: String,
    pub kind: ChunkKind,
    pub modules: Vec<String>,
    pub hash: String,
    pub file: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Hash of the whole build
    pub hash: String,
    pub chunks: Vec<PlannedChunk>,

    /// Packages left for the runtime to load, sorted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub externals: Vec<String>,
}

impl BuildPlan {
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.chunks.iter().map(|chunk| chunk.file.as_str())
    }

    pub fn chunk(&self, name: &str) -> Option<&PlannedChunk> {
        self.chunks.iter().find(|chunk| chunk.name == name)
    }
}

struct CompiledGroup<'a> {
    group: &'a CacheGroup,
    test: Regex,
}

impl CompiledGroup<'_> {
    fn applies_to(&self, module: &SourceModule) -> bool {
        let selected = match (&module.origin, self.group.chunks) {
            (_, ChunkSelection::All) => true,
            (ModuleOrigin::Entry(_), ChunkSelection::Initial) => true,
            (ModuleOrigin::Dynamic(_), ChunkSelection::Async) => true,
            _ => false,
        };
        selected && self.test.is_match(&module.id)
    }

    fn beats_default(&self) -> bool {
        self.group.enforce || self.group.priority > DEFAULT_GROUP_PRIORITY
    }
}

struct DraftChunk<'m> {
    name: String,
    kind: ChunkKind,
    modules: Vec<&'m SourceModule>,
}

impl DraftChunk<'_> {
    fn size(&self) -> usize {
        self.modules.iter().map(|m| m.source.len()).sum()
    }
}

/// Applies a profile's splitting and naming policy to a module list.
pub struct ChunkPlanner<'a> {
    output: &'a OutputPolicy,
    groups: Vec<CompiledGroup<'a>>,
    max_chunks: Option<usize>,
    externals: Option<ExternalsPolicy>,
}

impl<'a> ChunkPlanner<'a> {
    pub fn new(output: &'a OutputPolicy, split: &'a SplitPolicy) -> Result<Self> {
        let groups = split
            .cache_groups
            .iter()
            .map(|group| {
                let test = Regex::new(&group.test).map_err(|source| ConfigError::InvalidPattern {
                    field: "split.cache_groups.test",
                    pattern: group.test.clone(),
                    source,
                })?;
                Ok(CompiledGroup { group, test })
            })
            .collect::<Result<Vec<_>>>()?;

        if split.max_chunks == Some(0) {
            return Err(ConfigError::SchemaValidation(
                "max_chunks must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            output,
            groups,
            max_chunks: split.max_chunks,
            externals: None,
        })
    }

    /// Leave modules of external packages out of the plan.
    pub fn with_externals(mut self, externals: Option<ExternalsPolicy>) -> Self {
        self.externals = externals;
        self
    }

    /// Assign `modules` to chunks and name the emitted files.
    ///
    /// Fails when two distinct chunks would end up with the same name.
    pub fn plan(&self, modules: &[SourceModule]) -> Result<BuildPlan> {
        let mut drafts: IndexMap<(ChunkKind, String), DraftChunk<'_>> = IndexMap::new();
        let mut externals = BTreeSet::new();

        for module in modules {
            if let Some(package) = self.external_package(module) {
                externals.insert(package);
                continue;
            }

            let (kind, name) = match &module.origin {
                ModuleOrigin::Entry(name) => (ChunkKind::Entry, name.clone()),
                ModuleOrigin::Dynamic(name) => (ChunkKind::Dynamic, name.clone()),
            };
            // Entry chunks exist even when every module is pulled into a group.
            drafts
                .entry((kind, name.clone()))
                .or_insert_with(|| DraftChunk {
                    name,
                    kind,
                    modules: Vec::new(),
                });

            let (kind, name) = match self.winning_group(module) {
                Some(group) => (ChunkKind::Group, group.name.clone()),
                None => (kind, module_chunk_name(&module.origin).to_string()),
            };
            drafts
                .entry((kind, name.clone()))
                .or_insert_with(|| DraftChunk {
                    name,
                    kind,
                    modules: Vec::new(),
                })
                .modules
                .push(module);
        }

        let mut chunks: Vec<DraftChunk<'_>> = drafts
            .into_values()
            .filter(|chunk| chunk.kind == ChunkKind::Entry || !chunk.modules.is_empty())
            .collect();

        if let Some(max) = self.max_chunks {
            merge_down(&mut chunks, max);
        }

        ensure_unique_names(&chunks)?;

        let mut plan = self.finish(chunks);
        plan.externals = externals.into_iter().collect();
        Ok(plan)
    }

    fn external_package(&self, module: &SourceModule) -> Option<String> {
        let policy = self.externals.as_ref()?;
        let package = module_package(&module.id)?;
        policy.is_external(&package).then_some(package)
    }

    fn winning_group(&self, module: &SourceModule) -> Option<&'a CacheGroup> {
        let mut best: Option<&CompiledGroup<'a>> = None;
        for candidate in &self.groups {
            if !candidate.applies_to(module) || !candidate.beats_default() {
                continue;
            }
            if best.is_none_or(|b| candidate.group.priority > b.group.priority) {
                best = Some(candidate);
            }
        }
        best.map(|compiled| compiled.group)
    }

    fn finish(&self, chunks: Vec<DraftChunk<'_>>) -> BuildPlan {
        let hashed: Vec<(DraftChunk<'_>, String)> = chunks
            .into_iter()
            .map(|mut chunk| {
                chunk.modules.sort_by(|a, b| a.id.cmp(&b.id));
                chunk.modules.dedup_by(|a, b| a.id == b.id);
                let hash = chunk_hash(&chunk.modules);
                (chunk, hash)
            })
            .collect();

        let mut build = Sha256::new();
        for (chunk, hash) in &hashed {
            build.update(chunk.name.as_bytes());
            build.update([0u8]);
            build.update(hash.as_bytes());
            build.update([0u8]);
        }
        let build_hash = format!("{:x}", build.finalize());

        let chunks = hashed
            .into_iter()
            .enumerate()
            .map(|(id, (chunk, hash))| {
                let template = match chunk.kind {
                    ChunkKind::Entry => &self.output.filename,
                    ChunkKind::Group | ChunkKind::Dynamic => &self.output.chunk_filename,
                };
                let file = template.render(&FilenameContext {
                    name: &chunk.name,
                    id,
                    ext: "js",
                    build_hash: &build_hash,
                    chunk_hash: &hash,
                });
                PlannedChunk {
                    id,
                    size: chunk.size(),
                    name: chunk.name,
                    kind: chunk.kind,
                    modules: chunk.modules.iter().map(|m| m.id.clone()).collect(),
                    hash,
                    file,
                }
            })
            .collect();

        BuildPlan {
            hash: build_hash,
            chunks,
            externals: Vec::new(),
        }
    }
}

fn ensure_unique_names(chunks: &[DraftChunk<'_>]) -> Result<()> {
    let mut names = HashSet::new();
    match chunks.iter().find(|chunk| !names.insert(chunk.name.as_str())) {
        Some(dup) => Err(ConfigError::DuplicateChunkName(dup.name.clone())),
        None => Ok(()),
    }
}

fn module_chunk_name(origin: &ModuleOrigin) -> &str {
    match origin {
        ModuleOrigin::Entry(name) | ModuleOrigin::Dynamic(name) => name,
    }
}

/// Fold the smallest chunks into the first one until at most `max` remain.
fn merge_down(chunks: &mut Vec<DraftChunk<'_>>, max: usize) {
    let max = max.max(1);
    while chunks.len() > max {
        let smallest = (1..chunks.len())
            .min_by_key(|&i| (chunks[i].size(), std::cmp::Reverse(i)))
            .unwrap_or(chunks.len() - 1);
        let merged = chunks.remove(smallest);
        chunks[0].modules.extend(merged.modules);
    }
}

fn chunk_hash(modules: &[&SourceModule]) -> String {
    let mut hasher = Sha256::new();
    for module in modules {
        hasher.update(module.id.as_bytes());
        hasher.update([0u8]);
        hasher.update(module.source.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
