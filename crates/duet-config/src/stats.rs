//! Stats manifest written next to the client bundle.
//!
//! The server reads this file to inject `<script>` tags for the hashed
//! client files, so its shape is fixed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::plan::{BuildPlan, ChunkKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsManifest {
    pub chunks: Vec<ChunkStats>,
    pub public_path: String,
    pub assets: Vec<AssetStats>,
    pub assets_by_chunk_name: IndexMap<String, Vec<String>>,
    pub assets_by_chunk_id: IndexMap<usize, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStats {
    pub id: usize,
    pub names: Vec<String>,
    pub files: Vec<String>,
    pub hash: String,
    pub initial: bool,
    pub entry: bool,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetStats {
    pub name: String,
    pub size: usize,
    pub chunks: Vec<usize>,
    pub chunk_names: Vec<String>,
}

impl StatsManifest {
    pub fn from_plan(plan: &BuildPlan, public_path: &str) -> Self {
        let mut manifest = Self {
            chunks: Vec::with_capacity(plan.chunks.len()),
            public_path: public_path.to_string(),
            assets: Vec::with_capacity(plan.chunks.len()),
            assets_by_chunk_name: IndexMap::new(),
            assets_by_chunk_id: IndexMap::new(),
        };

        for chunk in &plan.chunks {
            let files = vec![chunk.file.clone()];
            manifest.chunks.push(ChunkStats {
                id: chunk.id,
                names: vec![chunk.name.clone()],
                files: files.clone(),
                hash: chunk.hash.clone(),
                initial: chunk.kind.is_initial(),
                entry: chunk.kind == ChunkKind::Entry,
                size: chunk.size,
            });
            manifest.assets.push(AssetStats {
                name: chunk.file.clone(),
                size: chunk.size,
                chunks: vec![chunk.id],
                chunk_names: vec![chunk.name.clone()],
            });
            manifest
                .assets_by_chunk_name
                .entry(chunk.name.clone())
                .or_default()
                .extend(files.iter().cloned());
            manifest.assets_by_chunk_id.insert(chunk.id, files);
        }

        manifest
    }

    /// Public URLs of the files the initial page must load, vendor first.
    pub fn initial_scripts(&self) -> Vec<String> {
        let mut initial: Vec<&ChunkStats> = self.chunks.iter().filter(|c| c.initial).collect();
        initial.sort_by_key(|c| c.entry);
        initial
            .into_iter()
            .flat_map(|c| c.files.iter())
            .map(|file| format!("{}{}", self.public_path, file))
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the manifest as `dir/filename`, returning the written path.
    pub fn write(&self, dir: &Path, filename: &str) -> Result<PathBuf> {
        let path = dir.join(filename);
        let json = self
            .to_json_pretty()
            .map_err(|e| crate::error::ConfigError::InvalidValue(e.to_string()))?;
        std::fs::create_dir_all(dir)?;
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), chunks = self.chunks.len(), "wrote stats manifest");
        Ok(path)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| crate::error::ConfigError::InvalidValue(e.to_string()))
    }
}
