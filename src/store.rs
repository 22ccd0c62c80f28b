// src/store.rs - Named JSON snapshot persistence for documents

use crate::buffer::DocumentError;
use crate::formatting::{Formatting, Hierarchy};
use crate::run::Run;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One run as it appears on disk. Indices are persisted for inspection but
/// recomputed from content on load.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub paragraph_id: u64,
    pub start_index: usize,
    pub end_index: usize,
    pub content: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub lowerscript: bool,
    #[serde(default)]
    pub superscript: bool,
    #[serde(default)]
    pub hierarchy: Hierarchy,
}

impl From<&Run> for RunRecord {
    fn from(run: &Run) -> Self {
        Self {
            paragraph_id: run.id,
            start_index: run.start_index,
            end_index: run.end_index,
            content: run.content.clone(),
            bold: run.formatting.bold,
            italic: run.formatting.italic,
            lowerscript: run.formatting.subscript,
            superscript: run.formatting.superscript,
            hierarchy: run.formatting.hierarchy,
        }
    }
}

impl From<RunRecord> for Run {
    fn from(record: RunRecord) -> Self {
        let formatting = Formatting {
            bold: record.bold,
            italic: record.italic,
            subscript: record.lowerscript,
            superscript: record.superscript,
            hierarchy: record.hierarchy,
        };
        let mut run = Run::new(record.paragraph_id, record.content, formatting);
        run.start_index = record.start_index;
        run.end_index = record.end_index;
        run
    }
}

/// Durable slots for document snapshots, one `<name>.json` per slot.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn save(&self, name: &str, runs: &[Run]) -> Result<(), DocumentError> {
        fs::create_dir_all(&self.dir)?;
        let records: Vec<RunRecord> = runs.iter().map(RunRecord::from).collect();
        let json = serde_json::to_string_pretty(&records)?;
        let path = self.path_for(name);
        fs::write(&path, json)?;
        info!("saved {} runs to {}", records.len(), path.display());
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Vec<Run>, DocumentError> {
        let path = self.path_for(name);
        if !path.exists() {
            return Err(DocumentError::NotFound {
                name: name.to_string(),
            });
        }
        let json = fs::read_to_string(&path)?;
        let records: Vec<RunRecord> = serde_json::from_str(&json)?;
        info!("loaded {} runs from {}", records.len(), path.display());
        Ok(records.into_iter().map(Run::from).collect())
    }
}
