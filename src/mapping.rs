//! Persisted furigana corrections. The aligner produces coarse ruby pairs;
//! admins curate finer per-character segmentations into `FuriganaMapping`
//! rows, which this module applies on later calls. Rows are find-or-created
//! the first time a pair is seen and never deleted by the engine.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::align::Run;
use crate::error::TransliterateError;
use crate::kana::kana_to_hira;

/// One persisted correction row, keyed by `(text, furigana)`.
///
/// When curated, `segmented_text`/`segmented_furigana` hold comma-separated
/// lists of equal length; element `i` of the text list is pronounced element
/// `i` of the furigana list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuriganaMapping {
    pub text: String,
    pub furigana: String,
    #[serde(default)]
    pub segmented_text: Option<String>,
    #[serde(default)]
    pub segmented_furigana: Option<String>,
}

impl FuriganaMapping {
    pub fn new(text: impl Into<String>, furigana: impl Into<String>) -> Self {
        FuriganaMapping {
            text: text.into(),
            furigana: furigana.into(),
            segmented_text: None,
            segmented_furigana: None,
        }
    }
}

/// Repository interface for correction rows. Injected into the engine so
/// tests run against an in-memory fake and deployments bring their own
/// backing store. Upserts must converge under concurrent find-or-create of
/// the same key; lost updates are acceptable.
pub trait FuriganaMappingStore: Send + Sync {
    fn get(&self, text: &str, furigana: &str)
        -> Result<Option<FuriganaMapping>, TransliterateError>;
    fn upsert(&self, mapping: &FuriganaMapping) -> Result<(), TransliterateError>;
}

/// In-memory store; the deterministic default.
#[derive(Debug, Default)]
pub struct MemoryMappingStore {
    rows: Mutex<HashMap<(String, String), FuriganaMapping>>,
}

impl MemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held. Mostly useful in tests.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FuriganaMappingStore for MemoryMappingStore {
    fn get(
        &self,
        text: &str,
        furigana: &str,
    ) -> Result<Option<FuriganaMapping>, TransliterateError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        Ok(rows.get(&(text.to_string(), furigana.to_string())).cloned())
    }

    fn upsert(&self, mapping: &FuriganaMapping) -> Result<(), TransliterateError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        rows.insert(
            (mapping.text.clone(), mapping.furigana.clone()),
            mapping.clone(),
        );
        Ok(())
    }
}

/// JSON-file-backed store. The whole table is loaded at open and rewritten
/// atomically (tempfile + rename) on every upsert, so a crashed writer never
/// leaves a torn file behind.
pub struct JsonFileMappingStore {
    path: PathBuf,
    rows: Mutex<HashMap<(String, String), FuriganaMapping>>,
}

impl JsonFileMappingStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransliterateError> {
        let path = path.as_ref().to_path_buf();
        let mut rows = HashMap::new();
        if path.exists() {
            let file = File::open(&path).map_err(|e| TransliterateError::Store(e.to_string()))?;
            let loaded: Vec<FuriganaMapping> = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| TransliterateError::Store(e.to_string()))?;
            for row in loaded {
                rows.insert((row.text.clone(), row.furigana.clone()), row);
            }
        }
        Ok(JsonFileMappingStore {
            path,
            rows: Mutex::new(rows),
        })
    }

    fn persist(
        &self,
        rows: &HashMap<(String, String), FuriganaMapping>,
    ) -> Result<(), TransliterateError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(parent)
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        let mut sorted: Vec<&FuriganaMapping> = rows.values().collect();
        sorted.sort_by(|a, b| (&a.text, &a.furigana).cmp(&(&b.text, &b.furigana)));
        serde_json::to_writer_pretty(BufWriter::new(&temp), &sorted)
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        Ok(())
    }
}

impl FuriganaMappingStore for JsonFileMappingStore {
    fn get(
        &self,
        text: &str,
        furigana: &str,
    ) -> Result<Option<FuriganaMapping>, TransliterateError> {
        let rows = self
            .rows
            .lock()
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        Ok(rows.get(&(text.to_string(), furigana.to_string())).cloned())
    }

    fn upsert(&self, mapping: &FuriganaMapping) -> Result<(), TransliterateError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| TransliterateError::Store(e.to_string()))?;
        rows.insert(
            (mapping.text.clone(), mapping.furigana.clone()),
            mapping.clone(),
        );
        self.persist(&rows)
    }
}

/// Per-call expansion cache: one store round-trip per distinct pair.
pub(crate) type MappingCache = HashMap<(String, String), Vec<Run>>;

/// Re-expand one alignment run through the correction store. Literal runs
/// and single-character surfaces pass through; ruby pairs are find-or-created
/// and, when a curated segmentation exists, split into per-element runs.
/// Corrupt segmentations (length mismatch) degrade to the unsplit pair.
pub(crate) fn apply_mapping(
    run: Run,
    store: &dyn FuriganaMappingStore,
    cache: &mut MappingCache,
) -> Result<Vec<Run>, TransliterateError> {
    let (text, furigana) = match &run {
        Run::Literal(_) => return Ok(vec![run]),
        Run::Ruby(text, furigana) => {
            if text.chars().count() < 2 {
                return Ok(vec![run]);
            }
            (text.clone(), furigana.clone())
        }
    };

    let key = (text.clone(), furigana.clone());
    if let Some(cached) = cache.get(&key) {
        return Ok(cached.clone());
    }

    let row = match store.get(&text, &furigana)? {
        Some(row) => row,
        None => {
            store.upsert(&FuriganaMapping::new(&text, &furigana))?;
            return Ok(vec![run]);
        }
    };

    let (seg_text, seg_furigana) = match (&row.segmented_text, &row.segmented_furigana) {
        (Some(t), Some(f)) => (t, f),
        _ => return Ok(vec![run]),
    };
    let texts: Vec<&str> = seg_text.split(',').collect();
    let furiganas: Vec<&str> = seg_furigana.split(',').collect();
    if texts.len() != furiganas.len() {
        warn!(
            "mapping ({text}, {furigana}) has mismatched segmentation lengths {} vs {}",
            texts.len(),
            furiganas.len()
        );
        return Ok(vec![run]);
    }

    let expanded: Vec<Run> = texts
        .iter()
        .zip(furiganas.iter())
        .map(|(&t, &f)| {
            if f.is_empty() || kana_to_hira(t) == f {
                Run::Literal(t.to_string())
            } else {
                Run::Ruby(t.to_string(), f.to_string())
            }
        })
        .collect();
    cache.insert(key, expanded.clone());
    Ok(expanded)
}
