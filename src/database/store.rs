use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::filter::{Filter, FilterData, FilterError};
use crate::types::{document_id, Document, ID_FIELD};

/// Tombstone marker written to the log when a document is removed
const DELETED_FIELD: &str = "$$deleted";

/// Share of unreadable log lines above which loading refuses to continue
const CORRUPT_ALERT_THRESHOLD: f64 = 0.1;

/// Errors from the datastore
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Can't insert key {0}, it violates the unique constraint")]
    UniqueViolation(String),

    #[error("Invalid _id: {0}")]
    InvalidId(String),

    #[error("Document must be a JSON object")]
    NotAnObject,

    #[error("Field names cannot begin with '$' or contain '.': {0:?}")]
    InvalidFieldName(String),

    #[error("Malformed document: {0}")]
    Malformed(String),

    #[error("{corrupt} of {total} lines in {path} are corrupt")]
    Corrupted { path: String, corrupt: usize, total: usize },

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Embedded document collection. Live documents are held in memory; every
/// mutation is appended to a JSON-lines log which is replayed and compacted
/// when the store is opened.
pub struct Datastore {
    path: Option<PathBuf>,
    docs: RwLock<Vec<Document>>,
}

impl Datastore {
    /// Store with no backing file
    pub fn in_memory() -> Self {
        Self {
            path: None,
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Load (and compact) the log at `path`, creating it if missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let docs = Self::replay(&raw, &path)?;
        Self::compact(&path, &docs).await?;
        info!("Loaded {} documents from {}", docs.len(), path.display());

        Ok(Self {
            path: Some(path),
            docs: RwLock::new(docs),
        })
    }

    /// Rebuild the live set from log lines. Later lines win; tombstones remove.
    fn replay(raw: &str, path: &Path) -> Result<Vec<Document>, StoreError> {
        let mut slots: Vec<Option<Document>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;
        let mut corrupt = 0usize;

        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            total += 1;
            let doc = match serde_json::from_str::<Value>(line) {
                Ok(Value::Object(doc)) if document_id(&doc).is_some() => doc,
                _ => {
                    corrupt += 1;
                    warn!("Skipping corrupt line {} in {}", total, path.display());
                    continue;
                }
            };
            let id = document_id(&doc).unwrap_or_default().to_string();

            if doc.get(DELETED_FIELD).and_then(Value::as_bool) == Some(true) {
                if let Some(slot) = index.remove(&id) {
                    slots[slot] = None;
                }
                continue;
            }

            match index.get(&id) {
                Some(&slot) => slots[slot] = Some(doc),
                None => {
                    index.insert(id, slots.len());
                    slots.push(Some(doc));
                }
            }
        }

        if total > 0 && corrupt as f64 / total as f64 > CORRUPT_ALERT_THRESHOLD {
            return Err(StoreError::Corrupted {
                path: path.display().to_string(),
                corrupt,
                total,
            });
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Rewrite the log with only live documents, via temp file + rename
    async fn compact(path: &Path, docs: &[Document]) -> Result<(), StoreError> {
        let mut contents = String::new();
        for doc in docs {
            contents.push_str(&serde_json::to_string(doc)?);
            contents.push('\n');
        }

        let tmp = PathBuf::from(format!("{}~", path.display()));
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("Compacted {}", path.display());
        Ok(())
    }

    /// Append log lines. Callers hold the write lock, which serialises appends.
    async fn append(&self, lines: &[Value]) -> Result<(), StoreError> {
        let Some(path) = &self.path else { return Ok(()) };
        if lines.is_empty() {
            return Ok(());
        }

        let mut buf = String::new();
        for line in lines {
            buf.push_str(&serde_json::to_string(line)?);
            buf.push('\n');
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    fn generate_id(existing: &[Document]) -> String {
        loop {
            let id: String = Uuid::new_v4().simple().to_string().chars().take(16).collect();
            if !existing.iter().any(|d| document_id(d) == Some(id.as_str())) {
                return id;
            }
        }
    }

    /// Reject key names the log format reserves, at any depth. A stored
    /// `$$deleted` key would otherwise replay as a tombstone.
    fn check_field_names(doc: &Document) -> Result<(), StoreError> {
        for (key, child) in doc {
            if key.starts_with('$') || key.contains('.') {
                return Err(StoreError::InvalidFieldName(key.clone()));
            }
            Self::check_nested_field_names(child)?;
        }
        Ok(())
    }

    fn check_nested_field_names(value: &Value) -> Result<(), StoreError> {
        match value {
            Value::Object(map) => Self::check_field_names(map),
            Value::Array(items) => items.iter().try_for_each(Self::check_nested_field_names),
            _ => Ok(()),
        }
    }

    /// Validate a candidate document and give it an `_id` if it has none
    fn prepare(doc: Value, existing: &[Document], pending: &HashSet<String>) -> Result<Document, StoreError> {
        let Value::Object(mut doc) = doc else {
            return Err(StoreError::NotAnObject);
        };
        Self::check_field_names(&doc)?;

        let id = match doc.get(ID_FIELD) {
            None | Some(Value::Null) => Self::generate_id(existing),
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(other) => return Err(StoreError::InvalidId(other.to_string())),
        };

        if pending.contains(&id) || existing.iter().any(|d| document_id(d) == Some(id.as_str())) {
            return Err(StoreError::UniqueViolation(id));
        }

        doc.insert(ID_FIELD.to_string(), Value::String(id));
        Ok(doc)
    }

    pub async fn insert(&self, doc: Value) -> Result<Document, StoreError> {
        let mut inserted = self.insert_many(vec![doc]).await?;
        Ok(inserted.remove(0))
    }

    /// All-or-nothing insert: nothing is written if any document is rejected
    pub async fn insert_many(&self, docs: Vec<Value>) -> Result<Vec<Document>, StoreError> {
        let mut guard = self.docs.write().await;

        let mut pending = HashSet::new();
        let mut prepared = Vec::with_capacity(docs.len());
        for doc in docs {
            let doc = Self::prepare(doc, &guard, &pending)?;
            pending.insert(document_id(&doc).unwrap_or_default().to_string());
            prepared.push(doc);
        }

        let lines: Vec<Value> = prepared.iter().cloned().map(Value::Object).collect();
        self.append(&lines).await?;
        guard.extend(prepared.iter().cloned());

        debug!("Inserted {} documents", prepared.len());
        Ok(prepared)
    }

    pub async fn find(&self, query: FilterData) -> Result<Vec<Document>, StoreError> {
        let filter = Filter::from_data(query)?;
        let guard = self.docs.read().await;
        Ok(filter.apply(guard.iter()))
    }

    pub async fn find_one(&self, where_clause: Value) -> Result<Option<Document>, StoreError> {
        let filter = Filter::from_data(FilterData::matching(where_clause))?;
        let guard = self.docs.read().await;
        Ok(guard.iter().find(|d| filter.matches(d)).cloned())
    }

    pub async fn count(&self, where_clause: Option<Value>) -> Result<usize, StoreError> {
        let filter = match where_clause {
            Some(w) => Filter::from_data(FilterData::matching(w))?,
            None => Filter::new(),
        };
        let guard = self.docs.read().await;
        Ok(guard.iter().filter(|d| filter.matches(d)).count())
    }

    /// Replace the first matching document, keeping its `_id`. Returns the
    /// stored replacement, or None when nothing matched.
    pub async fn update_one(&self, where_clause: Value, replacement: Document) -> Result<Option<Document>, StoreError> {
        let filter = Filter::from_data(FilterData::matching(where_clause))?;
        Self::check_field_names(&replacement)?;
        let mut guard = self.docs.write().await;

        let Some(slot) = guard.iter().position(|d| filter.matches(d)) else {
            return Ok(None);
        };

        let id = guard[slot].get(ID_FIELD).cloned().unwrap_or(Value::Null);
        let mut updated = replacement;
        updated.insert(ID_FIELD.to_string(), id);

        self.append(&[Value::Object(updated.clone())]).await?;
        guard[slot] = updated.clone();
        Ok(Some(updated))
    }

    /// Remove every matching document; returns how many were removed
    pub async fn remove(&self, where_clause: Value) -> Result<usize, StoreError> {
        let filter = Filter::from_data(FilterData::matching(where_clause))?;
        let mut guard = self.docs.write().await;

        let tombstones: Vec<Value> = guard
            .iter()
            .filter(|d| filter.matches(d))
            .map(|d| json!({ DELETED_FIELD: true, ID_FIELD: d.get(ID_FIELD).cloned().unwrap_or(Value::Null) }))
            .collect();

        self.append(&tombstones).await?;
        guard.retain(|d| !filter.matches(d));
        Ok(tombstones.len())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
