use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::database::models::quest::{Quest, COMPLETED_FIELD, TITLE_FIELD};
use crate::database::store::{Datastore, StoreError};
use crate::filter::FilterData;
use crate::types::{Document, ID_FIELD};

/// Quest-shaped access to the datastore. Each method is one store call,
/// except objective completion which reads, mutates and writes back.
#[derive(Clone)]
pub struct QuestRepository {
    store: Arc<Datastore>,
}

impl QuestRepository {
    pub fn new(store: Arc<Datastore>) -> Self {
        Self { store }
    }

    fn by_id(id: &str) -> Value {
        json!({ ID_FIELD: id })
    }

    /// All quests, or only those whose `completed` flag equals the filter,
    /// sorted by title
    pub async fn list(&self, completed: Option<bool>) -> Result<Vec<Document>, StoreError> {
        self.store
            .find(FilterData {
                where_clause: completed.map(|c| json!({ COMPLETED_FIELD: c })),
                order: Some(json!({ TITLE_FIELD: "asc" })),
            })
            .await
    }

    pub async fn create(&self, quest: Value) -> Result<Document, StoreError> {
        self.store.insert(quest).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        self.store.find_one(Self::by_id(id)).await
    }

    pub async fn delete(&self, id: &str) -> Result<usize, StoreError> {
        self.store.remove(Self::by_id(id)).await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.store.count(None).await
    }

    /// Mark objective `descr` complete on quest `id`. None when the quest does
    /// not exist. No lock spans the read and the write.
    pub async fn complete_objective(&self, id: &str, descr: &str) -> Result<Option<Document>, StoreError> {
        let Some(doc) = self.get(id).await? else {
            return Ok(None);
        };

        let mut quest = Quest::from_document(doc);
        let matched = quest.complete_objective(descr);
        tracing::debug!("Quest {}: {} objective(s) matched {:?}", id, matched, descr);

        self.store.update_one(Self::by_id(id), quest.into_document()).await
    }

    /// Insert a batch of quest documents as-is
    pub async fn seed(&self, quests: Vec<Value>) -> Result<Vec<Document>, StoreError> {
        self.store.insert_many(quests).await
    }

    /// Read a JSON array of quests from disk and insert them
    pub async fn seed_from_file(&self, path: &Path) -> Result<Vec<Document>, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let quests = match serde_json::from_str::<Value>(&raw)? {
            Value::Array(items) => items,
            single @ Value::Object(_) => vec![single],
            _ => return Err(StoreError::Malformed(format!("{} is not a JSON array", path.display()))),
        };
        self.seed(quests).await
    }
}
