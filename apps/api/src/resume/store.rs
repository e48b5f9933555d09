//! In-memory resume store with TTL expiry and a capacity bound.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizedText {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResume {
    pub id: Uuid,
    pub file_name: String,
    pub text: String,
    pub uploaded_at: DateTime<Utc>,
    pub optimized: Option<OptimizedText>,
}

impl StoredResume {
    pub fn summary(&self) -> ResumeSummary {
        ResumeSummary {
            id: self.id,
            file_name: self.file_name.clone(),
            uploaded_at: self.uploaded_at,
            word_count: self.text.split_whitespace().count(),
            character_count: self.text.chars().count(),
            has_optimized_version: self.optimized.is_some(),
            optimized_at: self.optimized.as_ref().map(|o| o.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub word_count: usize,
    pub character_count: usize,
    pub has_optimized_version: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_at: Option<DateTime<Utc>>,
}

/// Uploaded resumes keyed by id. Entries older than `ttl` are treated as
/// absent; when `capacity` is reached the oldest upload is evicted.
pub struct ResumeStore {
    entries: RwLock<HashMap<Uuid, StoredResume>>,
    ttl: Duration,
    capacity: usize,
}

impl ResumeStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    fn is_expired(&self, entry: &StoredResume, now: DateTime<Utc>) -> bool {
        now - entry.uploaded_at > self.ttl
    }

    pub async fn insert(&self, file_name: String, text: String) -> StoredResume {
        let now = Utc::now();
        let resume = StoredResume {
            id: Uuid::new_v4(),
            file_name,
            text,
            uploaded_at: now,
            optimized: None,
        };

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !self.is_expired(entry, now));
        while entries.len() >= self.capacity {
            let Some(oldest) = entries
                .values()
                .min_by_key(|entry| entry.uploaded_at)
                .map(|entry| entry.id)
            else {
                break;
            };
            entries.remove(&oldest);
            info!("Resume store full; evicted {oldest}");
        }
        entries.insert(resume.id, resume.clone());
        debug!("Stored resume {} ({} held)", resume.id, entries.len());
        resume
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredResume> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(&id) {
                None => return None,
                Some(entry) if !self.is_expired(entry, now) => return Some(entry.clone()),
                Some(_) => {}
            }
        }
        self.entries.write().await.remove(&id);
        debug!("Resume {id} expired");
        None
    }

    /// Records optimized text for a live resume. Returns the updated entry.
    pub async fn attach_optimized(&self, id: Uuid, text: String) -> Option<StoredResume> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id)?;
        if self.is_expired(entry, now) {
            entries.remove(&id);
            return None;
        }
        entry.optimized = Some(OptimizedText {
            text,
            created_at: now,
        });
        Some(entry.clone())
    }

    pub async fn summary(&self, id: Uuid) -> Option<ResumeSummary> {
        self.get(id).await.map(|resume| resume.summary())
    }

    /// Summaries of every live resume, oldest upload first.
    pub async fn list(&self) -> Vec<ResumeSummary> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        let mut summaries: Vec<ResumeSummary> = entries
            .values()
            .filter(|entry| !self.is_expired(entry, now))
            .map(StoredResume::summary)
            .collect();
        summaries.sort_by_key(|summary| summary.uploaded_at);
        summaries
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ResumeStore {
        ResumeStore::new(Duration::minutes(60), 3)
    }

    async fn held(store: &ResumeStore) -> usize {
        store.entries.read().await.len()
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = store();
        let stored = store
            .insert("cv.txt".to_string(), "Jane Doe  Rust engineer".to_string())
            .await;
        let fetched = store.get(stored.id).await.unwrap();
        assert_eq!(fetched, stored);

        let summary = store.summary(stored.id).await.unwrap();
        assert_eq!(summary.word_count, 4);
        assert!(!summary.has_optimized_version);
    }

    #[tokio::test]
    async fn test_unknown_id_is_absent() {
        assert!(store().get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_purged() {
        let store = store();
        let stored = store.insert("cv.txt".to_string(), "text".to_string()).await;
        {
            let mut entries = store.entries.write().await;
            let entry = entries.get_mut(&stored.id).unwrap();
            entry.uploaded_at = Utc::now() - Duration::minutes(61);
        }
        assert!(store.get(stored.id).await.is_none());
        assert_eq!(held(&store).await, 0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_upload() {
        let store = store();
        let first = store.insert("a.txt".to_string(), "a".to_string()).await;
        {
            let mut entries = store.entries.write().await;
            entries.get_mut(&first.id).unwrap().uploaded_at = Utc::now() - Duration::minutes(5);
        }
        store.insert("b.txt".to_string(), "b".to_string()).await;
        store.insert("c.txt".to_string(), "c".to_string()).await;
        let fourth = store.insert("d.txt".to_string(), "d".to_string()).await;

        assert_eq!(held(&store).await, 3);
        assert!(store.get(first.id).await.is_none());
        assert!(store.get(fourth.id).await.is_some());
    }

    #[tokio::test]
    async fn test_attach_optimized_sets_flag() {
        let store = store();
        let stored = store.insert("cv.txt".to_string(), "text".to_string()).await;
        let updated = store
            .attach_optimized(stored.id, "better text".to_string())
            .await
            .unwrap();
        assert_eq!(updated.optimized.unwrap().text, "better text");
        assert!(store.summary(stored.id).await.unwrap().has_optimized_version);
        assert!(store
            .attach_optimized(Uuid::new_v4(), "x".to_string())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_list_skips_expired_and_orders_by_upload() {
        let store = store();
        let stale = store.insert("old.txt".to_string(), "old".to_string()).await;
        let second = store.insert("b.txt".to_string(), "b".to_string()).await;
        let first = store.insert("a.txt".to_string(), "a".to_string()).await;
        {
            let mut entries = store.entries.write().await;
            entries.get_mut(&stale.id).unwrap().uploaded_at = Utc::now() - Duration::minutes(61);
            entries.get_mut(&first.id).unwrap().uploaded_at = Utc::now() - Duration::minutes(10);
            entries.get_mut(&second.id).unwrap().uploaded_at = Utc::now() - Duration::minutes(5);
        }
        store.attach_optimized(second.id, "better".to_string()).await;

        let listed = store.list().await;
        let ids: Vec<Uuid> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert!(!listed[0].has_optimized_version);
        assert!(listed[1].has_optimized_version);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store();
        let stored = store.insert("cv.txt".to_string(), "text".to_string()).await;
        assert!(store.delete(stored.id).await);
        assert!(!store.delete(stored.id).await);
        assert!(store.get(stored.id).await.is_none());
    }
}
