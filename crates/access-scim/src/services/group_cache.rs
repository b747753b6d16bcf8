//! TTL snapshot of all Access groups.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use access_client::{AccessBackend, AccessClientError, AccessGroup};
use tracing::{debug, warn};

use crate::error::{ScimError, ScimResult};

/// How long a full snapshot is served before it is refetched.
pub const GROUP_CACHE_TTL: Duration = Duration::from_secs(60);

/// Process-local copy of the account's Access groups.
///
/// The snapshot is either fresh as a whole or refetched as a whole. Single
/// entries can be inserted or dropped after a backend write without
/// touching the snapshot timestamp.
#[derive(Debug)]
pub struct GroupCache {
    groups: HashMap<String, AccessGroup>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl Default for GroupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(GROUP_CACHE_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            groups: HashMap::new(),
            fetched_at: None,
            ttl,
        }
    }

    /// Whether the last full fetch is younger than the TTL.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.fetched_at
            .is_some_and(|fetched_at| fetched_at.elapsed() < self.ttl)
    }

    /// All groups, in no particular order.
    ///
    /// A stale snapshot is dropped before the backend is asked again, so a
    /// failed refresh leaves the cache empty rather than half old.
    pub async fn get_all(&mut self, backend: &dyn AccessBackend) -> ScimResult<Vec<AccessGroup>> {
        if self.is_fresh() {
            return Ok(self.groups.values().cloned().collect());
        }

        self.groups.clear();
        self.fetched_at = None;

        let page = backend.list_groups().await?;
        if page.result_info.total_pages > 1 {
            warn!(
                total_pages = page.result_info.total_pages,
                "Access group listing spans several pages, paging is not supported"
            );
            return Err(ScimError::UnsupportedPagination {
                total_pages: page.result_info.total_pages,
            });
        }

        debug!(count = page.groups.len(), "Refreshed Access group snapshot");
        self.groups = page
            .groups
            .iter()
            .map(|g| (g.id.clone(), g.clone()))
            .collect();
        self.fetched_at = Some(Instant::now());

        Ok(page.groups)
    }

    /// One group, from the snapshot if present, otherwise from the backend.
    pub async fn get(&mut self, backend: &dyn AccessBackend, id: &str) -> ScimResult<AccessGroup> {
        if let Some(group) = self.groups.get(id) {
            return Ok(group.clone());
        }

        let group = backend.get_group(id).await.map_err(|e| match e {
            AccessClientError::NotFound(_) => ScimError::NotFound(id.to_string()),
            other => other.into(),
        })?;
        self.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    /// Insert or overwrite one entry.
    pub fn put(&mut self, group: AccessGroup) {
        self.groups.insert(group.id.clone(), group);
    }

    pub fn remove(&mut self, id: &str) -> Option<AccessGroup> {
        self.groups.remove(id)
    }

    /// Peek at a cached entry without going to the backend.
    #[cfg(test)]
    pub fn cached(&self, id: &str) -> Option<&AccessGroup> {
        self.groups.get(id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_client::{AccessClientResult, GroupPage, ResultInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a fixed group list and counts list calls.
    struct StaticBackend {
        groups: Vec<AccessGroup>,
        total_pages: u32,
        lists: AtomicUsize,
    }

    impl StaticBackend {
        fn new(names: &[(&str, &str)], total_pages: u32) -> Self {
            Self {
                groups: names
                    .iter()
                    .map(|(id, name)| AccessGroup {
                        id: (*id).to_string(),
                        name: (*name).to_string(),
                        ..AccessGroup::default()
                    })
                    .collect(),
                total_pages,
                lists: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AccessBackend for StaticBackend {
        async fn list_groups(&self) -> AccessClientResult<GroupPage> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            Ok(GroupPage {
                groups: self.groups.clone(),
                result_info: ResultInfo {
                    total_pages: self.total_pages,
                    ..ResultInfo::default()
                },
            })
        }

        async fn get_group(&self, id: &str) -> AccessClientResult<AccessGroup> {
            self.groups
                .iter()
                .find(|g| g.id == id)
                .cloned()
                .ok_or_else(|| AccessClientError::NotFound(id.to_string()))
        }

        async fn create_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
            Ok(group.clone())
        }

        async fn update_group(&self, group: &AccessGroup) -> AccessClientResult<AccessGroup> {
            Ok(group.clone())
        }

        async fn delete_group(&self, _id: &str) -> AccessClientResult<()> {
            Ok(())
        }

        async fn revoke_user_tokens(&self, _email: &str) -> AccessClientResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_get_all_serves_fresh_snapshot() {
        let backend = StaticBackend::new(&[("g1", "A"), ("g2", "B")], 1);
        let mut cache = GroupCache::new();

        assert_eq!(cache.get_all(&backend).await.unwrap().len(), 2);
        assert!(cache.is_fresh());
        assert_eq!(cache.get_all(&backend).await.unwrap().len(), 2);
        assert_eq!(backend.lists.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_refetched() {
        let backend = StaticBackend::new(&[("g1", "A")], 1);
        let mut cache = GroupCache::with_ttl(Duration::ZERO);

        cache.get_all(&backend).await.unwrap();
        cache.get_all(&backend).await.unwrap();
        assert_eq!(backend.lists.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refresh_drops_entries_missing_upstream() {
        let backend = StaticBackend::new(&[("g1", "A")], 1);
        let mut cache = GroupCache::with_ttl(Duration::ZERO);
        cache.put(AccessGroup {
            id: "gone".into(),
            ..AccessGroup::default()
        });

        let groups = cache.get_all(&backend).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert!(cache.cached("gone").is_none());
    }

    #[tokio::test]
    async fn test_multiple_pages_rejected() {
        let backend = StaticBackend::new(&[("g1", "A")], 2);
        let mut cache = GroupCache::new();

        let err = cache.get_all(&backend).await.unwrap_err();

        assert!(matches!(
            err,
            ScimError::UnsupportedPagination { total_pages: 2 }
        ));
        assert!(cache.is_empty());
        assert!(!cache.is_fresh());
    }

    #[tokio::test]
    async fn test_get_fetches_missing_entry_once() {
        let backend = StaticBackend::new(&[("g1", "A")], 1);
        let mut cache = GroupCache::new();

        assert_eq!(cache.get(&backend, "g1").await.unwrap().name, "A");
        assert!(cache.cached("g1").is_some());
        // a single get does not make the snapshot fresh
        assert!(!cache.is_fresh());
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let backend = StaticBackend::new(&[], 1);
        let mut cache = GroupCache::new();

        let err = cache.get(&backend, "nope").await.unwrap_err();
        assert!(matches!(err, ScimError::NotFound(id) if id == "nope"));
    }

    #[test]
    fn test_put_and_remove() {
        let mut cache = GroupCache::new();
        cache.put(AccessGroup {
            id: "g1".into(),
            name: "A".into(),
            ..AccessGroup::default()
        });
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_fresh());

        assert!(cache.remove("g1").is_some());
        assert!(cache.remove("g1").is_none());
    }
}
