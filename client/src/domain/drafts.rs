use std::collections::HashSet;

use artconnect_common::crafts::{Craft, CraftFields, CraftId};
use artconnect_common::{SlotName, Storage, StorageError};
use chrono::Utc;

/// The two collections a craft can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Drafts,
    Published,
}

impl Collection {
    fn slot(self) -> &'static SlotName {
        match self {
            Collection::Drafts => SlotName::drafts(),
            Collection::Published => SlotName::published(),
        }
    }
}

/// Drafts and published crafts kept in two storage slots.
///
/// Every mutation reads the whole collection, changes it in memory and writes
/// it back. Two writers racing on the same collection lose updates
/// (last write wins); there is no locking or version check.
#[derive(Clone, Debug)]
pub struct DraftStore<S: Storage> {
    storage: S,
}

impl<S: Storage> DraftStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Store new craft as a draft
    pub async fn save_draft(&self, fields: CraftFields) -> Result<Craft, StorageError> {
        self.create(fields, Collection::Drafts).await
    }

    /// Store new craft directly as published
    pub async fn publish_craft(&self, fields: CraftFields) -> Result<Craft, StorageError> {
        self.create(fields, Collection::Published).await
    }

    pub async fn list_drafts(&self) -> Result<Vec<Craft>, StorageError> {
        self.load(Collection::Drafts).await
    }

    pub async fn list_published(&self) -> Result<Vec<Craft>, StorageError> {
        self.load(Collection::Published).await
    }

    /// Remove a draft, missing id is a no-op
    pub async fn delete_draft(&self, id: &CraftId) -> Result<(), StorageError> {
        let mut drafts = self.load(Collection::Drafts).await?;
        drafts.retain(|draft| &draft.id != id);
        self.persist(Collection::Drafts, &drafts).await?;
        tracing::debug!(%id, "draft deleted");
        Ok(())
    }

    /// Move a draft into the published collection.
    /// Returns `None` without touching storage when no draft has this id.
    pub async fn publish_draft(&self, id: &CraftId) -> Result<Option<Craft>, StorageError> {
        let mut drafts = self.load(Collection::Drafts).await?;
        let Some(position) = drafts.iter().position(|draft| &draft.id == id) else {
            tracing::debug!(%id, "no draft to publish");
            return Ok(None);
        };

        let craft = drafts.remove(position).into_published();

        let mut published = self.load(Collection::Published).await?;
        published.push(craft.clone());
        self.persist(Collection::Published, &published).await?;
        self.persist(Collection::Drafts, &drafts).await?;

        tracing::debug!(%id, "draft published");
        Ok(Some(craft))
    }

    async fn create(
        &self,
        fields: CraftFields,
        collection: Collection,
    ) -> Result<Craft, StorageError> {
        let drafts = self.load(Collection::Drafts).await?;
        let published = self.load(Collection::Published).await?;

        let taken: HashSet<CraftId> = drafts.iter().chain(published.iter()).map(|c| c.id).collect();
        let id = fresh_id(&taken);

        let craft = Craft::new(id, fields, Utc::now(), collection == Collection::Drafts);

        let mut target = match collection {
            Collection::Drafts => drafts,
            Collection::Published => published,
        };
        target.push(craft.clone());
        self.persist(collection, &target).await?;

        tracing::debug!(%id, ?collection, "craft created");
        Ok(craft)
    }

    async fn load(&self, collection: Collection) -> Result<Vec<Craft>, StorageError> {
        match self.storage.get(collection.slot()).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, collection: Collection, crafts: &[Craft]) -> Result<(), StorageError> {
        let json = serde_json::to_string(crafts)?;
        self.storage.set(collection.slot(), json).await
    }
}

// v4 uuids practically never collide, regenerate if one does
fn fresh_id(taken: &HashSet<CraftId>) -> CraftId {
    loop {
        let id = CraftId::generate();
        if !taken.contains(&id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use artconnect_common::InMemoryStorage;
    use artconnect_common::crafts::Engagement;
    use artconnect_common::test_utils::{UnavailableStorage, blue_pottery_bowl, make_fields};

    use super::*;

    fn store() -> DraftStore<InMemoryStorage> {
        DraftStore::new(InMemoryStorage::new())
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = store();
        assert!(store.list_drafts().await.unwrap().is_empty());
        assert!(store.list_published().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_draft_stores_one_fresh_draft() {
        let store = store();
        let before = Utc::now();

        let saved = store.save_draft(blue_pottery_bowl()).await.unwrap();

        let drafts = store.list_drafts().await.unwrap();
        assert_eq!(drafts, vec![saved.clone()]);
        assert_eq!(saved.fields, blue_pottery_bowl());
        assert!(saved.is_draft);
        assert_eq!(saved.engagement, Engagement::default());
        assert!(saved.created_at >= before);
        assert!(store.list_published().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn publish_craft_goes_straight_to_published() {
        let store = store();

        let craft = store.publish_craft(blue_pottery_bowl()).await.unwrap();

        assert!(!craft.is_draft);
        assert!(store.list_drafts().await.unwrap().is_empty());
        assert_eq!(store.list_published().await.unwrap(), vec![craft]);
    }

    #[tokio::test]
    async fn ids_are_unique_across_collections() {
        let store = store();
        let mut ids = HashSet::new();
        for n in 0..20 {
            let fields = make_fields(&format!("craft {n}"), "Jaipur", "Pottery", "Raj");
            let craft = if n % 2 == 0 {
                store.save_draft(fields).await.unwrap()
            } else {
                store.publish_craft(fields).await.unwrap()
            };
            assert!(ids.insert(craft.id));
        }
    }

    #[tokio::test]
    async fn lists_keep_insertion_order() {
        let store = store();
        for title in ["first", "second", "third"] {
            store
                .save_draft(make_fields(title, "Jaipur", "Pottery", "Raj"))
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_drafts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.fields.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn publish_draft_moves_record() {
        let store = store();
        let draft = store.save_draft(blue_pottery_bowl()).await.unwrap();
        let other = store
            .save_draft(make_fields("Madhubani Painting", "Bihar", "Painting", "Sunita"))
            .await
            .unwrap();

        let published = store.publish_draft(&draft.id).await.unwrap().unwrap();

        assert!(!published.is_draft);
        assert_eq!(published.id, draft.id);
        assert_eq!(published.fields, draft.fields);
        assert_eq!(published.created_at, draft.created_at);
        assert_eq!(published.engagement, draft.engagement);
        assert_eq!(store.list_drafts().await.unwrap(), vec![other]);
        assert_eq!(store.list_published().await.unwrap(), vec![published]);
    }

    #[tokio::test]
    async fn publish_draft_twice_is_not_found() {
        let store = store();
        let draft = store.save_draft(blue_pottery_bowl()).await.unwrap();

        assert!(store.publish_draft(&draft.id).await.unwrap().is_some());
        assert!(store.publish_draft(&draft.id).await.unwrap().is_none());
        assert_eq!(store.list_published().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn publish_unknown_draft_changes_nothing() {
        let storage = InMemoryStorage::new();
        let store = DraftStore::new(storage.clone());
        store.save_draft(blue_pottery_bowl()).await.unwrap();
        let before = storage.get(SlotName::drafts()).await.unwrap();

        let outcome = store.publish_draft(&CraftId::generate()).await.unwrap();

        assert!(outcome.is_none());
        assert_eq!(storage.get(SlotName::drafts()).await.unwrap(), before);
        assert_eq!(storage.get(SlotName::published()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_draft_removes_only_match_and_is_idempotent() {
        let store = store();
        let first = store.save_draft(blue_pottery_bowl()).await.unwrap();
        let second = store
            .save_draft(make_fields("Silk Saree", "Varanasi", "Textiles", "Kamala"))
            .await
            .unwrap();

        store.delete_draft(&first.id).await.unwrap();
        store.delete_draft(&first.id).await.unwrap();

        assert_eq!(store.list_drafts().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn quota_failure_surfaces_and_keeps_collection() {
        let storage = InMemoryStorage::with_quota(600);
        let store = DraftStore::new(storage);
        let saved = store.save_draft(blue_pottery_bowl()).await.unwrap();

        let oversized = CraftFields {
            description: "x".repeat(1_000),
            ..blue_pottery_bowl()
        };
        let err = store.save_draft(oversized).await.unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.list_drafts().await.unwrap(), vec![saved]);
    }

    #[tokio::test]
    async fn failed_publish_keeps_draft() {
        // room for one draft, not for its published copy next to it
        let storage = InMemoryStorage::with_quota(600);
        let store = DraftStore::new(storage);
        let draft = store
            .save_draft(CraftFields {
                description: "d".repeat(200),
                ..blue_pottery_bowl()
            })
            .await
            .unwrap();

        let err = store.publish_draft(&draft.id).await.unwrap_err();

        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.list_drafts().await.unwrap(), vec![draft]);
        assert!(store.list_published().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_storage_is_reported() {
        let store = DraftStore::new(UnavailableStorage);
        let err = store.save_draft(blue_pottery_bowl()).await.unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(store.list_drafts().await.is_err());
    }

    #[tokio::test]
    async fn corrupted_slot_is_a_serialization_error() {
        let storage = InMemoryStorage::new();
        storage
            .set(SlotName::drafts(), "not json".to_string())
            .await
            .unwrap();
        let store = DraftStore::new(storage);

        let err = store.list_drafts().await.unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
