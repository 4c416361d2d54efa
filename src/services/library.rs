//! Saved looks, favorites and viewing history
//!
//! Each collection is persisted whole under its own key. Saving or removing a
//! look touches the saved-looks record, the profile and the save counter in
//! turn, so an interrupted write can leave them disagreeing; [`LookLibrary::load`]
//! treats the saved-looks record as authoritative and repairs the other two.

use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::{
    db::{load_record, save_record, KeyValueStore, StoreKey},
    error::{AppError, AppResult},
    models::MakeupLook,
    services::{
        entitlement::{EntitlementGate, PaywallTrigger},
        profile::ProfileService,
    },
};

pub const MAX_HISTORY_ITEMS: usize = 20;

#[derive(Default)]
struct Collections {
    /// Most recent first
    saved: Vec<MakeupLook>,
    favorites: BTreeSet<String>,
    /// Most recent first, capped at [`MAX_HISTORY_ITEMS`]
    history: Vec<MakeupLook>,
}

pub struct LookLibrary {
    store: Arc<dyn KeyValueStore>,
    profile: Arc<ProfileService>,
    gate: Arc<EntitlementGate>,
    collections: Mutex<Collections>,
}

impl LookLibrary {
    /// Loads all collections and reconciles the profile and save counter
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        profile: Arc<ProfileService>,
        gate: Arc<EntitlementGate>,
    ) -> AppResult<Self> {
        let collections = Collections {
            saved: load_record(store.as_ref(), StoreKey::SavedLooks)
                .await
                .unwrap_or_default(),
            favorites: load_record(store.as_ref(), StoreKey::Favorites)
                .await
                .unwrap_or_default(),
            history: load_record(store.as_ref(), StoreKey::History)
                .await
                .unwrap_or_default(),
        };

        tracing::info!(
            saved = collections.saved.len(),
            favorites = collections.favorites.len(),
            history = collections.history.len(),
            backend = store.name(),
            "Look library loaded"
        );

        let library = Self {
            store,
            profile,
            gate,
            collections: Mutex::new(collections),
        };
        library.reconcile().await?;

        Ok(library)
    }

    /// Brings the profile's saved ids and the save counter in line with the
    /// saved-looks collection
    pub async fn reconcile(&self) -> AppResult<()> {
        let collections = self.collections.lock().await;
        let saved_ids: Vec<String> = collections.saved.iter().map(|l| l.id().to_string()).collect();

        let profile = self.profile.profile().await;
        if profile.saved_look_ids != saved_ids {
            tracing::warn!(
                profile_ids = profile.saved_look_ids.len(),
                saved_looks = saved_ids.len(),
                "Profile saved ids diverged from saved looks, rebuilding"
            );
            self.profile
                .mutate(|p| p.saved_look_ids = saved_ids.clone())
                .await?;
        }

        self.gate.sync_saved_count(saved_ids.len() as u32).await
    }

    pub async fn saved_looks(&self) -> Vec<MakeupLook> {
        self.collections.lock().await.saved.clone()
    }

    pub async fn is_saved(&self, look_id: &str) -> bool {
        self.collections
            .lock()
            .await
            .saved
            .iter()
            .any(|l| l.id() == look_id)
    }

    /// Saves a look at the front of the collection
    ///
    /// Returns `false` when the look was already saved. A new save is refused
    /// with a paywall error once the free save limit is used up.
    pub async fn save_look(&self, look: MakeupLook) -> AppResult<bool> {
        let mut collections = self.collections.lock().await;
        if collections.saved.iter().any(|l| l.id() == look.id()) {
            return Ok(false);
        }

        if !self.gate.can_save().await {
            return Err(AppError::PaywallRequired(PaywallTrigger::SavedLimitReached));
        }

        let look_id = look.id().to_string();
        let mut saved = collections.saved.clone();
        saved.insert(0, look);
        save_record(self.store.as_ref(), StoreKey::SavedLooks, &saved).await?;
        collections.saved = saved;

        self.profile
            .mutate(|p| p.saved_look_ids.push(look_id.clone()))
            .await?;
        self.gate.record_save().await?;

        tracing::info!(look_id = %look_id, saved = collections.saved.len(), "Look saved");
        Ok(true)
    }

    /// Removes a saved look; returns whether anything was removed
    pub async fn remove_look(&self, look_id: &str) -> AppResult<bool> {
        let mut collections = self.collections.lock().await;
        let mut saved = collections.saved.clone();
        saved.retain(|l| l.id() != look_id);
        if saved.len() == collections.saved.len() {
            return Ok(false);
        }

        save_record(self.store.as_ref(), StoreKey::SavedLooks, &saved).await?;
        collections.saved = saved;
        self.profile
            .mutate(|p| p.saved_look_ids.retain(|id| id != look_id))
            .await?;
        self.gate.record_removal().await?;

        tracing::info!(look_id = %look_id, saved = collections.saved.len(), "Look removed");
        Ok(true)
    }

    /// Flips the favorite flag; returns the new state
    pub async fn toggle_favorite(&self, look_id: &str) -> AppResult<bool> {
        let mut collections = self.collections.lock().await;
        let mut favorites = collections.favorites.clone();
        let now_favorite = if favorites.remove(look_id) {
            false
        } else {
            favorites.insert(look_id.to_string());
            true
        };

        save_record(self.store.as_ref(), StoreKey::Favorites, &favorites).await?;
        collections.favorites = favorites;
        Ok(now_favorite)
    }

    pub async fn is_favorite(&self, look_id: &str) -> bool {
        self.collections.lock().await.favorites.contains(look_id)
    }

    pub async fn favorite_ids(&self) -> Vec<String> {
        self.collections
            .lock()
            .await
            .favorites
            .iter()
            .cloned()
            .collect()
    }

    /// Favorite looks found among saved looks and history
    pub async fn favorites(&self) -> Vec<MakeupLook> {
        let collections = self.collections.lock().await;
        let mut seen = BTreeSet::new();

        collections
            .saved
            .iter()
            .chain(collections.history.iter())
            .filter(|l| collections.favorites.contains(l.id()))
            .filter(|l| seen.insert(l.id().to_string()))
            .cloned()
            .collect()
    }

    pub async fn history(&self) -> Vec<MakeupLook> {
        self.collections.lock().await.history.clone()
    }

    /// Moves the look to the front of the history, dropping the oldest past the cap
    pub async fn add_to_history(&self, look: MakeupLook) -> AppResult<()> {
        let mut collections = self.collections.lock().await;
        let mut history = collections.history.clone();
        history.retain(|l| l.id() != look.id());
        history.insert(0, look);
        history.truncate(MAX_HISTORY_ITEMS);

        save_record(self.store.as_ref(), StoreKey::History, &history).await?;
        collections.history = history;
        Ok(())
    }

    pub async fn remove_from_history(&self, look_id: &str) -> AppResult<bool> {
        let mut collections = self.collections.lock().await;
        let mut history = collections.history.clone();
        history.retain(|l| l.id() != look_id);
        if history.len() == collections.history.len() {
            return Ok(false);
        }

        save_record(self.store.as_ref(), StoreKey::History, &history).await?;
        collections.history = history;
        Ok(true)
    }

    pub async fn clear_history(&self) -> AppResult<()> {
        let mut collections = self.collections.lock().await;
        save_record(self.store.as_ref(), StoreKey::History, &Vec::<MakeupLook>::new()).await?;
        collections.history.clear();
        tracing::info!("History cleared");
        Ok(())
    }

    /// Finds a look by id among saved looks and history
    pub async fn find(&self, look_id: &str) -> Option<MakeupLook> {
        let collections = self.collections.lock().await;
        collections
            .saved
            .iter()
            .chain(collections.history.iter())
            .find(|l| l.id() == look_id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{load_counter, MemoryStore};
    use crate::models::{LookRequest, Mood, Occasion, SkinTone, StylePreference};
    use crate::services::entitlement::{FreeTierLimits, StaticEntitlements, SubscriptionStatus};
    use crate::services::fallback::fallback_look;

    fn look() -> MakeupLook {
        fallback_look(&LookRequest {
            skin_tone: SkinTone::Medium,
            face_shape: None,
            style_preference: StylePreference::Natural,
            occasion: Occasion::Casual,
            mood: Mood::Fresh,
        })
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        profile: Arc<ProfileService>,
        gate: Arc<EntitlementGate>,
        library: LookLibrary,
    }

    async fn create_fixture_with(store: Arc<MemoryStore>, status: SubscriptionStatus) -> Fixture {
        let profile = Arc::new(ProfileService::load(store.clone()).await);
        let gate = Arc::new(
            EntitlementGate::initialize(
                store.clone(),
                Arc::new(StaticEntitlements::new(status)),
                FreeTierLimits::default(),
            )
            .await,
        );
        let library = LookLibrary::load(store.clone(), profile.clone(), gate.clone())
            .await
            .unwrap();

        Fixture {
            store,
            profile,
            gate,
            library,
        }
    }

    async fn create_fixture() -> Fixture {
        create_fixture_with(Arc::new(MemoryStore::new()), SubscriptionStatus::None).await
    }

    #[tokio::test]
    async fn test_save_look_updates_profile_and_counter() {
        let f = create_fixture().await;
        let first = look();
        let second = look();

        assert!(f.library.save_look(first.clone()).await.unwrap());
        assert!(f.library.save_look(second.clone()).await.unwrap());
        assert!(!f.library.save_look(first.clone()).await.unwrap());

        let saved = f.library.saved_looks().await;
        assert_eq!(saved[0].id(), second.id());
        assert_eq!(saved[1].id(), first.id());

        let profile = f.profile.profile().await;
        assert_eq!(
            profile.saved_look_ids,
            vec![first.id().to_string(), second.id().to_string()]
        );
        assert_eq!(f.gate.counters().await.saved_looks_count, 2);
        assert!(f.library.is_saved(first.id()).await);
    }

    #[tokio::test]
    async fn test_save_refused_at_limit() {
        let f = create_fixture().await;
        for _ in 0..3 {
            f.library.save_look(look()).await.unwrap();
        }

        let err = f.library.save_look(look()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::PaywallRequired(PaywallTrigger::SavedLimitReached)
        ));
        assert_eq!(f.library.saved_looks().await.len(), 3);
    }

    #[tokio::test]
    async fn test_pro_saves_without_limit() {
        let f = create_fixture_with(Arc::new(MemoryStore::new()), SubscriptionStatus::Lifetime)
            .await;
        for _ in 0..5 {
            assert!(f.library.save_look(look()).await.unwrap());
        }
        assert_eq!(f.library.saved_looks().await.len(), 5);
    }

    #[tokio::test]
    async fn test_remove_look() {
        let f = create_fixture().await;
        let kept = look();
        let removed = look();
        f.library.save_look(kept.clone()).await.unwrap();
        f.library.save_look(removed.clone()).await.unwrap();

        assert!(f.library.remove_look(removed.id()).await.unwrap());
        assert!(!f.library.remove_look(removed.id()).await.unwrap());

        assert!(!f.library.is_saved(removed.id()).await);
        assert_eq!(
            f.profile.profile().await.saved_look_ids,
            vec![kept.id().to_string()]
        );
        assert_eq!(f.gate.counters().await.saved_looks_count, 1);
    }

    #[tokio::test]
    async fn test_reconcile_repairs_profile_and_counter() {
        let store = Arc::new(MemoryStore::new());
        let a = look();
        let b = look();

        save_record(store.as_ref(), StoreKey::SavedLooks, &vec![a.clone(), b.clone()])
            .await
            .unwrap();
        let mut stale = crate::models::UserProfile::new();
        stale.saved_look_ids = vec!["ghost".to_string(), a.id().to_string()];
        save_record(store.as_ref(), StoreKey::Profile, &stale).await.unwrap();
        crate::db::save_counter(store.as_ref(), StoreKey::SavedLooksCount, 7)
            .await
            .unwrap();

        let f = create_fixture_with(store, SubscriptionStatus::None).await;

        assert_eq!(
            f.profile.profile().await.saved_look_ids,
            vec![a.id().to_string(), b.id().to_string()]
        );
        assert_eq!(f.gate.counters().await.saved_looks_count, 2);
        assert_eq!(
            load_counter(f.store.as_ref(), StoreKey::SavedLooksCount).await,
            2
        );
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let f = create_fixture().await;
        let favorite = look();
        f.library.add_to_history(favorite.clone()).await.unwrap();

        assert!(f.library.toggle_favorite(favorite.id()).await.unwrap());
        assert!(f.library.is_favorite(favorite.id()).await);
        assert_eq!(f.library.favorites().await.len(), 1);

        assert!(!f.library.toggle_favorite(favorite.id()).await.unwrap());
        assert!(!f.library.is_favorite(favorite.id()).await);
        assert!(f.library.favorite_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_history_cap_and_order() {
        let f = create_fixture().await;
        let looks: Vec<MakeupLook> = (0..21).map(|_| look()).collect();
        for l in &looks {
            f.library.add_to_history(l.clone()).await.unwrap();
        }

        let history: Vec<String> = f
            .library
            .history()
            .await
            .iter()
            .map(|l| l.id().to_string())
            .collect();
        let newest_first: Vec<String> = looks[1..=20]
            .iter()
            .rev()
            .map(|l| l.id().to_string())
            .collect();

        assert_eq!(history.len(), MAX_HISTORY_ITEMS);
        assert_eq!(history, newest_first);
        assert!(!history.contains(&looks[0].id().to_string()));
    }

    #[tokio::test]
    async fn test_history_dedup_moves_to_front() {
        let f = create_fixture().await;
        let a = look();
        let b = look();
        f.library.add_to_history(a.clone()).await.unwrap();
        f.library.add_to_history(b.clone()).await.unwrap();
        f.library.add_to_history(a.clone()).await.unwrap();

        let history = f.library.history().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id(), a.id());

        assert!(f.library.remove_from_history(a.id()).await.unwrap());
        assert!(!f.library.remove_from_history(a.id()).await.unwrap());

        f.library.clear_history().await.unwrap();
        assert!(f.library.history().await.is_empty());
    }

    #[tokio::test]
    async fn test_collections_persist_across_load() {
        let f = create_fixture().await;
        let saved = look();
        f.library.save_look(saved.clone()).await.unwrap();
        f.library.toggle_favorite(saved.id()).await.unwrap();
        f.library.add_to_history(saved.clone()).await.unwrap();

        let reopened = create_fixture_with(f.store.clone(), SubscriptionStatus::None).await;
        assert!(reopened.library.is_saved(saved.id()).await);
        assert!(reopened.library.is_favorite(saved.id()).await);
        assert_eq!(reopened.library.history().await[0].id(), saved.id());
        assert_eq!(reopened.library.find(saved.id()).await.unwrap().look_name(), "Effortless Glow");
    }

    /// Memory store whose writes can be switched to fail
    struct FlakyStore {
        inner: MemoryStore,
        fail_writes: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for FlakyStore {
        async fn get_raw(&self, key: StoreKey) -> AppResult<Option<String>> {
            self.inner.get_raw(key).await
        }

        async fn put_raw(&self, key: StoreKey, value: String) -> AppResult<()> {
            if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(AppError::Storage("disk full".to_string()));
            }
            self.inner.put_raw(key, value).await
        }

        async fn delete(&self, key: StoreKey) -> AppResult<()> {
            self.inner.delete(key).await
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test]
    async fn test_failed_writes_leave_collections_unchanged() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            fail_writes: std::sync::atomic::AtomicBool::new(false),
        });
        let profile = Arc::new(ProfileService::load(store.clone()).await);
        let gate = Arc::new(
            EntitlementGate::initialize(
                store.clone(),
                Arc::new(StaticEntitlements::new(SubscriptionStatus::None)),
                FreeTierLimits::default(),
            )
            .await,
        );
        let library = LookLibrary::load(store.clone(), profile.clone(), gate.clone())
            .await
            .unwrap();

        let kept = look();
        library.save_look(kept.clone()).await.unwrap();
        library.add_to_history(kept.clone()).await.unwrap();

        store
            .fail_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let rejected = look();
        assert!(library.save_look(rejected.clone()).await.is_err());
        assert!(!library.is_saved(rejected.id()).await);

        assert!(library.remove_look(kept.id()).await.is_err());
        assert!(library.is_saved(kept.id()).await);

        assert!(library.toggle_favorite(kept.id()).await.is_err());
        assert!(!library.is_favorite(kept.id()).await);

        assert!(library.add_to_history(rejected.clone()).await.is_err());
        assert!(library.clear_history().await.is_err());
        let history = library.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id(), kept.id());

        assert_eq!(gate.counters().await.saved_looks_count, 1);
        assert_eq!(profile.profile().await.saved_look_ids, vec![kept.id().to_string()]);
    }
}
