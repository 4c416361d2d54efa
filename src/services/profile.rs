use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    db::{load_record, save_record, KeyValueStore, StoreKey},
    error::AppResult,
    models::{LookRequest, Mood, Occasion, SkinTone, StylePreference, UserProfile},
};

/// Owns the stored user profile
pub struct ProfileService {
    store: Arc<dyn KeyValueStore>,
    profile: RwLock<UserProfile>,
}

impl ProfileService {
    /// Loads the stored profile, starting a fresh one if none is readable
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let profile = match load_record::<UserProfile>(store.as_ref(), StoreKey::Profile).await {
            Some(profile) => profile,
            None => {
                tracing::info!("No stored profile, starting with defaults");
                UserProfile::new()
            }
        };

        Self {
            store,
            profile: RwLock::new(profile),
        }
    }

    pub async fn profile(&self) -> UserProfile {
        self.profile.read().await.clone()
    }

    /// Snapshot of the profile combined with this look's occasion and mood
    pub async fn build_request(&self, occasion: Occasion, mood: Mood) -> LookRequest {
        LookRequest::from_profile(&*self.profile.read().await, occasion, mood)
    }

    /// Replaces the editable fields
    ///
    /// The saved-look ids belong to the look library and are kept as stored.
    pub async fn update_profile(&self, update: UserProfile) -> AppResult<UserProfile> {
        self.mutate(|profile| {
            let saved_look_ids = std::mem::take(&mut profile.saved_look_ids);
            *profile = UserProfile {
                saved_look_ids,
                ..update
            };
        })
        .await
    }

    pub async fn complete_onboarding(
        &self,
        skin_tone: SkinTone,
        style_preference: StylePreference,
    ) -> AppResult<UserProfile> {
        let profile = self
            .mutate(|profile| {
                profile.skin_tone = skin_tone;
                profile.style_preference = style_preference;
                profile.has_completed_onboarding = true;
            })
            .await?;

        tracing::info!(
            skin_tone = skin_tone.as_str(),
            style = style_preference.display_name(),
            "Onboarding completed"
        );
        Ok(profile)
    }

    pub async fn reset_onboarding(&self) -> AppResult<UserProfile> {
        self.mutate(|profile| profile.has_completed_onboarding = false)
            .await
    }

    /// Applies `change` and writes the whole profile back
    pub(crate) async fn mutate<F>(&self, change: F) -> AppResult<UserProfile>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut profile = self.profile.write().await;
        change(&mut profile);
        save_record(self.store.as_ref(), StoreKey::Profile, &*profile).await?;
        Ok(profile.clone())
    }
}
