//! Free-tier gating
//!
//! Two independent gates, each driven by a lifetime counter compared against a
//! fixed free-tier limit. A pro subscription bypasses both. The gate is an
//! explicitly constructed service: build it with [`EntitlementGate::initialize`]
//! and call [`EntitlementGate::shutdown`] when the session ends.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::{
    db::{load_counter, save_counter, KeyValueStore, StoreKey},
    error::AppResult,
};

pub const MONTHLY_PRODUCT_ID: &str = "com.glowguide.pro.monthly";
pub const YEARLY_PRODUCT_ID: &str = "com.glowguide.pro.yearly";
pub const LIFETIME_PRODUCT_ID: &str = "com.glowguide.pro.lifetime";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    None,
    Monthly,
    Yearly,
    Lifetime,
    Trial,
}

impl SubscriptionStatus {
    pub fn is_pro(&self) -> bool {
        *self != SubscriptionStatus::None
    }
}

/// Why the paywall is being shown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PaywallTrigger {
    General,
    FreeLimitReached,
    SavedLimitReached,
    PremiumFeature,
}

impl PaywallTrigger {
    pub fn title(&self) -> &'static str {
        match self {
            PaywallTrigger::General => "Unlock GlowGuide Pro",
            PaywallTrigger::FreeLimitReached => "Free Limit Reached",
            PaywallTrigger::SavedLimitReached => "Save Limit Reached",
            PaywallTrigger::PremiumFeature => "Premium Feature",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PaywallTrigger::General => "Get unlimited AI-powered beauty recommendations",
            PaywallTrigger::FreeLimitReached => {
                "You've used all your free looks. Upgrade to Pro for unlimited access!"
            }
            PaywallTrigger::SavedLimitReached => {
                "You've filled your free saved looks. Upgrade to Pro for unlimited favorites!"
            }
            PaywallTrigger::PremiumFeature => "This feature is available for Pro members",
        }
    }
}

/// A purchasable Pro product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: String,
    pub display_name: String,
    /// Price in cents (e.g., 499 = $4.99)
    pub price_cents: u32,
}

impl Product {
    pub fn new(id: &str, display_name: &str, price_cents: u32) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            price_cents,
        }
    }

    pub fn period_text(&self) -> &'static str {
        match self.id.as_str() {
            MONTHLY_PRODUCT_ID => "Monthly",
            YEARLY_PRODUCT_ID => "Yearly",
            LIFETIME_PRODUCT_ID => "Lifetime",
            _ => "",
        }
    }

    /// Price label normalized to a monthly figure
    pub fn price_per_month_text(&self) -> String {
        match self.id.as_str() {
            MONTHLY_PRODUCT_ID => format!("{}/mo", format_cents(self.price_cents)),
            YEARLY_PRODUCT_ID => format!("{}/mo", format_cents(self.price_cents / 12)),
            LIFETIME_PRODUCT_ID => "One-time".to_string(),
            _ => format_cents(self.price_cents),
        }
    }
}

fn format_cents(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Default Pro catalog, sorted by price
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product::new(MONTHLY_PRODUCT_ID, "GlowGuide Pro Monthly", 499),
        Product::new(YEARLY_PRODUCT_ID, "GlowGuide Pro Yearly", 2999),
        Product::new(LIFETIME_PRODUCT_ID, "GlowGuide Pro Lifetime", 7999),
    ]
}

/// Whole-percent saving of the yearly plan against twelve monthly payments
pub fn yearly_savings_percent(products: &[Product]) -> u32 {
    let monthly = products.iter().find(|p| p.id == MONTHLY_PRODUCT_ID);
    let yearly = products.iter().find(|p| p.id == YEARLY_PRODUCT_ID);

    let (Some(monthly), Some(yearly)) = (monthly, yearly) else {
        return 0;
    };

    let monthly_annual = monthly.price_cents as f64 * 12.0;
    if monthly_annual <= 0.0 {
        return 0;
    }

    let savings = (monthly_annual - yearly.price_cents as f64) / monthly_annual * 100.0;
    savings.round().max(0.0) as u32
}

/// Source of truth for the user's subscription
///
/// Receipt verification lives outside this crate; the gate only asks whether
/// the user is pro and which products can be offered.
#[async_trait::async_trait]
pub trait EntitlementOracle: Send + Sync {
    async fn subscription_status(&self) -> SubscriptionStatus;

    async fn products(&self) -> Vec<Product>;
}

/// Oracle that reports a fixed, externally supplied status
pub struct StaticEntitlements {
    status: RwLock<SubscriptionStatus>,
    products: Vec<Product>,
}

impl StaticEntitlements {
    pub fn new(status: SubscriptionStatus) -> Self {
        let mut products = default_catalog();
        products.sort_by_key(|p| p.price_cents);

        Self {
            status: RwLock::new(status),
            products,
        }
    }

    /// Applies a status change reported by the platform store
    pub async fn set_status(&self, status: SubscriptionStatus) {
        *self.status.write().await = status;
        tracing::info!(status = ?status, "Subscription status updated");
    }
}

#[async_trait::async_trait]
impl EntitlementOracle for StaticEntitlements {
    async fn subscription_status(&self) -> SubscriptionStatus {
        *self.status.read().await
    }

    async fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeTierLimits {
    pub looks: u32,
    pub saves: u32,
}

impl Default for FreeTierLimits {
    fn default() -> Self {
        Self { looks: 3, saves: 3 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageCounters {
    pub looks_generated: u32,
    pub saved_looks_count: u32,
}

/// Snapshot reported to the UI
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementStatus {
    pub subscription_status: SubscriptionStatus,
    pub is_pro: bool,
    pub looks_generated: u32,
    pub saved_looks_count: u32,
    pub free_look_limit: u32,
    pub free_saved_look_limit: u32,
    pub remaining_free_looks: u32,
    pub remaining_saved_slots: u32,
    pub can_generate: bool,
    pub can_save: bool,
    pub products: Vec<Product>,
    pub yearly_savings_percent: u32,
}

pub struct EntitlementGate {
    store: Arc<dyn KeyValueStore>,
    oracle: Arc<dyn EntitlementOracle>,
    limits: FreeTierLimits,
    counters: Mutex<UsageCounters>,
}

impl EntitlementGate {
    /// Loads persisted counters and returns a ready gate
    pub async fn initialize(
        store: Arc<dyn KeyValueStore>,
        oracle: Arc<dyn EntitlementOracle>,
        limits: FreeTierLimits,
    ) -> Self {
        let counters = UsageCounters {
            looks_generated: load_counter(store.as_ref(), StoreKey::LooksGenerated).await,
            saved_looks_count: load_counter(store.as_ref(), StoreKey::SavedLooksCount).await,
        };

        tracing::info!(
            looks_generated = counters.looks_generated,
            saved_looks_count = counters.saved_looks_count,
            look_limit = limits.looks,
            save_limit = limits.saves,
            "Entitlement gate initialized"
        );

        Self {
            store,
            oracle,
            limits,
            counters: Mutex::new(counters),
        }
    }

    /// Flushes counters; the gate should not be used afterwards
    pub async fn shutdown(&self) -> AppResult<()> {
        let counters = *self.counters.lock().await;
        self.persist(&counters).await?;
        tracing::info!("Entitlement gate shut down");
        Ok(())
    }

    pub fn limits(&self) -> FreeTierLimits {
        self.limits
    }

    pub async fn counters(&self) -> UsageCounters {
        *self.counters.lock().await
    }

    pub async fn is_pro(&self) -> bool {
        self.oracle.subscription_status().await.is_pro()
    }

    pub async fn can_generate(&self) -> bool {
        if self.is_pro().await {
            return true;
        }
        self.counters.lock().await.looks_generated < self.limits.looks
    }

    pub async fn can_save(&self) -> bool {
        if self.is_pro().await {
            return true;
        }
        self.counters.lock().await.saved_looks_count < self.limits.saves
    }

    pub async fn remaining_free_looks(&self) -> u32 {
        let counters = self.counters.lock().await;
        self.limits.looks.saturating_sub(counters.looks_generated)
    }

    pub async fn remaining_saved_slots(&self) -> u32 {
        let counters = self.counters.lock().await;
        self.limits.saves.saturating_sub(counters.saved_looks_count)
    }

    /// Counts one generation; callers invoke this after a look was produced
    pub async fn record_generation(&self) -> AppResult<u32> {
        self.update(|c| c.looks_generated = c.looks_generated.saturating_add(1))
            .await
            .map(|c| c.looks_generated)
    }

    /// Claims one generation if the gate allows it
    ///
    /// The check and the increment happen under one lock, so concurrent
    /// callers cannot claim more than the free limit between them.
    pub async fn try_record_generation(&self) -> AppResult<bool> {
        let is_pro = self.is_pro().await;
        let mut counters = self.counters.lock().await;
        if !is_pro && counters.looks_generated >= self.limits.looks {
            return Ok(false);
        }

        counters.looks_generated = counters.looks_generated.saturating_add(1);
        let snapshot = *counters;
        self.persist(&snapshot).await?;
        Ok(true)
    }

    pub async fn record_save(&self) -> AppResult<u32> {
        self.update(|c| c.saved_looks_count = c.saved_looks_count.saturating_add(1))
            .await
            .map(|c| c.saved_looks_count)
    }

    /// Counts one removal, never going below zero
    pub async fn record_removal(&self) -> AppResult<u32> {
        self.update(|c| c.saved_looks_count = c.saved_looks_count.saturating_sub(1))
            .await
            .map(|c| c.saved_looks_count)
    }

    /// Overrides the save counter with the actual saved-collection size
    pub async fn sync_saved_count(&self, count: u32) -> AppResult<()> {
        let previous = self.counters().await.saved_looks_count;
        if previous != count {
            tracing::warn!(
                stored = previous,
                actual = count,
                "Save counter drifted from saved looks, resynchronizing"
            );
        }
        self.update(|c| c.saved_looks_count = count).await?;
        Ok(())
    }

    /// Zeroes both counters
    pub async fn reset_usage(&self) -> AppResult<()> {
        self.update(|c| *c = UsageCounters::default()).await?;
        tracing::info!("Usage counters reset");
        Ok(())
    }

    pub async fn status(&self) -> EntitlementStatus {
        let subscription_status = self.oracle.subscription_status().await;
        let products = self.oracle.products().await;
        let counters = self.counters().await;
        let is_pro = subscription_status.is_pro();

        EntitlementStatus {
            subscription_status,
            is_pro,
            looks_generated: counters.looks_generated,
            saved_looks_count: counters.saved_looks_count,
            free_look_limit: self.limits.looks,
            free_saved_look_limit: self.limits.saves,
            remaining_free_looks: self.limits.looks.saturating_sub(counters.looks_generated),
            remaining_saved_slots: self.limits.saves.saturating_sub(counters.saved_looks_count),
            can_generate: is_pro || counters.looks_generated < self.limits.looks,
            can_save: is_pro || counters.saved_looks_count < self.limits.saves,
            yearly_savings_percent: yearly_savings_percent(&products),
            products,
        }
    }

    async fn update<F>(&self, mutate: F) -> AppResult<UsageCounters>
    where
        F: FnOnce(&mut UsageCounters),
    {
        let mut counters = self.counters.lock().await;
        mutate(&mut counters);
        let snapshot = *counters;
        self.persist(&snapshot).await?;
        Ok(snapshot)
    }

    async fn persist(&self, counters: &UsageCounters) -> AppResult<()> {
        save_counter(
            self.store.as_ref(),
            StoreKey::LooksGenerated,
            counters.looks_generated,
        )
        .await?;
        save_counter(
            self.store.as_ref(),
            StoreKey::SavedLooksCount,
            counters.saved_looks_count,
        )
        .await
    }
}
