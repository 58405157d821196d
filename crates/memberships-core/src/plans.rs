//! Plan Repository
//!
//! Storage contract for membership plan records and the in-memory
//! implementation. Plans are read-only from the core's perspective;
//! creation and editing are operator-side concerns.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;

use crate::model::{ContentRecord, PLAN_RECORD_KIND, Plan, PlanId, PlanStatus, PlanSummary};

/// Storage meta key holding a plan's price
pub const PRICE_META_KEY: &str = "memberships_price";

/// Storage meta key holding a plan's currency
pub const CURRENCY_META_KEY: &str = "memberships_currency";

/// Map of plan field names to the storage meta keys that hold them.
///
/// The storage keys double as the declaration of which fields participate
/// in any external sync/replication mechanism, see [`sync_meta_keys`].
pub fn plan_field_mapping() -> &'static [(&'static str, &'static str)] {
    &[
        ("price", PRICE_META_KEY),
        ("currency", CURRENCY_META_KEY),
    ]
}

/// Storage meta keys eligible for external sync/replication
pub fn sync_meta_keys() -> Vec<&'static str> {
    plan_field_mapping().iter().map(|(_, key)| *key).collect()
}

impl ContentRecord {
    /// Decode this record into a plan.
    ///
    /// Records of any other kind are rejected, never misread as plans.
    /// Missing or unparsable meta degrades to a zero price, not a failure.
    pub fn into_plan(self) -> Option<Plan> {
        if !self.is_plan() {
            return None;
        }

        let price = self
            .meta
            .get(PRICE_META_KEY)
            .and_then(|raw| raw.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO);
        let currency = self
            .meta
            .get(CURRENCY_META_KEY)
            .cloned()
            .unwrap_or_else(|| "USD".into());

        Some(Plan {
            id: self.id,
            title: self.title,
            price,
            currency,
            status: self.status,
            created_at: self.created_at,
        })
    }
}

/// A plan to be created by the repository
#[derive(Clone, Debug)]
pub struct NewPlan {
    pub title: String,
    pub price: Decimal,
    pub currency: String,
    pub status: PlanStatus,
}

/// Plan storage trait
pub trait PlanRepository: Send + Sync {
    /// Look up a raw content record by id
    fn find_record(&self, id: PlanId) -> Option<ContentRecord>;

    /// Look up a plan by id. Records of other kinds resolve to `None`.
    fn find_plan(&self, id: PlanId) -> Option<Plan> {
        self.find_record(id).and_then(ContentRecord::into_plan)
    }

    /// Published plans as summaries, ordered by id
    fn published_plans(&self) -> Vec<PlanSummary>;
}

/// In-memory plan repository (for development and tests)
pub struct MemoryPlanRepository {
    records: RwLock<BTreeMap<PlanId, ContentRecord>>,
    next_id: AtomicU64,
}

impl Default for MemoryPlanRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPlanRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> PlanId {
        // Counter starts at 1, so this never yields the invalid zero id.
        PlanId::from_raw(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Create a plan record, assigning its id
    pub fn create_plan(&self, new: NewPlan) -> PlanId {
        let id = self.allocate_id();
        let mut meta = BTreeMap::new();
        meta.insert(PRICE_META_KEY.to_string(), new.price.to_string());
        meta.insert(CURRENCY_META_KEY.to_string(), new.currency);

        let record = ContentRecord {
            id,
            kind: PLAN_RECORD_KIND.to_string(),
            status: new.status,
            title: new.title,
            meta,
            created_at: Utc::now(),
        };

        self.records.write().unwrap().insert(id, record);
        id
    }

    /// Insert a record of a foreign kind, assigning its id.
    ///
    /// The repository stores more than plans; this is how the wrong-kind
    /// invariant stays observable.
    pub fn insert_record(&self, kind: &str, status: PlanStatus, title: &str) -> PlanId {
        let id = self.allocate_id();
        let record = ContentRecord {
            id,
            kind: kind.to_string(),
            status,
            title: title.to_string(),
            meta: BTreeMap::new(),
            created_at: Utc::now(),
        };

        self.records.write().unwrap().insert(id, record);
        id
    }
}

impl PlanRepository for MemoryPlanRepository {
    fn find_record(&self, id: PlanId) -> Option<ContentRecord> {
        self.records.read().unwrap().get(&id).cloned()
    }

    fn published_plans(&self) -> Vec<PlanSummary> {
        self.records
            .read()
            .unwrap()
            .values()
            .filter(|record| record.is_plan() && record.status == PlanStatus::Published)
            .filter_map(|record| record.clone().into_plan())
            .map(|plan| PlanSummary {
                id: plan.id,
                title: plan.title,
                price: plan.price,
                currency: plan.currency,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn published(title: &str, price: Decimal) -> NewPlan {
        NewPlan {
            title: title.into(),
            price,
            currency: "USD".into(),
            status: PlanStatus::Published,
        }
    }

    #[test]
    fn test_repository_assigns_sequential_ids() {
        let repo = MemoryPlanRepository::new();
        let first = repo.create_plan(published("Monthly", dec!(5.00)));
        let second = repo.create_plan(published("Yearly", dec!(50.00)));

        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 2);
    }

    #[test]
    fn test_find_plan_decodes_meta() {
        let repo = MemoryPlanRepository::new();
        let id = repo.create_plan(published("Monthly supporter", dec!(5.00)));

        let plan = repo.find_plan(id).unwrap();
        assert_eq!(plan.title, "Monthly supporter");
        assert_eq!(plan.price, dec!(5.00));
        assert_eq!(plan.currency, "USD");
        assert!(plan.is_renderable());
    }

    #[test]
    fn test_foreign_kind_is_not_a_plan() {
        let repo = MemoryPlanRepository::new();
        let id = repo.insert_record("page", PlanStatus::Published, "About us");

        assert!(repo.find_record(id).is_some());
        assert!(repo.find_plan(id).is_none());
    }

    #[test]
    fn test_published_listing_skips_drafts_and_foreign_kinds() {
        let repo = MemoryPlanRepository::new();
        let monthly = repo.create_plan(published("Monthly", dec!(5.00)));
        repo.create_plan(NewPlan {
            title: "Draft tier".into(),
            price: dec!(1.00),
            currency: "USD".into(),
            status: PlanStatus::Draft,
        });
        repo.insert_record("page", PlanStatus::Published, "About us");
        let yearly = repo.create_plan(published("Yearly", dec!(50.00)));

        let listed = repo.published_plans();
        assert_eq!(
            listed.iter().map(|plan| plan.id).collect::<Vec<_>>(),
            vec![monthly, yearly]
        );
    }

    #[test]
    fn test_field_mapping_declares_sync_keys() {
        assert_eq!(sync_meta_keys(), vec![PRICE_META_KEY, CURRENCY_META_KEY]);
        assert!(
            plan_field_mapping()
                .iter()
                .all(|(_, key)| key.starts_with("memberships_"))
        );
    }
}
