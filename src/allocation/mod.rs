//! Bulk seller-to-zone allocation.
//!
//! The admin console assigns sellers to delivery zones in batches. A batch
//! never aborts on a bad item: every request resolves to an outcome and
//! the report carries all of them.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::Seller;
use crate::repository::ZoneRepository;

/// A single seller-to-zone assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub seller: Seller,
    pub zone_id: i64,
}

/// An established seller-to-zone assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellerAssignment {
    pub seller_id: Uuid,
    pub zone_id: i64,
}

/// Per-item allocation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationOutcome {
    Assigned,
    ZoneNotFound,
    ZoneInactive,
    AlreadyAssigned,
}

impl AllocationOutcome {
    pub fn is_assigned(&self) -> bool {
        matches!(self, AllocationOutcome::Assigned)
    }
}

/// One processed request with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationItem {
    pub request: AllocationRequest,
    pub outcome: AllocationOutcome,
}

/// Batch result: per-item outcomes plus counters and the new assignments.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationReport {
    pub items: Vec<AllocationItem>,
    pub assigned: usize,
    pub failed: usize,
    pub assignments: Vec<SellerAssignment>,
}

/// Stateful allocation batch.
///
/// Callers drive it item by item (the CLI advances a progress bar between
/// `apply` calls) and collect the report with `finish`.
pub struct AllocationRun<'a> {
    zones: &'a dyn ZoneRepository,
    taken: HashSet<(Uuid, i64)>,
    items: Vec<AllocationItem>,
    assigned: usize,
    failed: usize,
    new_assignments: Vec<SellerAssignment>,
}

impl<'a> AllocationRun<'a> {
    /// Start a run against the given zone set and pre-existing assignments.
    pub fn new(zones: &'a dyn ZoneRepository, existing: &[SellerAssignment]) -> Self {
        Self {
            zones,
            taken: existing.iter().map(|a| (a.seller_id, a.zone_id)).collect(),
            items: Vec::new(),
            assigned: 0,
            failed: 0,
            new_assignments: Vec::new(),
        }
    }

    /// Process one request. Failures are recorded, never propagated; the
    /// rest of the batch proceeds.
    pub fn apply(&mut self, request: AllocationRequest) -> AllocationOutcome {
        let outcome = self.resolve(&request);

        if outcome.is_assigned() {
            self.assigned += 1;
            self.taken.insert((request.seller.id, request.zone_id));
            self.new_assignments.push(SellerAssignment {
                seller_id: request.seller.id,
                zone_id: request.zone_id,
            });
        } else {
            self.failed += 1;
            warn!(
                "Allocation of seller {} ({}) to zone {} failed: {:?}",
                request.seller.name, request.seller.id, request.zone_id, outcome
            );
        }

        self.items.push(AllocationItem { request, outcome });
        outcome
    }

    fn resolve(&self, request: &AllocationRequest) -> AllocationOutcome {
        let zone = match self.zones.get(request.zone_id) {
            Ok(zone) => zone,
            Err(_) => return AllocationOutcome::ZoneNotFound,
        };

        if !zone.active {
            return AllocationOutcome::ZoneInactive;
        }

        if self.taken.contains(&(request.seller.id, request.zone_id)) {
            return AllocationOutcome::AlreadyAssigned;
        }

        AllocationOutcome::Assigned
    }

    /// Get current statistics
    pub fn stats(&self) -> (usize, usize) {
        (self.assigned, self.failed)
    }

    /// Finish the run and return the report
    pub fn finish(self) -> AllocationReport {
        AllocationReport {
            items: self.items,
            assigned: self.assigned,
            failed: self.failed,
            assignments: self.new_assignments,
        }
    }
}

/// One-shot batch allocation over a request list.
pub fn allocate_sellers(
    zones: &dyn ZoneRepository,
    existing: &[SellerAssignment],
    requests: &[AllocationRequest],
) -> AllocationReport {
    let mut run = AllocationRun::new(zones, existing);
    for request in requests {
        run.apply(request.clone());
    }
    run.finish()
}
