use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use shared::config::DeviationThresholds;
use shared::types::{Deviation, DeviationStatus};

use crate::engine::DeviationCandidate;

/// The only error the ledger raises. A transition that the state machine
/// does not allow behaves the same as an unknown id: there is no matching
/// deviation to transition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("deviation not found: {0}")]
    NotFound(Uuid),
}

/// Owns every deviation record and its lifecycle:
/// New -> Acknowledged -> Resolved, with New -> Resolved also allowed.
/// Records are never deleted here; retention belongs to the archive side.
pub struct DeviationLedger {
    thresholds: DeviationThresholds,
    records: DashMap<Uuid, Deviation>,
    // Insertion order, so per-truck and per-route queries come back in the
    // order deviations were raised.
    order: RwLock<Vec<Uuid>>,
}

impl DeviationLedger {
    pub fn new(thresholds: DeviationThresholds) -> Self {
        Self {
            thresholds,
            records: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Sole creation path for deviations: fresh id, detection time stamped
    /// now, status New, severity classified from the candidate's distance.
    pub fn record(&self, candidate: DeviationCandidate) -> Deviation {
        let deviation = Deviation {
            id: Uuid::new_v4(),
            route_id: candidate.route_id,
            truck_id: candidate.truck_id,
            distance_m: candidate.distance_m,
            coordinate: candidate.coordinate,
            detected_at: Utc::now(),
            severity: self.thresholds.severity_for(candidate.distance_m),
            status: DeviationStatus::New,
        };

        tracing::warn!(
            deviation_id = %deviation.id,
            truck_id = %deviation.truck_id,
            route_id = %deviation.route_id,
            distance_m = deviation.distance_m,
            severity = ?deviation.severity,
            "route deviation detected"
        );

        self.order.write().push(deviation.id);
        self.records.insert(deviation.id, deviation.clone());
        deviation
    }

    /// New -> Acknowledged.
    pub fn acknowledge(&self, id: Uuid) -> Result<Deviation, LedgerError> {
        let mut entry = self.records.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if entry.status != DeviationStatus::New {
            return Err(LedgerError::NotFound(id));
        }
        entry.status = DeviationStatus::Acknowledged;
        Ok(entry.clone())
    }

    /// New or Acknowledged -> Resolved.
    pub fn resolve(&self, id: Uuid) -> Result<Deviation, LedgerError> {
        let mut entry = self.records.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        if entry.status == DeviationStatus::Resolved {
            return Err(LedgerError::NotFound(id));
        }
        entry.status = DeviationStatus::Resolved;
        Ok(entry.clone())
    }

    pub fn all(&self) -> Vec<Deviation> {
        self.collect(|_| true)
    }

    /// Deviations still in status New.
    pub fn active(&self) -> Vec<Deviation> {
        self.collect(|d| d.status == DeviationStatus::New)
    }

    pub fn for_truck(&self, truck_id: &str) -> Vec<Deviation> {
        self.collect(|d| d.truck_id == truck_id)
    }

    pub fn for_route(&self, route_id: &str) -> Vec<Deviation> {
        self.collect(|d| d.route_id == route_id)
    }

    fn collect(&self, keep: impl Fn(&Deviation) -> bool) -> Vec<Deviation> {
        let order = self.order.read();
        order
            .iter()
            .filter_map(|id| self.records.get(id))
            .filter(|d| keep(d))
            .map(|d| d.clone())
            .collect()
    }
}
