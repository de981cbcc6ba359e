use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;

use deviations_service::{DeviationEngine, DeviationLedger};
use shared::archive::DeviationArchive;
use shared::broadcast::{Broadcaster, DEVIATIONS_CHANNEL, POSITIONS_CHANNEL};
use shared::error::FleetError;
use shared::routes::RouteProvider;
use shared::types::{Deviation, Position, PositionReport};

use crate::cache::PositionCache;

/// Synchronous result of one handled report, returned to the caller
/// independently of the asynchronous broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct PositionUpdate {
    pub position: Position,
    pub deviation: Option<Deviation>,
}

/// Orchestrates one position report end to end: validate, cache, fan out,
/// check against the active route, record and announce any deviation.
pub struct UpdatePipeline {
    cache: Arc<PositionCache>,
    engine: DeviationEngine,
    ledger: Arc<DeviationLedger>,
    routes: Arc<dyn RouteProvider>,
    broadcaster: Arc<dyn Broadcaster>,
    archive: Arc<dyn DeviationArchive>,
    // Per-truck ordering guards. A single global lock would serialize
    // unrelated trucks; one async mutex per truck keeps same-truck reports
    // in arrival order while distinct trucks proceed concurrently.
    truck_guards: DashMap<String, Arc<Mutex<()>>>,
}

impl UpdatePipeline {
    pub fn new(
        cache: Arc<PositionCache>,
        engine: DeviationEngine,
        ledger: Arc<DeviationLedger>,
        routes: Arc<dyn RouteProvider>,
        broadcaster: Arc<dyn Broadcaster>,
        archive: Arc<dyn DeviationArchive>,
    ) -> Self {
        Self {
            cache,
            engine,
            ledger,
            routes,
            broadcaster,
            archive,
            truck_guards: DashMap::new(),
        }
    }

    /// Processes one report. Rejected reports never touch the cache or the
    /// ledger. A truck with no active route is a normal no-deviation
    /// outcome. Broadcast and archive sends are fire-and-forget; their
    /// failure never rolls back cache or ledger state.
    pub async fn handle(&self, report: PositionReport) -> Result<PositionUpdate, FleetError> {
        let position = report.into_position()?;

        let guard = self.truck_guard(&position.truck_id);
        let _ordering = guard.lock().await;

        self.cache.put(position.clone());
        self.publish(POSITIONS_CHANNEL, &position);

        let Some(route) = self.routes.active_route_for(&position.truck_id).await else {
            return Ok(PositionUpdate {
                position,
                deviation: None,
            });
        };
        let waypoints = self.routes.waypoints_of(&route.route_id).await;

        let deviation = self
            .engine
            .evaluate(&position, &route, &waypoints)
            .map(|candidate| {
                let deviation = self.ledger.record(candidate);
                self.archive_deviation(deviation.clone());
                self.publish(DEVIATIONS_CHANNEL, &deviation);
                deviation
            });

        Ok(PositionUpdate {
            position,
            deviation,
        })
    }

    fn truck_guard(&self, truck_id: &str) -> Arc<Mutex<()>> {
        self.truck_guards
            .entry(truck_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn publish<T: Serialize>(&self, channel: &'static str, value: &T) {
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(channel, error = %e, "failed to encode broadcast payload");
                return;
            }
        };
        let broadcaster = Arc::clone(&self.broadcaster);
        tokio::spawn(async move {
            if let Err(e) = broadcaster.publish(channel, &payload).await {
                tracing::warn!(channel, error = %e, "broadcast publish failed");
            }
        });
    }

    fn archive_deviation(&self, deviation: Deviation) {
        let archive = Arc::clone(&self.archive);
        tokio::spawn(async move {
            if let Err(e) = archive.persist(&deviation).await {
                tracing::warn!(
                    deviation_id = %deviation.id,
                    error = %e,
                    "deviation archive write failed"
                );
            }
        });
    }
}
