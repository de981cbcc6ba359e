use std::time::{Duration, Instant};

use dashmap::DashMap;

use shared::geo;
use shared::types::{Coordinate, Position};

struct CacheEntry {
    position: Position,
    stored_at: Instant,
}

/// Freshness-bounded view of each truck's last known position.
///
/// Entries expire lazily: a `get` past the TTL behaves as absent without
/// physically evicting. Operations on different trucks do not block each
/// other; same-key operations are linearized by the map's shard lock, so
/// the last `put` wins and is observed atomically.
pub struct PositionCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl PositionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Overwrites any prior entry for the truck and resets its expiry.
    pub fn put(&self, position: Position) {
        self.entries.insert(
            position.truck_id.clone(),
            CacheEntry {
                position,
                stored_at: Instant::now(),
            },
        );
    }

    /// The truck's current position, if still within the TTL.
    pub fn get(&self, truck_id: &str) -> Option<Position> {
        let entry = self.entries.get(truck_id)?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.position.clone())
    }

    /// Removes an entry unconditionally.
    pub fn evict(&self, truck_id: &str) {
        self.entries.remove(truck_id);
    }

    /// All fresh positions within `radius_m` of `center`.
    pub fn positions_within(&self, center: Coordinate, radius_m: f64) -> Vec<Position> {
        self.fresh()
            .filter(|p| geo::distance(center, p.coordinate) <= radius_m)
            .collect()
    }

    /// The fresh position closest to `center`, with its distance in meters.
    pub fn nearest(&self, center: Coordinate) -> Option<(Position, f64)> {
        self.fresh()
            .map(|p| {
                let d = geo::distance(center, p.coordinate);
                (p, d)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn fresh(&self) -> impl Iterator<Item = Position> + '_ {
        self.entries.iter().filter_map(|entry| {
            if entry.stored_at.elapsed() > self.ttl {
                None
            } else {
                Some(entry.position.clone())
            }
        })
    }
}
