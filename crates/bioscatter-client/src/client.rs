#![forbid(unsafe_code)]

//! Cache-checked cluster result client.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use bioscatter_core::PointSet;

use crate::algorithm::Algorithm;
use crate::backend::{ClusterBackend, ClusterRequest};
use crate::cache::CacheStore;
use crate::cancel::CancellationToken;
use crate::error::{DeserializeError, FetchError};

/// Shared state for one in-flight fetch; followers block on `done` until
/// the leader deposits the shared outcome.
struct Flight {
    outcome: Mutex<Option<Result<Arc<PointSet>, FetchError>>>,
    done: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    fn deposit(&self, outcome: Result<Arc<PointSet>, FetchError>) {
        let mut slot = self.outcome.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(outcome);
        self.done.notify_all();
    }

    fn wait(&self) -> Result<Arc<PointSet>, FetchError> {
        let mut slot = self.outcome.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if let Some(outcome) = slot.as_ref() {
                return outcome.clone();
            }
            slot = self.done.wait(slot).unwrap_or_else(|e| e.into_inner());
        }
    }
}

/// Fetches cluster results through a cache with per-key single-flight.
///
/// Repeated switches between already-fetched algorithms issue zero
/// backend calls; concurrent requests for the same algorithm share one
/// call. The original frontend had neither guard, so rapid re-selection
/// could stack duplicate backend runs.
pub struct ClusterClient {
    backend: Arc<dyn ClusterBackend>,
    cache: Arc<dyn CacheStore>,
    flights: Mutex<HashMap<Algorithm, Arc<Flight>>>,
}

impl ClusterClient {
    /// Create a client over a transport and a cache store.
    pub fn new(backend: Arc<dyn ClusterBackend>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            backend,
            cache,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a (decodable) cache entry exists for the algorithm.
    pub fn is_cached(&self, algorithm: Algorithm) -> bool {
        self.read_cache(algorithm).is_some()
    }

    /// Return the cached point set for `request.algorithm`, fetching and
    /// caching it on a miss.
    ///
    /// The token is consulted before and after the backend call; a
    /// cancelled fetch yields [`FetchError::Cancelled`] and writes no
    /// cache entry. Failed fetches never write entries either, so a
    /// later retry goes back to the backend.
    pub fn get_or_fetch(
        &self,
        request: &ClusterRequest,
        cancel: &CancellationToken,
    ) -> Result<Arc<PointSet>, FetchError> {
        let algorithm = request.algorithm;

        if let Some(points) = self.read_cache(algorithm) {
            tracing::debug!(%algorithm, points = points.len(), "cache hit");
            return Ok(Arc::new(points));
        }

        let (flight, leader) = {
            let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
            match flights.get(&algorithm) {
                Some(flight) => (Arc::clone(flight), false),
                None => {
                    let flight = Arc::new(Flight::new());
                    flights.insert(algorithm, Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if !leader {
            tracing::debug!(%algorithm, "joining in-flight fetch");
            return flight.wait();
        }

        let outcome = self.run_fetch(request, cancel);
        flight.deposit(outcome.clone());
        let mut flights = self.flights.lock().unwrap_or_else(|e| e.into_inner());
        flights.remove(&algorithm);
        outcome
    }

    fn run_fetch(
        &self,
        request: &ClusterRequest,
        cancel: &CancellationToken,
    ) -> Result<Arc<PointSet>, FetchError> {
        let algorithm = request.algorithm;

        // A follower may have raced a completed leader here: the flight
        // table was empty but the cache is already warm.
        if let Some(points) = self.read_cache(algorithm) {
            return Ok(Arc::new(points));
        }

        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled { algorithm });
        }

        let points = self.backend.fetch(request)?;

        if cancel.is_cancelled() {
            tracing::debug!(%algorithm, "fetch completed after cancellation; discarding");
            return Err(FetchError::Cancelled { algorithm });
        }

        self.write_cache(algorithm, &points);
        tracing::info!(%algorithm, points = points.len(), "fetched and cached cluster result");
        Ok(Arc::new(points))
    }

    fn read_cache(&self, algorithm: Algorithm) -> Option<PointSet> {
        let key = algorithm.wire_name();
        let bytes = self.cache.read(key)?;
        match decode_entry(key, &bytes) {
            Ok(points) => Some(points),
            Err(err) => {
                // Corrupt entries are a miss, not a crash; the fetch that
                // follows will overwrite them.
                tracing::warn!(%err, "discarding corrupt cache entry");
                None
            }
        }
    }

    fn write_cache(&self, algorithm: Algorithm, points: &PointSet) {
        let key = algorithm.wire_name();
        match serde_json::to_vec(points) {
            Ok(bytes) => {
                if let Err(err) = self.cache.write(key, &bytes) {
                    tracing::warn!(%key, %err, "cache write failed; continuing uncached");
                }
            }
            Err(err) => {
                tracing::warn!(%key, %err, "cache serialization failed; continuing uncached");
            }
        }
    }
}

fn decode_entry(key: &str, bytes: &[u8]) -> Result<PointSet, DeserializeError> {
    serde_json::from_slice(bytes).map_err(|e| DeserializeError {
        key: key.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bioscatter_core::Point;

    #[test]
    fn decode_rejects_garbage() {
        let err = decode_entry("kmeans", b"{{not json").unwrap_err();
        assert_eq!(err.key, "kmeans");
    }

    #[test]
    fn decode_accepts_serialized_set() {
        let set = PointSet::from(vec![Point::new(1.0, 2.0, 0)]);
        let bytes = serde_json::to_vec(&set).unwrap();
        assert_eq!(decode_entry("dbscan", &bytes).unwrap(), set);
    }
}
