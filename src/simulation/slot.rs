use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use super::Snapshot;

/// Single-slot, last-writer-wins snapshot channel.
///
/// Readers always get the most recent fully-formed snapshot and never block
/// the writer for longer than an `Arc` swap. Snapshots older than the one
/// held are dropped, so readers never see time run backwards.
#[derive(Debug, Default)]
pub struct SnapshotSlot {
    latest: RwLock<Option<Arc<Snapshot>>>,
    published: AtomicU64,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial(snapshot: Arc<Snapshot>) -> Self {
        Self {
            latest: RwLock::new(Some(snapshot)),
            published: AtomicU64::new(1),
        }
    }

    /// Replaces the held snapshot. Returns false if `snapshot` is older than
    /// the one already held.
    pub fn publish(&self, snapshot: Arc<Snapshot>) -> bool {
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = latest.as_ref() {
            if snapshot.time < current.time {
                return false;
            }
        }
        *latest = Some(snapshot);
        self.published.fetch_add(1, Ordering::Release);
        true
    }

    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of snapshots accepted so far. Lets pollers skip unchanged data.
    pub fn version(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }

    pub fn reader(self: &Arc<Self>) -> SnapshotReader {
        SnapshotReader {
            slot: Arc::clone(self),
            seen: 0,
        }
    }
}

/// Polling handle that reports only snapshots it has not returned before.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    slot: Arc<SnapshotSlot>,
    seen: u64,
}

impl SnapshotReader {
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.slot.latest()
    }

    /// The latest snapshot if it was published since the previous call.
    pub fn poll(&mut self) -> Option<Arc<Snapshot>> {
        let version = self.slot.version();
        if version == self.seen {
            return None;
        }
        self.seen = version;
        self.slot.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        components::{AirData, AircraftState, ControlInputs, ForceAccumulator},
        resources::{AtmosphereConfig, AtmosphereModel},
        simulation::{Diagnostics, FlightData},
    };

    fn snapshot(time: f64) -> Arc<Snapshot> {
        Arc::new(Snapshot {
            time,
            state: AircraftState::level_flight(50.0, 500.0, 0.0),
            air_data: AirData::default(),
            engines: Vec::new(),
            environment: AtmosphereModel::sample(500.0, &AtmosphereConfig::default()),
            controls: ControlInputs::default(),
            forces: ForceAccumulator::default(),
            flight_data: FlightData::default(),
            diagnostics: Diagnostics::default(),
        })
    }

    #[test]
    fn test_last_writer_wins() {
        let slot = Arc::new(SnapshotSlot::new());
        assert!(slot.latest().is_none());

        for i in 1..=5 {
            assert!(slot.publish(snapshot(i as f64 * 0.01)));
        }
        assert_eq!(slot.version(), 5);
        assert_eq!(slot.latest().map(|s| s.time), Some(0.05));
    }

    #[test]
    fn test_older_snapshot_rejected() {
        let slot = SnapshotSlot::with_initial(snapshot(1.0));
        assert!(!slot.publish(snapshot(0.5)));
        assert_eq!(slot.version(), 1);
        assert_eq!(slot.latest().map(|s| s.time), Some(1.0));
        // Equal time is not older
        assert!(slot.publish(snapshot(1.0)));
    }

    #[test]
    fn test_reader_reports_each_version_once() {
        let slot = Arc::new(SnapshotSlot::with_initial(snapshot(0.0)));
        let mut reader = slot.reader();

        assert_eq!(reader.poll().map(|s| s.time), Some(0.0));
        assert!(reader.poll().is_none());

        slot.publish(snapshot(0.01));
        slot.publish(snapshot(0.02));
        // A slow reader skips straight to the newest
        assert_eq!(reader.poll().map(|s| s.time), Some(0.02));
        assert!(reader.poll().is_none());
        assert_eq!(reader.latest().map(|s| s.time), Some(0.02));
    }
}
