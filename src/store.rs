// In-memory sample history. Append-only, insertion order = chronological order.
// Single writer (the poller); readers take a snapshot. Samples are never
// evicted, so the store grows for the lifetime of the process.

use std::sync::RwLock;

use crate::models::Sample;

#[derive(Debug, Default)]
pub struct SampleStore {
    samples: RwLock<Vec<Sample>>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one normalized sample. Called only from the ingestion path.
    pub fn append(&self, sample: Sample) {
        let mut samples = self.samples.write().unwrap_or_else(|e| e.into_inner());
        samples.push(sample);
    }

    /// Copies the current history for read-only aggregation. An in-flight
    /// append is either fully included or not yet visible.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.samples.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
