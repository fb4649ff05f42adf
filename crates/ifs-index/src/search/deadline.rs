//! Wall-clock budget for collection.
//!
//! Tantivy has no built-in time limit, so [`DeadlineCollector`] wraps another
//! collector and gives up once the deadline passes: new segments are refused
//! outright, and a segment in progress stops collecting. Either way the shared
//! `expired` flag is raised so the caller can tell a timeout from a short
//! result.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use tantivy::{
    DocId, Score, SegmentOrdinal, SegmentReader, TantivyError,
    collector::{Collector, SegmentCollector},
};

/// Documents collected between clock reads.
const CHECK_INTERVAL: u32 = 1024;

/// Message carried by the error that aborts a late search.
pub(crate) const DEADLINE_MESSAGE: &str = "search deadline exceeded";

/// Wraps a collector with a deadline.
pub struct DeadlineCollector<C> {
    /// The wrapped collector.
    inner: C,
    /// Instant after which collection stops.
    deadline: Instant,
    /// Raised when the deadline was hit.
    expired: Arc<AtomicBool>,
}

impl<C> DeadlineCollector<C> {
    /// Wraps `inner`, stopping at `deadline`.
    pub fn new(inner: C, deadline: Instant) -> Self {
        Self {
            inner,
            deadline,
            expired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag raised when the deadline is hit.
    pub fn expired_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.expired)
    }

    /// Returns true if the deadline was hit during collection.
    pub fn has_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    /// Raises the flag and returns true if the deadline has passed.
    fn check(&self) -> bool {
        if Instant::now() >= self.deadline {
            self.expired.store(true, Ordering::Relaxed);
            return true;
        }
        false
    }
}

impl<C: Collector> Collector for DeadlineCollector<C> {
    type Fruit = C::Fruit;
    type Child = DeadlineSegmentCollector<C::Child>;

    fn for_segment(
        &self,
        segment_local_id: SegmentOrdinal,
        segment: &SegmentReader,
    ) -> tantivy::Result<Self::Child> {
        if self.check() {
            return Err(TantivyError::InternalError(DEADLINE_MESSAGE.to_string()));
        }
        Ok(DeadlineSegmentCollector {
            inner: self.inner.for_segment(segment_local_id, segment)?,
            deadline: self.deadline,
            expired: Arc::clone(&self.expired),
            seen: 0,
            stopped: false,
        })
    }

    fn requires_scoring(&self) -> bool {
        self.inner.requires_scoring()
    }

    fn merge_fruits(
        &self,
        segment_fruits: Vec<<Self::Child as SegmentCollector>::Fruit>,
    ) -> tantivy::Result<Self::Fruit> {
        // Also covers an index with no segments at all
        self.check();
        self.inner.merge_fruits(segment_fruits)
    }
}

/// Per-segment half of [`DeadlineCollector`].
pub struct DeadlineSegmentCollector<S> {
    /// The wrapped segment collector.
    inner: S,
    /// Instant after which collection stops.
    deadline: Instant,
    /// Shared with the parent collector.
    expired: Arc<AtomicBool>,
    /// Documents seen in this segment.
    seen: u32,
    /// Set once the deadline is hit.
    stopped: bool,
}

impl<S: SegmentCollector> SegmentCollector for DeadlineSegmentCollector<S> {
    type Fruit = S::Fruit;

    fn collect(&mut self, doc: DocId, score: Score) {
        if self.stopped {
            return;
        }
        self.seen = self.seen.wrapping_add(1);
        if self.seen % CHECK_INTERVAL == 0 && Instant::now() >= self.deadline {
            self.stopped = true;
            self.expired.store(true, Ordering::Relaxed);
            return;
        }
        self.inner.collect(doc, score);
    }

    fn harvest(self) -> Self::Fruit {
        self.inner.harvest()
    }
}
