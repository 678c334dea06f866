//! Total, sent and received counts.

use super::ReportOptions;
use crate::types::{Direction, MessageRecord};

/// Message volume split by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolumeStats {
    pub total: u64,
    pub sent: u64,
    pub received: u64,
}

impl VolumeStats {
    pub fn from_counts(sent: u64, received: u64) -> Self {
        Self {
            total: sent + received,
            sent,
            received,
        }
    }

    /// Share of sent messages, 0 when there are no messages.
    pub fn sent_percent(&self) -> f64 {
        percent(self.sent, self.total)
    }

    /// Share of received messages, 0 when there are no messages.
    pub fn received_percent(&self) -> f64 {
        percent(self.received, self.total)
    }

    fn add(&mut self, direction: Direction) {
        match direction {
            Direction::Sent => self.sent += 1,
            Direction::Received => self.received += 1,
        }
        self.total += 1;
    }
}

/// `count / total * 100`, defined as 0 for an empty total.
pub fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Count records by direction, honouring the year filter.
pub fn compute_volume(records: &[MessageRecord], options: &ReportOptions) -> VolumeStats {
    let mut stats = VolumeStats::default();
    for record in records.iter().filter(|r| options.matches_year(r)) {
        stats.add(record.direction);
    }
    stats
}
