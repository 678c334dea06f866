//! Monthly, daily and hourly activity histograms.

use super::ReportOptions;
use crate::types::MessageRecord;

/// Width of the bar drawn for the busiest bucket.
pub const MAX_BLOCK_LENGTH: usize = 35;

const MONTH_KEYS: [u32; 12] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
const WEEKDAY_KEYS: [u32; 7] = [0, 1, 2, 3, 4, 5, 6];
const HOUR_KEYS: [u32; 24] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// The calendar unit a bucket counts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKind {
    /// 1 = January .. 12 = December
    Month,
    /// 0 = Sunday .. 6 = Saturday
    Weekday,
    /// 0 .. 23
    Hour,
}

impl BucketKind {
    /// Every key of this unit, in display order.
    pub fn keys(&self) -> &'static [u32] {
        match self {
            BucketKind::Month => &MONTH_KEYS,
            BucketKind::Weekday => &WEEKDAY_KEYS,
            BucketKind::Hour => &HOUR_KEYS,
        }
    }

    pub fn label(&self, key: u32) -> String {
        match self {
            BucketKind::Month => MONTH_NAMES
                .get((key as usize).wrapping_sub(1))
                .copied()
                .unwrap_or("Unknown")
                .to_string(),
            BucketKind::Weekday => DAY_NAMES
                .get(key as usize)
                .copied()
                .unwrap_or("Unknown")
                .to_string(),
            BucketKind::Hour => format!("{:02}", key),
        }
    }

    /// Heading word used by the presenter ("Monthly", "Daily", "Hourly").
    pub fn title(&self) -> &'static str {
        match self {
            BucketKind::Month => "Monthly",
            BucketKind::Weekday => "Daily",
            BucketKind::Hour => "Hourly",
        }
    }

    fn position(&self, key: u32) -> Option<usize> {
        self.keys().iter().position(|&k| k == key)
    }
}

/// One line of a bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChartRow {
    pub key: u32,
    pub label: String,
    pub count: u64,
    pub block_length: usize,
}

/// Message counts for every key of one calendar unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalBucket {
    kind: BucketKind,
    counts: Vec<u64>,
}

impl TemporalBucket {
    /// A bucket with every key present at zero.
    pub fn new(kind: BucketKind) -> Self {
        Self {
            kind,
            counts: vec![0; kind.keys().len()],
        }
    }

    pub fn kind(&self) -> BucketKind {
        self.kind
    }

    /// Count one message under `key`. Keys outside the unit are ignored.
    pub fn increment(&mut self, key: u32) {
        if let Some(pos) = self.kind.position(key) {
            self.counts[pos] += 1;
        }
    }

    pub fn count(&self, key: u32) -> u64 {
        self.kind
            .position(key)
            .map(|pos| self.counts[pos])
            .unwrap_or(0)
    }

    /// `(key, count)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.kind.keys().iter().copied().zip(self.counts.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Messages represented by one `#`; 1 when the bucket is empty.
    pub fn segment_size(&self) -> f64 {
        let max = self.max_count();
        if max == 0 {
            1.0
        } else {
            max as f64 / MAX_BLOCK_LENGTH as f64
        }
    }

    /// Bar length for `count`, rounded half up.
    pub fn block_length(&self, count: u64) -> usize {
        let blocks = (count as f64 / self.segment_size() + 0.5).floor() as usize;
        blocks.min(MAX_BLOCK_LENGTH)
    }

    /// Rows for a bar chart of this bucket.
    pub fn chart(&self) -> Vec<BarChartRow> {
        self.entries()
            .map(|(key, count)| BarChartRow {
                key,
                label: self.kind.label(key),
                count,
                block_length: self.block_length(count),
            })
            .collect()
    }
}

/// Output of the temporal aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalReport {
    /// Contact the histograms are restricted to, if any
    pub person: Option<String>,
    pub months: TemporalBucket,
    pub weekdays: TemporalBucket,
    pub hours: TemporalBucket,
}

impl TemporalReport {
    /// The three buckets in display order.
    pub fn buckets(&self) -> [&TemporalBucket; 3] {
        [&self.months, &self.weekdays, &self.hours]
    }
}

/// Count records per month, weekday and hour, honouring both filters.
pub fn compute_temporal(records: &[MessageRecord], options: &ReportOptions) -> TemporalReport {
    let mut months = TemporalBucket::new(BucketKind::Month);
    let mut weekdays = TemporalBucket::new(BucketKind::Weekday);
    let mut hours = TemporalBucket::new(BucketKind::Hour);

    for record in records
        .iter()
        .filter(|r| options.matches_person(r))
        .filter(|r| options.matches_year(r))
    {
        let fields = record.calendar(options.timezone);
        months.increment(fields.month);
        weekdays.increment(fields.weekday);
        hours.increment(fields.hour);
    }

    tracing::debug!(
        person = options.person.as_deref().unwrap_or("<all>"),
        counted = months.total(),
        "Temporal aggregation complete"
    );

    TemporalReport {
        person: options.person.clone(),
        months,
        weekdays,
        hours,
    }
}
