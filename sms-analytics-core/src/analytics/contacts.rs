//! Per-contact counts, rankings and conversation ratios.
//!
//! Rankings are stable: contacts with equal counts (or equal ratios) keep
//! the order in which they first appear in the export.

use super::volume::{percent, VolumeStats};
use super::ReportOptions;
use crate::types::{Direction, MessageRecord};
use std::collections::HashMap;

/// Message counts for one contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactStats {
    pub name: String,
    pub total: u64,
    pub sent: u64,
    pub received: u64,
}

impl ContactStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            total: 0,
            sent: 0,
            received: 0,
        }
    }

    pub fn volume(&self) -> VolumeStats {
        VolumeStats::from_counts(self.sent, self.received)
    }
}

/// One row of the top-contacts table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedContact {
    /// 1-based position
    pub rank: usize,
    pub name: String,
    pub count: u64,
    /// Share of the filtered total
    pub percent: f64,
}

/// Everything below the top-contacts cutoff, folded into one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OthersRow {
    pub count: u64,
    pub percent: f64,
}

/// Which way a ratio is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioKind {
    /// sent / received: high when you do most of the texting
    SentToReceived,
    /// received / sent: high when they do most of the texting
    ReceivedToSent,
}

impl RatioKind {
    /// (numerator, denominator) counts for a contact.
    pub fn counts(&self, sent: u64, received: u64) -> (u64, u64) {
        match self {
            RatioKind::SentToReceived => (sent, received),
            RatioKind::ReceivedToSent => (received, sent),
        }
    }

    /// Ratio for a contact; infinite when the denominator is zero, even
    /// for a 0/0 contact.
    pub fn ratio(&self, sent: u64, received: u64) -> f64 {
        let (numerator, denominator) = self.counts(sent, received);
        if denominator == 0 {
            f64::INFINITY
        } else {
            numerator as f64 / denominator as f64
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatioKind::SentToReceived => "sent_to_received",
            RatioKind::ReceivedToSent => "received_to_sent",
        }
    }
}

/// One row of a ratio ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioEntry {
    pub rank: usize,
    pub name: String,
    pub ratio: f64,
    pub sent: u64,
    pub received: u64,
}

/// Contacts ordered by a ratio, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioRanking {
    pub kind: RatioKind,
    pub entries: Vec<RatioEntry>,
}

impl RatioRanking {
    /// Rank contacts with at least `min_texts` messages and keep the first `limit`.
    pub fn rank(contacts: &[ContactStats], kind: RatioKind, min_texts: u64, limit: usize) -> Self {
        let mut scored: Vec<(&ContactStats, f64)> = contacts
            .iter()
            .filter(|c| c.total >= min_texts)
            .map(|c| (c, kind.ratio(c.sent, c.received)))
            .collect();

        // sort_by is stable, so ties keep first-seen order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let entries = scored
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (contact, ratio))| RatioEntry {
                rank: i + 1,
                name: contact.name.clone(),
                ratio,
                sent: contact.sent,
                received: contact.received,
            })
            .collect();

        Self { kind, entries }
    }
}

/// Output of the contact aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactReport {
    /// Messages across all contacts after the year filter
    pub total: u64,
    /// Every contact, ranked by total descending
    pub contacts: Vec<ContactStats>,
    pub top: Vec<RankedContact>,
    /// Present only when more contacts exist than the top table shows
    pub others: Option<OthersRow>,
    pub sent_to_received: RatioRanking,
    pub received_to_sent: RatioRanking,
}

impl ContactReport {
    /// Look up a contact by exact name.
    pub fn get(&self, name: &str) -> Option<&ContactStats> {
        self.contacts.iter().find(|c| c.name == name)
    }

    /// Volume for a single contact; zero when the contact never appears.
    pub fn person_volume(&self, name: &str) -> VolumeStats {
        self.get(name).map(ContactStats::volume).unwrap_or_default()
    }
}

/// Group year-filtered records by contact, in first-seen order.
pub fn tally_contacts(records: &[MessageRecord], options: &ReportOptions) -> Vec<ContactStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut contacts: Vec<ContactStats> = Vec::new();

    for record in records.iter().filter(|r| options.matches_year(r)) {
        let slot = *index.entry(record.contact_name.as_str()).or_insert_with(|| {
            contacts.push(ContactStats::new(&record.contact_name));
            contacts.len() - 1
        });

        let contact = &mut contacts[slot];
        contact.total += 1;
        match record.direction {
            Direction::Sent => contact.sent += 1,
            Direction::Received => contact.received += 1,
        }
    }

    contacts
}

/// Run the full contact aggregation.
pub fn compute_contacts(records: &[MessageRecord], options: &ReportOptions) -> ContactReport {
    let mut contacts = tally_contacts(records, options);
    let total: u64 = contacts.iter().map(|c| c.total).sum();

    // Ratios are ranked from first-seen order so their ties break the same way
    let sent_to_received = RatioRanking::rank(
        &contacts,
        RatioKind::SentToReceived,
        options.ratio_min_texts,
        options.ratio_contacts_limit,
    );
    let received_to_sent = RatioRanking::rank(
        &contacts,
        RatioKind::ReceivedToSent,
        options.ratio_min_texts,
        options.ratio_contacts_limit,
    );

    contacts.sort_by(|a, b| b.total.cmp(&a.total));

    let top: Vec<RankedContact> = contacts
        .iter()
        .take(options.top_contacts_limit)
        .enumerate()
        .map(|(i, c)| RankedContact {
            rank: i + 1,
            name: c.name.clone(),
            count: c.total,
            percent: percent(c.total, total),
        })
        .collect();

    let others = (contacts.len() > top.len()).then(|| {
        let shown: u64 = top.iter().map(|r| r.count).sum();
        let shown_percent: f64 = top.iter().map(|r| r.percent).sum();
        OthersRow {
            count: total - shown,
            percent: 100.0 - shown_percent,
        }
    });

    tracing::debug!(
        contacts = contacts.len(),
        total,
        ratio_candidates = contacts
            .iter()
            .filter(|c| c.total >= options.ratio_min_texts)
            .count(),
        "Contact aggregation complete"
    );

    ContactReport {
        total,
        contacts,
        top,
        others,
        sent_to_received,
        received_to_sent,
    }
}
