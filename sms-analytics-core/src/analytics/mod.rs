//! Analytics module for sms-analytics
//!
//! Each aggregation takes the immutable record set plus [`ReportOptions`]
//! and returns a fresh result:
//! - [`volume`] - total/sent/received counts
//! - [`contacts`] - per-contact rankings and sent/received ratios
//! - [`temporal`] - monthly, daily and hourly histograms
//!
//! [`generate_report`] runs them in order and bundles the results.

pub mod contacts;
pub mod temporal;
pub mod volume;

pub use contacts::{
    compute_contacts, ContactReport, ContactStats, OthersRow, RankedContact, RatioEntry,
    RatioKind, RatioRanking,
};
pub use temporal::{
    compute_temporal, BarChartRow, BucketKind, TemporalBucket, TemporalReport, MAX_BLOCK_LENGTH,
};
pub use volume::{compute_volume, VolumeStats};

use crate::types::{MessageRecord, TimeZoneMode};

/// Validated filters and limits shared by every aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Only count messages from this calendar year
    pub year: Option<i32>,
    /// Restrict the temporal histograms to this contact
    pub person: Option<String>,
    /// Minimum messages for a contact to enter the ratio rankings
    pub ratio_min_texts: u64,
    pub top_contacts_limit: usize,
    pub ratio_contacts_limit: usize,
    pub timezone: TimeZoneMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            year: None,
            person: None,
            ratio_min_texts: 20,
            top_contacts_limit: 20,
            ratio_contacts_limit: 5,
            timezone: TimeZoneMode::Local,
        }
    }
}

impl ReportOptions {
    pub fn matches_year(&self, record: &MessageRecord) -> bool {
        match self.year {
            Some(year) => record.calendar(self.timezone).year == year,
            None => true,
        }
    }

    pub fn matches_person(&self, record: &MessageRecord) -> bool {
        match &self.person {
            Some(person) => record.contact_name == *person,
            None => true,
        }
    }

    /// "2014", or "ALL TIME" without a year filter.
    pub fn period_label(&self) -> String {
        match self.year {
            Some(year) => year.to_string(),
            None => "ALL TIME".to_string(),
        }
    }
}

/// Volume for the filtered person, shown next to their histograms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonVolume {
    pub name: String,
    pub volume: VolumeStats,
}

/// Everything the presenter needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SmsReport {
    pub options: ReportOptions,
    pub volume: VolumeStats,
    pub contacts: ContactReport,
    pub person: Option<PersonVolume>,
    pub temporal: TemporalReport,
}

/// Run every aggregation over `records`.
pub fn generate_report(records: &[MessageRecord], options: &ReportOptions) -> SmsReport {
    tracing::info!(
        records = records.len(),
        period = %options.period_label(),
        person = options.person.as_deref().unwrap_or("<none>"),
        timezone = options.timezone.as_str(),
        "Generating report"
    );

    let volume = compute_volume(records, options);
    let contacts = compute_contacts(records, options);

    if contacts.total != volume.total {
        tracing::warn!(
            volume = volume.total,
            contacts = contacts.total,
            "Contact totals disagree with volume"
        );
    }

    let person = options.person.as_ref().map(|name| {
        if contacts.get(name).is_none() {
            tracing::warn!(person = %name, "Person filter matches no messages");
        }
        PersonVolume {
            name: name.clone(),
            volume: contacts.person_volume(name),
        }
    });

    let temporal = compute_temporal(records, options);

    SmsReport {
        options: options.clone(),
        volume,
        contacts,
        person,
        temporal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<MessageRecord> {
        let at = |y: i32, m: u32, d: u32, h: u32| Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        vec![
            MessageRecord::new(at(2014, 3, 10, 14), Direction::Received, "Peter Phan"),
            MessageRecord::new(at(2014, 3, 10, 15), Direction::Received, "Peter Phan"),
            MessageRecord::new(at(2014, 3, 11, 9), Direction::Sent, "Peter Phan"),
            MessageRecord::new(at(2014, 4, 1, 20), Direction::Sent, "Ann"),
            MessageRecord::new(at(2013, 4, 1, 20), Direction::Sent, "Ann"),
        ]
    }

    #[test]
    fn test_period_label() {
        assert_eq!(ReportOptions::default().period_label(), "ALL TIME");
        let options = ReportOptions {
            year: Some(2014),
            ..Default::default()
        };
        assert_eq!(options.period_label(), "2014");
    }

    #[test]
    fn test_generate_report_totals_agree() {
        let options = ReportOptions {
            year: Some(2014),
            person: Some("Peter Phan".to_string()),
            timezone: TimeZoneMode::Utc,
            ..Default::default()
        };
        let report = generate_report(&sample(), &options);

        assert_eq!(report.volume, VolumeStats::from_counts(2, 2));
        assert_eq!(report.contacts.total, report.volume.total);

        let person = report.person.expect("person volume");
        assert_eq!(person.name, "Peter Phan");
        assert_eq!(person.volume, VolumeStats::from_counts(1, 2));
        assert_eq!(report.temporal.months.count(3), 3);
        assert_eq!(report.temporal.months.count(4), 0);
    }

    #[test]
    fn test_generate_report_without_person() {
        let options = ReportOptions {
            timezone: TimeZoneMode::Utc,
            ..Default::default()
        };
        let report = generate_report(&sample(), &options);
        assert!(report.person.is_none());
        assert_eq!(report.volume.total, 5);
        assert_eq!(report.temporal.months.count(4), 2);
    }
}
