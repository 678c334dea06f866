//! Plain-text rendering of a finished [`SmsReport`].
//!
//! Rendering never touches the aggregation results; every function here
//! only reads from the report it is given.

use crate::analytics::{
    ContactReport, RatioKind, RatioRanking, SmsReport, TemporalBucket, VolumeStats,
};

const LABEL_WIDTH: usize = 30;
const NAME_WIDTH: usize = 24;
const CHART_LABEL_WIDTH: usize = 12;

/// Render the whole report, one section per block, separated by blank lines.
pub fn render_text(report: &SmsReport) -> String {
    let mut sections = vec![
        vec![format!("SMS Analytics for {}", report.options.period_label())],
        render_volume("Total SMSs:", &report.volume),
        render_top_contacts(&report.contacts),
        render_ratios(&report.contacts.sent_to_received, report.options.ratio_min_texts),
        render_ratios(&report.contacts.received_to_sent, report.options.ratio_min_texts),
    ];

    if let Some(person) = &report.person {
        sections.push(render_volume(
            &format!("Total SMSs for {}:", person.name),
            &person.volume,
        ));
    }

    let person = report.temporal.person.as_deref();
    for bucket in report.temporal.buckets() {
        sections.push(render_chart(bucket, person));
    }

    let mut out = sections
        .into_iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    out
}

/// Total/sent/received table.
pub fn render_volume(heading: &str, volume: &VolumeStats) -> Vec<String> {
    vec![
        format!("{:<LABEL_WIDTH$}{:>5}  {:>6.2}%", heading, volume.total, 100.0),
        format!(
            "{:<LABEL_WIDTH$}{:>5}  {:>6.2}%",
            "    Sent:",
            volume.sent,
            volume.sent_percent()
        ),
        format!(
            "{:<LABEL_WIDTH$}{:>5}  {:>6.2}%",
            "    Received:",
            volume.received,
            volume.received_percent()
        ),
    ]
}

/// Ranked contacts followed by the "Others" row when there is one.
pub fn render_top_contacts(contacts: &ContactReport) -> Vec<String> {
    let mut lines = vec!["Top contacts:".to_string()];
    for row in &contacts.top {
        lines.push(format!(
            "{:>6}  {:<NAME_WIDTH$} {:>5}  {:>6.2}%",
            row.rank, row.name, row.count, row.percent
        ));
    }
    if let Some(others) = &contacts.others {
        lines.push(format!(
            "{:>6}  {:<NAME_WIDTH$} {:>5}  {:>6.2}%",
            "", "Others", others.count, others.percent
        ));
    }
    lines
}

/// One ratio ranking with its counts as `(numerator / denominator)`.
pub fn render_ratios(ranking: &RatioRanking, min_texts: u64) -> Vec<String> {
    let heading = match ranking.kind {
        RatioKind::SentToReceived => {
            "Sent-to-received ratios: (higher means you send texts to them all the time)"
        }
        RatioKind::ReceivedToSent => {
            "Received-to-sent ratios: (higher means they send you texts all the time)"
        }
    };

    let mut lines = vec![heading.to_string()];
    if ranking.entries.is_empty() {
        lines.push(format!(
            "{:>6}  (no contacts with at least {} messages)",
            "", min_texts
        ));
    }
    for entry in &ranking.entries {
        let (numerator, denominator) = ranking.kind.counts(entry.sent, entry.received);
        lines.push(format!(
            "{:>6}  {:<NAME_WIDTH$} {:>6.2}  ({:>4} / {:>4})",
            entry.rank, entry.name, entry.ratio, numerator, denominator
        ));
    }
    lines
}

/// Bar chart of one bucket, one `#` per segment.
pub fn render_chart(bucket: &TemporalBucket, person: Option<&str>) -> Vec<String> {
    let title = bucket.kind().title();
    let heading = match person {
        Some(name) => format!("{} SMS activity for {}:", title, name),
        None => format!("{} SMS activity:", title),
    };

    let mut lines = vec![heading];
    for row in bucket.chart() {
        let line = format!(
            "    {:<CHART_LABEL_WIDTH$}{:>5}  {}",
            format!("{}:", row.label),
            row.count,
            "#".repeat(row.block_length)
        );
        lines.push(line.trim_end().to_string());
    }
    lines
}
