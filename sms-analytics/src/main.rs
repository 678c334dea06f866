//! sms-analytics - descriptive statistics for an SMS export
//!
//! Reads the XML written by "SMS Backup & Restore" and prints totals,
//! top contacts, conversation ratios and activity histograms.

use anyhow::{Context, Result};
use clap::Parser;
use sms_analytics_core::analytics::{
    generate_report, BucketKind, SmsReport, TemporalBucket, VolumeStats,
};
use sms_analytics_core::config::{parse_year, Config};
use sms_analytics_core::{loader, report, TimeZoneMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sms-analytics")]
#[command(about = "Descriptive statistics for an SMS Backup & Restore export")]
#[command(version)]
struct Args {
    /// Path to the exported XML file
    file: PathBuf,

    /// Config file (default: ~/.config/sms-analytics/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only count messages from this year (e.g. 2014)
    #[arg(long, conflicts_with = "all_time")]
    year: Option<String>,

    /// Ignore any configured year filter
    #[arg(long)]
    all_time: bool,

    /// Restrict activity histograms to this contact
    #[arg(long)]
    person: Option<String>,

    /// Minimum messages for a contact to appear in ratio rankings
    #[arg(long)]
    ratio_min_texts: Option<u64>,

    /// Number of contacts in the top-contacts table
    #[arg(long)]
    top: Option<usize>,

    /// Number of contacts in each ratio table
    #[arg(long)]
    ratio_limit: Option<usize>,

    /// Time zone for calendar fields (local or utc)
    #[arg(long)]
    timezone: Option<TimeZoneMode>,

    /// Export format (text = aligned tables, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };
    let _log_guard = sms_analytics_core::logging::init(&config.logging).ok();

    apply_overrides(&mut config, &args)?;
    let options = config
        .report
        .options()
        .context("invalid report options")?;

    let records = loader::load(&args.file).context("failed to load SMS export")?;
    let stats = generate_report(&records, &options);
    tracing::info!(
        total = stats.volume.total,
        contacts = stats.contacts.contacts.len(),
        export = args.export.as_deref().unwrap_or("text"),
        "Report generated"
    );

    match args.export.as_deref() {
        Some("json") => print_json(&stats)?,
        Some("text") | None => print!("{}", report::render_text(&stats)),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'text' or 'json'", other),
    }

    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    let settings = &mut config.report;

    if let Some(year) = &args.year {
        parse_year(year)?;
        settings.year_filter_enabled = true;
        settings.year_filter = year.clone();
    }
    if args.all_time {
        settings.year_filter_enabled = false;
    }
    if let Some(person) = &args.person {
        settings.person_filter_enabled = true;
        settings.person_filter = person.clone();
    }
    if let Some(min) = args.ratio_min_texts {
        settings.ratio_min_texts = min;
    }
    if let Some(top) = args.top {
        settings.top_contacts_limit = top;
    }
    if let Some(limit) = args.ratio_limit {
        settings.ratio_contacts_limit = limit;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }

    tracing::debug!(?settings, "Report config after command-line overrides");

    Ok(())
}

fn print_json(stats: &SmsReport) -> Result<()> {
    let contacts = &stats.contacts;

    let ratios = [&contacts.sent_to_received, &contacts.received_to_sent]
        .iter()
        .map(|ranking| {
            serde_json::json!({
                "kind": ranking.kind.as_str(),
                "entries": ranking.entries.iter().map(|e| serde_json::json!({
                    "rank": e.rank,
                    "name": e.name,
                    // serde_json renders infinity as null
                    "ratio": e.ratio,
                    "sent": e.sent,
                    "received": e.received,
                })).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    let json = serde_json::json!({
        "period": stats.options.period_label(),
        "timezone": stats.options.timezone.as_str(),
        "volume": volume_json(&stats.volume),
        "top_contacts": contacts.top.iter().map(|row| serde_json::json!({
            "rank": row.rank,
            "name": row.name,
            "count": row.count,
            "percent": row.percent,
        })).collect::<Vec<_>>(),
        "others": contacts.others.as_ref().map(|o| serde_json::json!({
            "count": o.count,
            "percent": o.percent,
        })),
        "ratios": ratios,
        "person": stats.person.as_ref().map(|p| serde_json::json!({
            "name": p.name,
            "volume": volume_json(&p.volume),
        })),
        "activity": {
            "person": stats.temporal.person,
            "monthly": bucket_json(&stats.temporal.months),
            "daily": bucket_json(&stats.temporal.weekdays),
            "hourly": bucket_json(&stats.temporal.hours),
        },
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn volume_json(volume: &VolumeStats) -> serde_json::Value {
    serde_json::json!({
        "total": volume.total,
        "sent": volume.sent,
        "received": volume.received,
        "sent_percent": volume.sent_percent(),
        "received_percent": volume.received_percent(),
    })
}

fn bucket_json(bucket: &TemporalBucket) -> serde_json::Value {
    let rows = bucket
        .chart()
        .into_iter()
        .map(|row| {
            let label = match bucket.kind() {
                BucketKind::Hour => format!("{}:00", row.label),
                _ => row.label,
            };
            serde_json::json!({
                "key": row.key,
                "label": label,
                "count": row.count,
                "blocks": row.block_length,
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(rows)
}
