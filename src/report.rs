use std::fmt::Write;

use crate::metrics::{self, AttendancePolicy};
use crate::rank::{self, RankConfig};
use crate::roster::LoadReport;

/// Two-decimal percent string, or "n/a" for the empty-input sentinel.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(value) => format!("{:.2}%", value * 100.0),
        None => "n/a".to_string(),
    }
}

pub fn format_latency(days: Option<f64>) -> String {
    match days {
        Some(value) => format!("{value:.1} days"),
        None => "n/a".to_string(),
    }
}

/// Phrase for one RSVP's latency relative to its event. Negative
/// latency means the RSVP was entered after the event took place.
pub fn latency_note(days: i64) -> String {
    if days >= 0 {
        format!("responded {days}d before the event")
    } else {
        format!("responded {}d after the event", -days)
    }
}

/// Privacy-safe display name: first word kept, every later word cut to
/// its initial. "Jane Doe" becomes "Jane D.", single words pass through.
pub fn mask_name(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut masked = first.to_string();
    for word in words {
        if let Some(initial) = word.chars().next() {
            let _ = write!(masked, " {initial}.");
        }
    }
    masked
}

fn display_name(name: &str, mask: bool) -> String {
    if mask {
        mask_name(name)
    } else {
        name.to_string()
    }
}

/// Full markdown report covering every dashboard view: overview,
/// attendance by date, rankings, recent activity and data quality.
pub fn build_report(
    load: &LoadReport,
    policy: &AttendancePolicy,
    config: &RankConfig,
    mask_names: bool,
) -> String {
    let rows = load.roster.rows();
    let by_date = metrics::group_by_date(rows);
    let by_person = metrics::group_by_person(rows);
    let regulars = rank::top_regulars(&by_person, config);
    let indecisive = rank::top_indecisive(&by_person, config);

    let mut output = String::new();

    let _ = writeln!(output, "# Game Night Attendance Report");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total invites: {}", rows.len());
    let _ = writeln!(
        output,
        "- Total going: {}",
        rows.iter()
            .filter(|row| row.status == crate::models::Rsvp::Going)
            .count()
    );
    let _ = writeln!(
        output,
        "- Overall attendance rate: {}",
        format_rate(metrics::attendance_rate(rows, policy))
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Attendance by Date");

    if by_date.is_empty() {
        let _ = writeln!(output, "No events on record.");
    } else {
        for bucket in by_date.iter() {
            let _ = writeln!(
                output,
                "- {}: {} going / {} invited ({})",
                bucket.event_date,
                bucket.going,
                bucket.total_invited,
                format_rate(Some(bucket.going_ratio))
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Regulars");

    if regulars.is_empty() {
        let _ = writeln!(output, "No one meets the minimum-invite threshold.");
    } else {
        for person in regulars.iter() {
            let _ = writeln!(
                output,
                "- {}: going ratio {} over {} invites (likelihood {:.2}, avg response {})",
                display_name(&person.name, mask_names),
                format_rate(Some(person.going_ratio)),
                person.total_invited,
                person.attendance_likelihood,
                format_latency(person.mean_response_latency_days)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Indecisive");

    if indecisive.is_empty() {
        let _ = writeln!(output, "No one meets the minimum-invite threshold.");
    } else {
        for person in indecisive.iter() {
            let _ = writeln!(
                output,
                "- {}: {} maybes over {} invites",
                display_name(&person.name, mask_names),
                person.maybe,
                person.total_invited
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Activity");

    let recent = rank::recent_activity(rows, 5);
    if recent.is_empty() {
        let _ = writeln!(output, "No activity on record.");
    } else {
        for row in recent.iter() {
            let _ = writeln!(
                output,
                "- {} on {}: {}",
                display_name(&row.name, mask_names),
                row.event_date,
                row.status.label()
            );
        }
    }

    if !load.malformed.is_empty() || !load.unknown_statuses.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Data Quality");
        for bad in load.malformed.iter() {
            let _ = writeln!(output, "- record {} skipped: {}", bad.record, bad.reason);
        }
        for (record, raw) in load.unknown_statuses.iter() {
            let _ = writeln!(
                output,
                "- record {record}: unrecognized status '{raw}' counted as no response"
            );
        }
    }

    output
}
