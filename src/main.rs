use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

mod metrics;
mod models;
mod rank;
mod report;
mod roster;

use metrics::AttendancePolicy;
use rank::RankConfig;
use roster::{LoadReport, Roster};

#[derive(Parser)]
#[command(name = "gamenight-attendance")]
#[command(about = "Attendance analytics for the board game night guest list", long_about = None)]
struct Cli {
    /// Path to the guest table CSV (name,event_date,status,rsvp_date)
    #[arg(long, global = true, default_value = "data/guest_table.csv")]
    csv: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Overall metrics and the per-date attendance table
    Overview {
        /// Restrict the view to one event date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        /// Count only Going answers toward the attendance rate
        #[arg(long)]
        going_only: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Metrics and recent activity for a single guest
    Person {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 5)]
        recent: usize,
        #[arg(long)]
        going_only: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Guests ranked by going ratio
    Regulars {
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value_t = 2)]
        min_invites: usize,
        /// Name to leave out of the ranking; repeatable
        #[arg(long)]
        exclude: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Guests ranked by raw Maybe count
    Indecisive {
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value_t = 2)]
        min_invites: usize,
        #[arg(long)]
        exclude: Vec<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
        #[arg(long, default_value_t = 2)]
        min_invites: usize,
        #[arg(long)]
        exclude: Vec<String>,
        /// Reduce guest names to first name plus initials
        #[arg(long)]
        mask_names: bool,
        #[arg(long)]
        going_only: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let raw_rows = roster::read_csv(&cli.csv)
        .with_context(|| format!("failed to read guest table from {}", cli.csv.display()))?;
    let load = Roster::load(raw_rows);
    warn_on_data_quality(&load);
    let roster = &load.roster;

    match cli.command {
        Commands::Overview {
            date,
            going_only,
            format,
        } => {
            let filtered;
            let rows: &[models::GuestEvent] = match date {
                Some(day) => {
                    filtered = roster.filter_by_date(day);
                    &filtered
                }
                None => roster.rows(),
            };

            let policy = policy_for(going_only);
            let rate = metrics::attendance_rate(rows, &policy);
            let by_date = metrics::group_by_date(rows);
            let going_total = rows
                .iter()
                .filter(|row| row.status == models::Rsvp::Going)
                .count();

            match format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "total_invites": rows.len(),
                        "total_going": going_total,
                        "attendance_rate": rate,
                        "by_date": by_date,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Text => {
                    println!("Total invites: {}", rows.len());
                    println!("Total going: {going_total}");
                    println!("Overall attendance rate: {}", report::format_rate(rate));
                    println!();
                    println!("Attendance by date:");
                    if by_date.is_empty() {
                        println!("  no events on record");
                    }
                    for bucket in by_date.iter() {
                        println!(
                            "  {}: {} going / {} invited ({})",
                            bucket.event_date,
                            bucket.going,
                            bucket.total_invited,
                            report::format_rate(Some(bucket.going_ratio))
                        );
                    }
                }
            }
        }
        Commands::Person {
            name,
            recent,
            going_only,
            format,
        } => {
            if name.trim().is_empty() {
                bail!("--name must not be blank");
            }

            let matched = rank::lookup_person(roster, &name);
            if matched.is_empty() {
                println!("No data found for '{name}'.");
                return Ok(());
            }

            let policy = policy_for(going_only);
            let rate = metrics::attendance_rate(&matched, &policy);
            let attended = matched.iter().filter(|row| policy.counts(row.status)).count();
            let latency = metrics::mean_response_latency(&matched);
            let activity = rank::recent_activity(&matched, recent);

            match format {
                OutputFormat::Json => {
                    let payload = serde_json::json!({
                        "name": name,
                        "total_invites": matched.len(),
                        "events_attended": attended,
                        "attendance_rate": rate,
                        "mean_response_latency_days": latency,
                        "recent_activity": activity,
                    });
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                OutputFormat::Text => {
                    println!("Metrics for {name}:");
                    println!("  Personal invites: {}", matched.len());
                    println!("  Events attended: {attended}");
                    println!("  Attendance rate: {}", report::format_rate(rate));
                    println!(
                        "  Avg response time: {}",
                        report::format_latency(latency)
                    );
                    println!();
                    println!("Recent activity:");
                    for row in activity.iter() {
                        let latency_note = match metrics::response_latency_days(row) {
                            Some(days) => format!(", {}", report::latency_note(days)),
                            None => String::new(),
                        };
                        println!(
                            "  {}: {}{latency_note}",
                            row.event_date,
                            row.status.label()
                        );
                    }
                }
            }
        }
        Commands::Regulars {
            top,
            min_invites,
            exclude,
            format,
        } => {
            let by_person = metrics::group_by_person(roster.rows());
            let config = rank_config(top, min_invites, &exclude);
            let ranked = rank::top_regulars(&by_person, &config);

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&ranked)?);
                }
                OutputFormat::Text => {
                    if ranked.is_empty() {
                        println!("No one meets the minimum-invite threshold.");
                        return Ok(());
                    }
                    println!("Top regulars by going ratio:");
                    for person in ranked.iter() {
                        println!(
                            "- {} going ratio {} over {} invites (likelihood {:.2})",
                            person.name,
                            report::format_rate(Some(person.going_ratio)),
                            person.total_invited,
                            person.attendance_likelihood
                        );
                    }
                }
            }
        }
        Commands::Indecisive {
            top,
            min_invites,
            exclude,
            format,
        } => {
            let by_person = metrics::group_by_person(roster.rows());
            let config = rank_config(top, min_invites, &exclude);
            let ranked = rank::top_indecisive(&by_person, &config);

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&ranked)?);
                }
                OutputFormat::Text => {
                    if ranked.is_empty() {
                        println!("No one meets the minimum-invite threshold.");
                        return Ok(());
                    }
                    println!("Most indecisive guests by maybe count:");
                    for person in ranked.iter() {
                        println!(
                            "- {} answered maybe {} times over {} invites",
                            person.name, person.maybe, person.total_invited
                        );
                    }
                }
            }
        }
        Commands::Report {
            out,
            top,
            min_invites,
            exclude,
            mask_names,
            going_only,
        } => {
            let policy = policy_for(going_only);
            let config = rank_config(top, min_invites, &exclude);
            let rendered = report::build_report(&load, &policy, &config, mask_names);
            std::fs::write(&out, rendered)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn policy_for(going_only: bool) -> AttendancePolicy {
    if going_only {
        AttendancePolicy::going_only()
    } else {
        AttendancePolicy::default()
    }
}

fn rank_config(top: usize, min_invites: usize, exclude: &[String]) -> RankConfig {
    RankConfig {
        top_n: top,
        min_invites,
        exclude: rank::exclusion_set(exclude),
    }
}

fn warn_on_data_quality(load: &LoadReport) {
    for bad in load.malformed.iter() {
        eprintln!("warning: skipped record {}: {}", bad.record, bad.reason);
    }
    for (record, raw) in load.unknown_statuses.iter() {
        eprintln!("warning: record {record} has unrecognized status '{raw}', counted as no response");
    }
}
