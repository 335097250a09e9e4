use chrono::NaiveDate;

use crate::models::{GuestEvent, MalformedRow, Rsvp};

/// The full guest list for a session. Built once, never mutated;
/// every query below returns a fresh view.
#[derive(Debug, Clone)]
pub struct Roster {
    rows: Vec<GuestEvent>,
}

/// Outcome of a load: a usable roster plus whatever had to be skipped.
/// One bad row never blocks the rest of the table.
#[derive(Debug)]
pub struct LoadReport {
    pub roster: Roster,
    pub malformed: Vec<MalformedRow>,
    /// Raw status strings that parsed to `Rsvp::Other`, with their
    /// record numbers. A data-quality signal, not an error.
    pub unknown_statuses: Vec<(usize, String)>,
}

/// One record as it comes off the wire, before validation. Every field
/// is optional so a hole in one row surfaces as a `MalformedRow`
/// instead of aborting the whole read.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct RawRow {
    pub name: Option<String>,
    pub event_date: Option<String>,
    pub status: Option<String>,
    pub rsvp_date: Option<String>,
    /// Set when the record could not be deserialized at all; carries
    /// the reader's error text so the load report can show it.
    #[serde(skip)]
    pub error: Option<String>,
}

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Roster {
    /// Coerces raw records into guest events, collecting rather than
    /// throwing on malformed rows. Record numbers are 1-based.
    pub fn load(raw_rows: Vec<RawRow>) -> LoadReport {
        let mut rows = Vec::with_capacity(raw_rows.len());
        let mut malformed = Vec::new();
        let mut unknown_statuses = Vec::new();

        for (index, raw) in raw_rows.into_iter().enumerate() {
            let record = index + 1;

            if let Some(error) = raw.error {
                malformed.push(MalformedRow {
                    record,
                    reason: format!("unreadable record: {error}"),
                });
                continue;
            }

            let name = match raw.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    malformed.push(MalformedRow {
                        record,
                        reason: "missing name".to_string(),
                    });
                    continue;
                }
            };

            let event_date = match raw.event_date.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => {
                    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
                        Ok(date) => date,
                        Err(_) => {
                            malformed.push(MalformedRow {
                                record,
                                reason: format!("unparseable event date '{text}'"),
                            });
                            continue;
                        }
                    }
                }
                _ => {
                    malformed.push(MalformedRow {
                        record,
                        reason: "missing event date".to_string(),
                    });
                    continue;
                }
            };

            let raw_status = match raw.status.as_deref().map(str::trim) {
                Some(text) if !text.is_empty() => text,
                _ => {
                    malformed.push(MalformedRow {
                        record,
                        reason: "missing status".to_string(),
                    });
                    continue;
                }
            };
            let status = Rsvp::parse(raw_status);
            if status == Rsvp::Other {
                unknown_statuses.push((record, raw_status.to_string()));
            }

            // An absent or garbled RSVP date only disqualifies the row
            // from latency stats, not from the roster.
            let rsvp_date = raw
                .rsvp_date
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok());

            rows.push(GuestEvent {
                name,
                event_date,
                status,
                rsvp_date,
            });
        }

        LoadReport {
            roster: Roster { rows },
            malformed,
            unknown_statuses,
        }
    }

    pub fn rows(&self) -> &[GuestEvent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive exact match on the guest name. Substrings do
    /// not match. An empty result is a valid outcome.
    pub fn filter_by_name(&self, query: &str) -> Vec<GuestEvent> {
        let folded = query.trim().to_lowercase();
        self.rows
            .iter()
            .filter(|row| row.name.to_lowercase() == folded)
            .cloned()
            .collect()
    }

    pub fn filter_by_date(&self, date: NaiveDate) -> Vec<GuestEvent> {
        self.rows
            .iter()
            .filter(|row| row.event_date == date)
            .cloned()
            .collect()
    }
}

/// Reads the guest table from a CSV file with headers
/// `name,event_date,status,rsvp_date`.
pub fn read_csv(path: &std::path::Path) -> anyhow::Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut raw_rows = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        raw_rows.push(match result {
            Ok(row) => row,
            Err(error) => RawRow {
                error: Some(error.to_string()),
                ..RawRow::default()
            },
        });
    }
    Ok(raw_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, event_date: &str, status: &str, rsvp_date: &str) -> RawRow {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawRow {
            name: opt(name),
            event_date: opt(event_date),
            status: opt(status),
            rsvp_date: opt(rsvp_date),
            error: None,
        }
    }

    #[test]
    fn load_skips_and_reports_malformed_rows() {
        let report = Roster::load(vec![
            raw("Jane Doe", "2026-03-01", "Going", "2026-02-20"),
            raw("", "2026-03-01", "Going", ""),
            raw("Sam Hill", "not-a-date", "Maybe", ""),
            raw("Ana Cruz", "2026-03-01", "", ""),
        ]);

        assert_eq!(report.roster.len(), 1);
        assert_eq!(report.malformed.len(), 3);
        assert_eq!(report.malformed[0].record, 2);
        assert_eq!(report.malformed[0].reason, "missing name");
        assert!(report.malformed[1].reason.contains("not-a-date"));
        assert_eq!(report.malformed[2].reason, "missing status");
    }

    #[test]
    fn unreadable_record_surfaces_reader_error_text() {
        let broken = RawRow {
            error: Some("invalid utf-8 in field 1".to_string()),
            ..RawRow::default()
        };
        let report = Roster::load(vec![broken, raw("Jane Doe", "2026-03-01", "Going", "")]);

        assert_eq!(report.roster.len(), 1);
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(
            report.malformed[0].reason,
            "unreadable record: invalid utf-8 in field 1"
        );
    }

    #[test]
    fn load_flags_unknown_statuses_without_dropping_rows() {
        let report = Roster::load(vec![
            raw("Jane Doe", "2026-03-01", "attending", ""),
            raw("Sam Hill", "2026-03-01", "Going", ""),
        ]);

        assert_eq!(report.roster.len(), 2);
        assert_eq!(report.unknown_statuses, vec![(1, "attending".to_string())]);
        assert_eq!(report.roster.rows()[0].status, Rsvp::Other);
    }

    #[test]
    fn missing_rsvp_date_keeps_the_row() {
        let report = Roster::load(vec![raw("Jane Doe", "2026-03-01", "Going", "")]);
        assert_eq!(report.roster.len(), 1);
        assert!(report.roster.rows()[0].rsvp_date.is_none());
        assert!(report.malformed.is_empty());
    }

    #[test]
    fn filter_by_name_is_case_insensitive_exact() {
        let report = Roster::load(vec![
            raw("Jane Doe", "2026-03-01", "Going", ""),
            raw("JANE DOE", "2026-03-08", "Maybe", ""),
            raw("Jane", "2026-03-08", "Going", ""),
        ]);
        let roster = report.roster;

        let lower = roster.filter_by_name("jane doe");
        let upper = roster.filter_by_name("JANE DOE");
        assert_eq!(lower.len(), 2);
        assert_eq!(lower.len(), upper.len());

        // "Jane" must not match "Jane Doe" by substring.
        assert_eq!(roster.filter_by_name("Jane").len(), 1);
    }

    #[test]
    fn filter_by_date_selects_one_occasion() {
        let report = Roster::load(vec![
            raw("Jane Doe", "2026-03-01", "Going", ""),
            raw("Sam Hill", "2026-03-08", "Maybe", ""),
        ]);
        let date = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        let matched = report.roster.filter_by_date(date);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Sam Hill");
    }
}
