use chrono::NaiveDate;
use serde::Serialize;

/// RSVP status for a single guest-event record. Unrecognized strings
/// parse to `Other` instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rsvp {
    Going,
    Maybe,
    CannotGo,
    Other,
}

impl Rsvp {
    pub fn parse(raw: &str) -> Rsvp {
        match raw.trim().to_lowercase().as_str() {
            "going" => Rsvp::Going,
            "maybe" => Rsvp::Maybe,
            "can't go" | "cant go" | "cannot go" | "cannotgo" | "not going" => Rsvp::CannotGo,
            _ => Rsvp::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rsvp::Going => "Going",
            Rsvp::Maybe => "Maybe",
            Rsvp::CannotGo => "Can't Go",
            Rsvp::Other => "No response",
        }
    }
}

/// One row of the guest roster. `name` plus `event_date` is not a key;
/// a guest appears once per occasion they were invited to.
#[derive(Debug, Clone, Serialize)]
pub struct GuestEvent {
    pub name: String,
    pub event_date: NaiveDate,
    pub status: Rsvp,
    /// Date the guest responded. Missing for guests who never answered;
    /// only used for latency, never for attendance counts.
    pub rsvp_date: Option<NaiveDate>,
}

/// A raw record that could not be coerced into a `GuestEvent`.
#[derive(Debug, Clone, Serialize)]
pub struct MalformedRow {
    /// 1-based record number in the input, headers excluded.
    pub record: usize,
    pub reason: String,
}

/// Per-date aggregate, recomputed from the roster on every query.
#[derive(Debug, Clone, Serialize)]
pub struct DateStats {
    pub event_date: NaiveDate,
    pub total_invited: usize,
    pub going: usize,
    pub maybe: usize,
    /// going / total_invited, in [0, 1].
    pub going_ratio: f64,
}

/// Per-person aggregate, keyed case-insensitively; `name` carries the
/// casing of the person's first appearance in the roster.
#[derive(Debug, Clone, Serialize)]
pub struct PersonStats {
    pub name: String,
    pub total_invited: usize,
    pub going: usize,
    pub maybe: usize,
    pub other: usize,
    pub going_ratio: f64,
    /// Mean of event_date - rsvp_date in days, over rows that have an
    /// RSVP date. None when no row qualifies. Negative means the RSVP
    /// was entered after the event.
    pub mean_response_latency_days: Option<f64>,
    /// Mean of the fixed per-status likelihood weights.
    pub attendance_likelihood: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(Rsvp::parse("Going"), Rsvp::Going);
        assert_eq!(Rsvp::parse("GOING"), Rsvp::Going);
        assert_eq!(Rsvp::parse("  maybe "), Rsvp::Maybe);
        assert_eq!(Rsvp::parse("Can't Go"), Rsvp::CannotGo);
        assert_eq!(Rsvp::parse("Not Going"), Rsvp::CannotGo);
    }

    #[test]
    fn unrecognized_status_degrades_to_other() {
        assert_eq!(Rsvp::parse("attending"), Rsvp::Other);
        assert_eq!(Rsvp::parse(""), Rsvp::Other);
    }
}
