use std::collections::HashMap;

use crate::models::{DateStats, GuestEvent, PersonStats, Rsvp};

/// Which statuses count as "attending" for the overall rate. Source
/// data is ambiguous on whether Maybe counts, so it stays a parameter.
#[derive(Debug, Clone)]
pub struct AttendancePolicy {
    pub counted: Vec<Rsvp>,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        AttendancePolicy {
            counted: vec![Rsvp::Going, Rsvp::Maybe],
        }
    }
}

impl AttendancePolicy {
    pub fn going_only() -> Self {
        AttendancePolicy {
            counted: vec![Rsvp::Going],
        }
    }

    pub fn counts(&self, status: Rsvp) -> bool {
        self.counted.contains(&status)
    }
}

/// Fraction of rows whose status the policy counts, or None for an
/// empty input. Callers check the sentinel instead of dividing blindly.
pub fn attendance_rate(rows: &[GuestEvent], policy: &AttendancePolicy) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let attending = rows.iter().filter(|row| policy.counts(row.status)).count();
    Some(attending as f64 / rows.len() as f64)
}

/// Fixed heuristic weight per status. A proxy score, not a calibrated
/// probability; must stay a pure lookup.
pub fn attendance_likelihood(status: Rsvp) -> f64 {
    match status {
        Rsvp::Going => 0.9,
        Rsvp::Maybe => 0.5,
        Rsvp::CannotGo => 0.1,
        Rsvp::Other => 0.0,
    }
}

/// Whole days between event and RSVP. Positive for on-time RSVPs,
/// negative when the RSVP was entered after the event; kept unclamped
/// since a negative value flags retroactive entry.
pub fn response_latency_days(row: &GuestEvent) -> Option<i64> {
    row.rsvp_date
        .map(|rsvp_date| (row.event_date - rsvp_date).num_days())
}

/// Mean latency over rows carrying an RSVP date. Rows without one are
/// excluded from numerator and denominator alike.
pub fn mean_response_latency(rows: &[GuestEvent]) -> Option<f64> {
    let latencies: Vec<i64> = rows.iter().filter_map(response_latency_days).collect();
    if latencies.is_empty() {
        return None;
    }
    Some(latencies.iter().sum::<i64>() as f64 / latencies.len() as f64)
}

/// Per-occasion totals and going ratio, one bucket per distinct event
/// date, ordered by date ascending.
pub fn group_by_date(rows: &[GuestEvent]) -> Vec<DateStats> {
    let mut index: HashMap<chrono::NaiveDate, usize> = HashMap::new();
    let mut buckets: Vec<DateStats> = Vec::new();

    for row in rows {
        let position = *index.entry(row.event_date).or_insert_with(|| {
            buckets.push(DateStats {
                event_date: row.event_date,
                total_invited: 0,
                going: 0,
                maybe: 0,
                going_ratio: 0.0,
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[position];
        bucket.total_invited += 1;
        match row.status {
            Rsvp::Going => bucket.going += 1,
            Rsvp::Maybe => bucket.maybe += 1,
            _ => {}
        }
    }

    for bucket in buckets.iter_mut() {
        bucket.going_ratio = bucket.going as f64 / bucket.total_invited as f64;
    }
    buckets.sort_by_key(|bucket| bucket.event_date);
    buckets
}

/// Per-person totals, going ratio, mean response latency and mean
/// likelihood. Names are grouped case-insensitively and returned in
/// first-appearance order; the first-seen casing is the display name.
pub fn group_by_person(rows: &[GuestEvent]) -> Vec<PersonStats> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut people: Vec<PersonStats> = Vec::new();
    let mut latencies: Vec<Vec<i64>> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();

    for row in rows {
        let key = row.name.to_lowercase();
        let position = *index.entry(key).or_insert_with(|| {
            people.push(PersonStats {
                name: row.name.clone(),
                total_invited: 0,
                going: 0,
                maybe: 0,
                other: 0,
                going_ratio: 0.0,
                mean_response_latency_days: None,
                attendance_likelihood: 0.0,
            });
            latencies.push(Vec::new());
            weights.push(0.0);
            people.len() - 1
        });

        let person = &mut people[position];
        person.total_invited += 1;
        match row.status {
            Rsvp::Going => person.going += 1,
            Rsvp::Maybe => person.maybe += 1,
            Rsvp::CannotGo | Rsvp::Other => person.other += 1,
        }
        weights[position] += attendance_likelihood(row.status);
        if let Some(days) = response_latency_days(row) {
            latencies[position].push(days);
        }
    }

    for (position, person) in people.iter_mut().enumerate() {
        person.going_ratio = person.going as f64 / person.total_invited as f64;
        person.attendance_likelihood = weights[position] / person.total_invited as f64;
        let days = &latencies[position];
        if !days.is_empty() {
            person.mean_response_latency_days =
                Some(days.iter().sum::<i64>() as f64 / days.len() as f64);
        }
    }
    people
}
