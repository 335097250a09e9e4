use std::collections::HashSet;

use crate::models::{GuestEvent, PersonStats};
use crate::roster::Roster;

/// Knobs for the ranking queries. Kept explicit so the engine carries
/// no deployment-specific names or thresholds.
#[derive(Debug, Clone)]
pub struct RankConfig {
    pub top_n: usize,
    /// Strict lower bound: a person needs more than this many invites
    /// to be ranked. The default of 2 means 3+ invites.
    pub min_invites: usize,
    /// Names dropped from rankings (e.g. the event host), compared
    /// case-insensitively.
    pub exclude: HashSet<String>,
}

impl Default for RankConfig {
    fn default() -> Self {
        RankConfig {
            top_n: 10,
            min_invites: 2,
            exclude: HashSet::new(),
        }
    }
}

impl RankConfig {
    fn admits(&self, person: &PersonStats) -> bool {
        person.total_invited > self.min_invites
            && !self.exclude.contains(&person.name.to_lowercase())
    }
}

pub fn exclusion_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|name| name.to_lowercase()).collect()
}

/// Highest going ratio among people with enough invites. Ties keep
/// first-appearance order (stable sort). Returns fewer than `top_n`
/// entries when fewer qualify.
pub fn top_regulars(by_person: &[PersonStats], config: &RankConfig) -> Vec<PersonStats> {
    let mut qualified: Vec<PersonStats> = by_person
        .iter()
        .filter(|person| config.admits(person))
        .cloned()
        .collect();
    qualified.sort_by(|a, b| {
        b.going_ratio
            .partial_cmp(&a.going_ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    qualified.truncate(config.top_n);
    qualified
}

/// Most raw Maybe answers among people with enough invites; same
/// filtering and tie-break rules as `top_regulars`.
pub fn top_indecisive(by_person: &[PersonStats], config: &RankConfig) -> Vec<PersonStats> {
    let mut qualified: Vec<PersonStats> = by_person
        .iter()
        .filter(|person| config.admits(person))
        .cloned()
        .collect();
    qualified.sort_by(|a, b| b.maybe.cmp(&a.maybe));
    qualified.truncate(config.top_n);
    qualified
}

/// All of one person's rows, matched case-insensitively on the exact
/// name. Empty is a valid answer; blank queries are the caller's
/// problem and should be rejected before getting here.
pub fn lookup_person(roster: &Roster, name: &str) -> Vec<GuestEvent> {
    roster.filter_by_name(name)
}

/// Most recent rows first, capped at `k`. Equal dates keep their input
/// order.
pub fn recent_activity(rows: &[GuestEvent], k: usize) -> Vec<GuestEvent> {
    let mut ordered = rows.to_vec();
    ordered.sort_by(|a, b| b.event_date.cmp(&a.event_date));
    ordered.truncate(k);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rsvp;
    use chrono::{Datelike, NaiveDate};

    fn stats(name: &str, invited: usize, going: usize, maybe: usize) -> PersonStats {
        PersonStats {
            name: name.to_string(),
            total_invited: invited,
            going,
            maybe,
            other: invited - going - maybe,
            going_ratio: going as f64 / invited as f64,
            mean_response_latency_days: None,
            attendance_likelihood: 0.0,
        }
    }

    fn event(name: &str, day: u32) -> GuestEvent {
        GuestEvent {
            name: name.to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            status: Rsvp::Going,
            rsvp_date: None,
        }
    }

    #[test]
    fn regulars_sorted_by_going_ratio_descending() {
        let people = vec![
            stats("Alex", 4, 3, 1),
            stats("Jane", 5, 5, 0),
            stats("Sam", 6, 2, 2),
        ];
        let ranked = top_regulars(&people, &RankConfig::default());
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Jane", "Alex", "Sam"]);
    }

    #[test]
    fn min_invites_filter_is_strict() {
        let people = vec![stats("Alex", 4, 3, 1), stats("Rare", 2, 2, 0)];

        let ranked = top_regulars(&people, &RankConfig::default());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Alex");

        // min_invites 4 excludes Alex too: 4 > 4 is false.
        let config = RankConfig {
            min_invites: 4,
            ..RankConfig::default()
        };
        assert!(top_regulars(&people, &config).is_empty());
    }

    #[test]
    fn excluded_names_never_appear() {
        let people = vec![stats("The Host", 10, 10, 0), stats("Alex", 4, 3, 1)];
        let config = RankConfig {
            exclude: exclusion_set(&["the host".to_string()]),
            ..RankConfig::default()
        };
        let ranked = top_regulars(&people, &config);
        assert!(ranked.iter().all(|p| p.name != "The Host"));

        let indecisive = top_indecisive(&people, &config);
        assert!(indecisive.iter().all(|p| p.name != "The Host"));
    }

    #[test]
    fn rankings_never_exceed_top_n_and_never_pad() {
        let people = vec![
            stats("A", 4, 4, 0),
            stats("B", 4, 3, 1),
            stats("C", 4, 2, 2),
        ];
        let config = RankConfig {
            top_n: 2,
            ..RankConfig::default()
        };
        assert_eq!(top_regulars(&people, &config).len(), 2);

        let wide = RankConfig {
            top_n: 50,
            ..RankConfig::default()
        };
        assert_eq!(top_regulars(&people, &wide).len(), 3);
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let people = vec![
            stats("First", 4, 2, 1),
            stats("Second", 4, 2, 1),
            stats("Third", 4, 2, 1),
        ];
        let ranked = top_regulars(&people, &RankConfig::default());
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn indecisive_sorted_by_maybe_count() {
        let people = vec![
            stats("Alex", 6, 4, 1),
            stats("Jane", 6, 1, 4),
            stats("Sam", 6, 2, 3),
        ];
        let ranked = top_indecisive(&people, &RankConfig::default());
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Jane", "Sam", "Alex"]);
    }

    #[test]
    fn recent_activity_takes_newest_k() {
        let rows = vec![event("A", 1), event("A", 22), event("A", 8), event("A", 15)];
        let recent = recent_activity(&rows, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event_date.day(), 22);
        assert_eq!(recent[1].event_date.day(), 15);
    }

    #[test]
    fn recent_activity_keeps_input_order_for_equal_dates() {
        let rows = vec![
            event("First", 15),
            event("Newest", 22),
            event("Second", 15),
            event("Third", 15),
        ];
        let recent = recent_activity(&rows, 3);
        let names: Vec<&str> = recent.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["Newest", "First", "Second"]);
    }

    #[test]
    fn indecisive_ties_keep_first_appearance_order() {
        let people = vec![
            stats("First", 5, 2, 2),
            stats("Second", 5, 3, 2),
            stats("Third", 5, 1, 2),
        ];
        let ranked = top_indecisive(&people, &RankConfig::default());
        let names: Vec<&str> = ranked.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
