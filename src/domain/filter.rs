use crate::domain::models::{ShiftReport, ShiftType, UserProfile};
use crate::domain::roster;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Multi-criteria report filter. Criteria are AND-combined; an absent
/// criterion imposes no constraint. A pure function of (reports, users,
/// criteria); nothing here is persisted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub shift_type: Option<ShiftType>,
    /// Case-insensitive substring of the patient name.
    pub patient: Option<String>,
    /// Tri-state: None = don't care, Some(true) = incidents only,
    /// Some(false) = incident-free only.
    pub incident: Option<bool>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Free text matched against patient name, house, or the resolved
    /// submitter display name.
    pub search: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, report: &ShiftReport, users: &HashMap<String, UserProfile>) -> bool {
        if let Some(shift) = self.shift_type {
            if report.shift_type != shift {
                return false;
            }
        }
        if let Some(patient) = non_empty(&self.patient) {
            if !contains_ci(&report.patient_name, patient) {
                return false;
            }
        }
        if let Some(incident) = self.incident {
            if report.incident_status != incident {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if report.shift_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if report.shift_date > to {
                return false;
            }
        }
        if let Some(needle) = non_empty(&self.search) {
            let submitter = users
                .get(&report.user_id)
                .map(|u| u.display_name.as_str())
                .unwrap_or("");
            if !contains_ci(&report.patient_name, needle)
                && !contains_ci(&report.house, needle)
                && !contains_ci(submitter, needle)
            {
                return false;
            }
        }
        true
    }
}

fn non_empty(criterion: &Option<String>) -> Option<&str> {
    criterion.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Newest submission first, falling back to the shift date for legacy
/// reports without a timestamp. Stable for equal keys.
pub fn sort_newest_first(reports: &mut [ShiftReport]) {
    reports.sort_by_key(|r| Reverse(r.submitted_sort_key()));
}

pub fn filter_and_sort(
    mut reports: Vec<ShiftReport>,
    users: &HashMap<String, UserProfile>,
    filter: &ReportFilter,
) -> Vec<ShiftReport> {
    reports.retain(|r| filter.matches(r, users));
    sort_newest_first(&mut reports);
    reports
}

/// Derived, read-only per-house statistics for the dashboard drill-down.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseSummary {
    pub house: u8,
    pub patients: Vec<String>,
    pub total_reports: usize,
    pub incidents: usize,
    pub day_reports: usize,
    pub evening_reports: usize,
    pub night_reports: usize,
    pub last_report_at: Option<DateTime<Utc>>,
}

/// Partition the report set by house equality and aggregate. Every known
/// house appears, reports or not.
pub fn house_summaries(reports: &[ShiftReport]) -> Vec<HouseSummary> {
    roster::HOUSES
        .iter()
        .map(|&house| {
            let key = house.to_string();
            let house_reports: Vec<&ShiftReport> =
                reports.iter().filter(|r| r.house == key).collect();
            HouseSummary {
                house,
                patients: roster::patients_for_house(house)
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
                total_reports: house_reports.len(),
                incidents: house_reports.iter().filter(|r| r.incident_status).count(),
                day_reports: count_shift(&house_reports, ShiftType::Day),
                evening_reports: count_shift(&house_reports, ShiftType::Evening),
                night_reports: count_shift(&house_reports, ShiftType::Night),
                last_report_at: house_reports
                    .iter()
                    .map(|r| r.submitted_sort_key())
                    .max(),
            }
        })
        .collect()
}

fn count_shift(reports: &[&ShiftReport], shift: ShiftType) -> usize {
    reports.iter().filter(|r| r.shift_type == shift).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::UserRole;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn report(
        id: &str,
        shift: ShiftType,
        house: &str,
        patient: &str,
        date: (i32, u32, u32),
        incident: bool,
        user_id: &str,
        submitted: Option<(i32, u32, u32, u32)>,
    ) -> ShiftReport {
        ShiftReport {
            id: id.to_string(),
            shift_type: shift,
            house: house.to_string(),
            patient_name: patient.to_string(),
            shift_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            educator: "דנה".into(),
            notes: None,
            incident_status: incident,
            user_id: user_id.to_string(),
            submitted_at: submitted.map(|(y, m, d, h)| {
                Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
            }),
            answers: BTreeMap::new(),
        }
    }

    fn users() -> HashMap<String, UserProfile> {
        let mut map = HashMap::new();
        map.insert(
            "u1".to_string(),
            UserProfile {
                id: "u1".into(),
                display_name: "Noa Levi".into(),
                email: "noa@example.org".into(),
                photo_url: String::new(),
                role: UserRole::Staff,
            },
        );
        map
    }

    fn sample() -> Vec<ShiftReport> {
        vec![
            report("a", ShiftType::Night, "1", "רפאל", (2024, 1, 10), true, "u1", Some((2024, 1, 10, 23))),
            report("b", ShiftType::Day, "2", "מנחם", (2024, 1, 15), false, "u2", Some((2024, 1, 15, 12))),
            report("c", ShiftType::Night, "2", "שמעון", (2024, 1, 20), false, "u1", Some((2024, 1, 21, 1))),
            report("d", ShiftType::Night, "3", "שחר", (2024, 2, 2), false, "u1", Some((2024, 2, 2, 23))),
            report("e", ShiftType::Evening, "1", "יוסף", (2023, 12, 30), true, "u2", None),
        ]
    }

    #[test]
    fn january_night_shift_with_date_range() {
        let filter = ReportFilter {
            shift_type: Some(ShiftType::Night),
            date_from: NaiveDate::from_ymd_opt(2024, 1, 1),
            date_to: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let out = filter_and_sort(sample(), &users(), &filter);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        // Only January night shifts, newest submitted first.
        assert_eq!(ids, vec!["c", "a"]);
        for r in &out {
            assert_eq!(r.shift_type, ShiftType::Night);
            assert!(r.shift_date >= NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            assert!(r.shift_date <= NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        }
    }

    #[test]
    fn predicate_is_sound_and_complete() {
        let filter = ReportFilter {
            incident: Some(false),
            ..Default::default()
        };
        let all = sample();
        let out = filter_and_sort(all.clone(), &users(), &filter);
        // Sound: everything in the output satisfies the criterion.
        assert!(out.iter().all(|r| !r.incident_status));
        // Complete: nothing satisfying the criterion was dropped.
        assert_eq!(out.len(), all.iter().filter(|r| !r.incident_status).count());
    }

    #[test]
    fn patient_substring_is_case_insensitive() {
        let mut all = sample();
        all.push(report("f", ShiftType::Day, "4", "Meir Cohen", (2024, 3, 1), false, "u2", None));
        let filter = ReportFilter {
            patient: Some("meir".into()),
            ..Default::default()
        };
        let out = filter_and_sort(all, &users(), &filter);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "f");
    }

    #[test]
    fn search_matches_house_and_resolved_submitter() {
        let by_house = ReportFilter {
            search: Some("3".into()),
            ..Default::default()
        };
        let out = filter_and_sort(sample(), &users(), &by_house);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "d");

        let by_submitter = ReportFilter {
            search: Some("noa".into()),
            ..Default::default()
        };
        let out = filter_and_sort(sample(), &users(), &by_submitter);
        let ids: Vec<&str> = out.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a"]);
    }

    #[test]
    fn sort_falls_back_to_shift_date_and_is_stable() {
        let mut reports = vec![
            report("x", ShiftType::Day, "1", "רפאל", (2024, 1, 5), false, "u1", None),
            report("y", ShiftType::Day, "1", "אלי", (2024, 1, 5), false, "u1", None),
            report("z", ShiftType::Day, "1", "ירון", (2024, 1, 6), false, "u1", None),
        ];
        sort_newest_first(&mut reports);
        let ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        // z is newest; x and y tie and keep their input order.
        assert_eq!(ids, vec!["z", "x", "y"]);

        let keys: Vec<_> = reports.iter().map(|r| r.submitted_sort_key()).collect();
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn house_summaries_partition_and_count() {
        let summaries = house_summaries(&sample());
        assert_eq!(summaries.len(), 5);

        let h1 = summaries.iter().find(|s| s.house == 1).unwrap();
        assert_eq!(h1.total_reports, 2);
        assert_eq!(h1.incidents, 2);
        assert_eq!(h1.night_reports, 1);
        assert_eq!(h1.evening_reports, 1);
        assert!(h1.last_report_at.is_some());

        let h5 = summaries.iter().find(|s| s.house == 5).unwrap();
        assert_eq!(h5.total_reports, 0);
        assert!(h5.last_report_at.is_none());
        assert!(!h5.patients.is_empty());
    }
}
