//! Read-only share codec.
//!
//! Packs the current month into a compact, URL-safe string: the month's
//! schedule and cancelled days, plus only the instructors the schedule
//! references, stripped to id and name. The payload is tagged
//! `viewOnly`, and applying a decoded payload tells the caller to switch
//! the presentation into its read-only mode.
//!
//! Compression is lz-string (URI-component variant), carried in an `s`
//! query parameter so URL shorteners preserve it. Decoding never touches
//! caller state until it has fully succeeded.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{DaySchedule, Group, Instructor, Month};
use crate::state::AppState;

/// Share decode failure.
#[derive(Debug, Error)]
pub enum ShareError {
    /// The string is not valid lz-string data.
    #[error("failed to decompress share data")]
    Decompress,
    /// Decompressed, but the JSON payload is invalid.
    #[error("invalid share payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An instructor as carried in a share link: display identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInstructor {
    /// Roster id, so schedule references resolve.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// The shared view of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    /// Month number, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Instructors referenced by this month's schedule (id + name only).
    pub instructors: Vec<ShareInstructor>,
    /// This month's schedule entries.
    pub schedule: BTreeMap<NaiveDate, DaySchedule>,
    /// Weekly class-day pattern.
    #[serde(rename = "classDays")]
    pub class_days: Vec<u32>,
    /// This month's cancelled dates.
    #[serde(rename = "cancelledDays")]
    pub cancelled_days: BTreeSet<NaiveDate>,
    /// Always true: a decoded link opens read-only.
    #[serde(rename = "viewOnly")]
    pub view_only: bool,
}

impl SharePayload {
    /// Builds the shareable subset of `state`'s current month.
    pub fn from_state(state: &AppState) -> Self {
        let month = state.current;

        let schedule: BTreeMap<NaiveDate, DaySchedule> = state
            .schedule
            .iter()
            .filter(|(d, _)| month.contains(**d))
            .map(|(d, day)| (*d, day.clone()))
            .collect();

        // Only instructors assigned as mains this month travel with the
        // link, and only their display identity.
        let instructors = state
            .instructors
            .iter()
            .filter(|i| {
                schedule.values().any(|day| {
                    Group::ALL.iter().any(|&g| day.slot(g).is_main(&i.id))
                })
            })
            .map(|i| ShareInstructor {
                id: i.id.clone(),
                name: i.name.clone(),
            })
            .collect();

        let cancelled_days = state
            .cancelled_days
            .iter()
            .copied()
            .filter(|d| month.contains(*d))
            .collect();

        Self {
            month: month.month,
            year: month.year,
            instructors,
            schedule,
            class_days: state.class_days.clone(),
            cancelled_days,
            view_only: true,
        }
    }

    /// Installs this payload into `state` for display.
    ///
    /// The roster becomes display-only (no capabilities, no
    /// availability). Returns the view-only flag for the presentation
    /// layer, which disables drag, click-to-remove, and cancel controls.
    pub fn apply(self, state: &mut AppState) -> bool {
        state.current = Month::new(self.year, self.month);
        state.instructors = self
            .instructors
            .into_iter()
            .map(|i| Instructor::new(i.id, i.name))
            .collect();
        state.schedule = self.schedule;
        state.class_days = self.class_days;
        state.cancelled_days = self.cancelled_days;
        self.view_only
    }
}

/// Encodes a payload to a URL-safe compressed string.
pub fn encode(payload: &SharePayload) -> String {
    let json = serde_json::to_string(payload).unwrap_or_default();
    lz_str::compress_to_encoded_uri_component(json.as_str())
}

/// Decodes a compressed share string.
///
/// Fails with a typed error and no side effects; callers apply the
/// payload only after success.
pub fn decode(compressed: &str) -> Result<SharePayload, ShareError> {
    let wide =
        lz_str::decompress_from_encoded_uri_component(compressed).ok_or(ShareError::Decompress)?;
    let json = String::from_utf16(&wide).map_err(|_| {
        warn!("share data decompressed to invalid UTF-16");
        ShareError::Decompress
    })?;
    Ok(serde_json::from_str(&json)?)
}

/// The full share link for `state`'s current month.
///
/// A query parameter is used (not a fragment) so URL shorteners preserve
/// it; this long form is also the documented fallback when an external
/// shortener fails.
pub fn share_url(state: &AppState, base_url: &str) -> String {
    format!("{base_url}?s={}", encode(&SharePayload::from_state(state)))
}

/// Extracts the compressed share parameter from a URL, if present.
///
/// Reads the `s` query parameter; falls back to the legacy `#share=`
/// fragment form.
pub fn share_param(url: &str) -> Option<&str> {
    if let Some(query) = url.split_once('?').map(|(_, rest)| rest) {
        let query = query.split_once('#').map_or(query, |(q, _)| q);
        for pair in query.split('&') {
            if let Some(value) = pair.strip_prefix("s=") {
                return Some(value);
            }
        }
    }
    url.split_once("#share=").map(|(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MergeTag;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn state() -> AppState {
        let mut s = AppState::empty(Month::new(2025, 6));
        s.add_instructor(
            Instructor::new("i1", "Shared")
                .with_group(Group::Beginners)
                .with_dates([date("2025-06-05")]),
        );
        s.add_instructor(Instructor::new("i2", "Unreferenced").with_group(Group::Adults));
        s.ensure_day(date("2025-06-05")).slot_mut(Group::Beginners).instructor_id =
            Some("i1".into());
        s
    }

    #[test]
    fn test_payload_subsets_current_month() {
        let mut s = state();
        s.ensure_day(date("2025-07-01")).slot_mut(Group::Adults).instructor_id =
            Some("i2".into());
        s.cancelled_days.insert(date("2025-06-15"));
        s.cancelled_days.insert(date("2025-07-04"));

        let payload = SharePayload::from_state(&s);

        assert_eq!(payload.month, 6);
        assert_eq!(payload.year, 2025);
        assert_eq!(payload.schedule.len(), 1);
        assert!(payload.schedule.contains_key(&date("2025-06-05")));
        assert_eq!(payload.cancelled_days.len(), 1);
        assert!(payload.cancelled_days.contains(&date("2025-06-15")));
        assert!(payload.view_only);
    }

    #[test]
    fn test_payload_strips_instructors() {
        let payload = SharePayload::from_state(&state());
        // Only the referenced instructor, and only id + name.
        assert_eq!(payload.instructors.len(), 1);
        assert_eq!(payload.instructors[0].id, "i1");
        assert_eq!(payload.instructors[0].name, "Shared");
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let mut s = state();
        s.ensure_day(date("2025-06-05")).merges = MergeTag::BegChi;
        let payload = SharePayload::from_state(&s);

        let decoded = decode(&encode(&payload)).unwrap();
        assert_eq!(decoded, payload);

        // Byte-identical JSON after the compression round trip.
        assert_eq!(
            serde_json::to_string(&decoded).unwrap(),
            serde_json::to_string(&payload).unwrap()
        );
    }

    #[test]
    fn test_decode_garbage_fails_cleanly() {
        assert!(decode("!!not-lz-data!!").is_err());

        // Valid compression of invalid JSON: parse error, not a panic.
        let bogus = lz_str::compress_to_encoded_uri_component("{not json");
        assert!(matches!(decode(&bogus), Err(ShareError::Parse(_))));
    }

    #[test]
    fn test_apply_installs_view_only_state() {
        let payload = SharePayload::from_state(&state());

        let mut target = AppState::empty(Month::new(2024, 1));
        let view_only = payload.apply(&mut target);

        assert!(view_only);
        assert_eq!(target.current, Month::new(2025, 6));
        assert_eq!(target.instructors.len(), 1);
        // Display-only roster: no capabilities or availability travel.
        assert!(target.instructors[0].groups.is_empty());
        assert!(target.instructors[0].available_dates.is_empty());
        assert!(target
            .slot_at(date("2025-06-05"), Group::Beginners)
            .unwrap()
            .is_main("i1"));
    }

    #[test]
    fn test_share_url_and_param_extraction() {
        let s = state();
        let url = share_url(&s, "https://example.org/schedule");
        assert!(url.starts_with("https://example.org/schedule?s="));

        let param = share_param(&url).unwrap();
        let decoded = decode(param).unwrap();
        assert_eq!(decoded.month, 6);

        assert_eq!(share_param("https://x.org/?a=1&s=ABC"), Some("ABC"));
        assert_eq!(share_param("https://x.org/#share=XYZ"), Some("XYZ"));
        assert_eq!(share_param("https://x.org/"), None);
    }
}
