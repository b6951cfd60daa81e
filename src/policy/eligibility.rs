use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::policy::{MIN_BUSINESS_DAYS, MIN_NOTICE_DAYS, business_days};

/// A proposed vacation period as it exists in the request form, before any
/// row is written. Dates are optional because the form evaluates the draft
/// on every change, including half-filled states.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveRequestDraft {
    #[schema(example = "2026-02-02", format = "date", value_type = Option<String>)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-02-13", format = "date", value_type = Option<String>)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Family trip")]
    pub reason: Option<String>,
    #[serde(default)]
    #[schema(example = "Ana +55 11 99999-0000")]
    pub emergency_contact: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingDate,
    InvalidRange,
    InsufficientNotice,
    DurationTooShort,
    InsufficientBalance,
    MissingContact,
}

/// A single failed policy rule, tied to the form field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    pub kind: ViolationKind,
    #[schema(example = "start_date")]
    pub field: String,
    #[schema(example = "Vacations must be requested at least 15 days in advance")]
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, field: &str, message: impl Into<String>) -> Self {
        Violation {
            kind,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Outcome of one evaluation. An empty violation list means the draft is
/// admissible as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EligibilityResult {
    #[schema(example = 10)]
    pub business_days: u32,
    pub violations: Vec<Violation>,
}

impl EligibilityResult {
    pub fn is_admissible(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluates every policy rule against the draft and reports all violations
/// at once, in rule order, so the form can surface every problem in a single
/// pass rather than one per submit attempt.
///
/// `today` and `balance` are inputs, not ambient state: the same three
/// arguments always produce the same result.
///
/// The duration and balance rules charge `business_days`, which is only
/// meaningful for a well-formed interval; with a missing date or an inverted
/// range they are skipped and the reported count is 0. The notice rule needs
/// only the start date and is checked whenever one is present.
pub fn evaluate(draft: &LeaveRequestDraft, today: NaiveDate, balance: i32) -> EligibilityResult {
    let mut violations = Vec::new();

    if draft.start_date.is_none() {
        violations.push(Violation::new(
            ViolationKind::MissingDate,
            "start_date",
            "Start date is required",
        ));
    }
    if draft.end_date.is_none() {
        violations.push(Violation::new(
            ViolationKind::MissingDate,
            "end_date",
            "End date is required",
        ));
    }

    let range = match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) if end < start => {
            violations.push(Violation::new(
                ViolationKind::InvalidRange,
                "end_date",
                "End date must not be before start date",
            ));
            None
        }
        (Some(start), Some(end)) => Some((start, end)),
        _ => None,
    };

    if let Some(start) = draft.start_date {
        let earliest = today + Duration::days(MIN_NOTICE_DAYS);
        if start < earliest {
            violations.push(Violation::new(
                ViolationKind::InsufficientNotice,
                "start_date",
                format!(
                    "Vacations must be requested at least {} days in advance",
                    MIN_NOTICE_DAYS
                ),
            ));
        }
    }

    let days = match range {
        Some((start, end)) => business_days(start, end),
        None => 0,
    };

    if range.is_some() {
        if days < MIN_BUSINESS_DAYS {
            violations.push(Violation::new(
                ViolationKind::DurationTooShort,
                "end_date",
                format!(
                    "Minimum vacation period is {} business days",
                    MIN_BUSINESS_DAYS
                ),
            ));
        }
        if i64::from(days) > i64::from(balance) {
            violations.push(Violation::new(
                ViolationKind::InsufficientBalance,
                "end_date",
                format!(
                    "Insufficient balance: requested {} business days, {} available",
                    days, balance
                ),
            ));
        }
    }

    if draft.emergency_contact.trim().is_empty() {
        violations.push(Violation::new(
            ViolationKind::MissingContact,
            "emergency_contact",
            "Emergency contact is required",
        ));
    }

    EligibilityResult {
        business_days: days,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(start: Option<NaiveDate>, end: Option<NaiveDate>) -> LeaveRequestDraft {
        LeaveRequestDraft {
            start_date: start,
            end_date: end,
            reason: None,
            emergency_contact: "Ana +55 11 99999-0000".to_string(),
        }
    }

    fn kinds(result: &EligibilityResult) -> Vec<ViolationKind> {
        result.violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn admissible_draft_has_no_violations() {
        // Mon 2026-02-02 .. Fri 2026-02-13, well past the notice window
        let today = date(2026, 1, 1);
        let d = draft(Some(date(2026, 2, 2)), Some(date(2026, 2, 13)));
        let result = evaluate(&d, today, 30);

        assert!(result.is_admissible());
        assert_eq!(result.business_days, 10);
    }

    #[test]
    fn missing_dates_are_reported_per_field() {
        let result = evaluate(&draft(None, None), date(2025, 7, 1), 30);

        assert_eq!(
            kinds(&result),
            vec![ViolationKind::MissingDate, ViolationKind::MissingDate]
        );
        assert_eq!(result.violations[0].field, "start_date");
        assert_eq!(result.violations[1].field, "end_date");
        assert_eq!(result.business_days, 0);
    }

    #[test]
    fn nine_days_ahead_is_insufficient_notice() {
        // today 2025-07-01, start 2025-07-10: 9 calendar days < 15
        let today = date(2025, 7, 1);
        let d = draft(Some(date(2025, 7, 10)), Some(date(2025, 7, 18)));
        let result = evaluate(&d, today, 30);

        assert!(kinds(&result).contains(&ViolationKind::InsufficientNotice));
    }

    #[test]
    fn notice_boundary_is_inclusive() {
        let today = date(2025, 7, 1);
        // exactly today + 15 is the earliest admissible start
        let d = draft(Some(date(2025, 7, 16)), Some(date(2025, 7, 25)));
        let result = evaluate(&d, today, 30);

        assert!(!kinds(&result).contains(&ViolationKind::InsufficientNotice));
    }

    #[test]
    fn exact_five_day_week_with_small_balance_fails_only_on_balance() {
        // Mon 2025-07-21 .. Fri 2025-07-25, 20 days after 2025-07-01
        let today = date(2025, 7, 1);
        let d = draft(Some(date(2025, 7, 21)), Some(date(2025, 7, 25)));
        let result = evaluate(&d, today, 3);

        assert_eq!(result.business_days, 5);
        assert_eq!(kinds(&result), vec![ViolationKind::InsufficientBalance]);
        assert!(result.violations[0].message.contains('5'));
        assert!(result.violations[0].message.contains('3'));
    }

    #[test]
    fn inverted_range_still_yields_a_result() {
        let today = date(2025, 7, 1);
        let d = draft(Some(date(2025, 8, 25)), Some(date(2025, 8, 15)));
        let result = evaluate(&d, today, 30);

        assert!(kinds(&result).contains(&ViolationKind::InvalidRange));
        assert_eq!(result.business_days, 0);
    }

    #[test]
    fn short_duration_is_flagged() {
        // Mon 2025-07-21 .. Wed 2025-07-23: 3 business days
        let today = date(2025, 7, 1);
        let d = draft(Some(date(2025, 7, 21)), Some(date(2025, 7, 23)));
        let result = evaluate(&d, today, 30);

        assert_eq!(result.business_days, 3);
        assert_eq!(kinds(&result), vec![ViolationKind::DurationTooShort]);
    }

    #[test]
    fn blank_contact_is_flagged_after_trimming() {
        let today = date(2025, 7, 1);
        let mut d = draft(Some(date(2025, 7, 21)), Some(date(2025, 7, 25)));
        d.emergency_contact = "   ".to_string();
        let result = evaluate(&d, today, 30);

        assert_eq!(kinds(&result), vec![ViolationKind::MissingContact]);
        assert_eq!(result.violations[0].field, "emergency_contact");
    }

    #[test]
    fn multiple_failures_surface_together_in_rule_order() {
        // Too soon, too short, balance exhausted, no contact
        let today = date(2025, 7, 1);
        let mut d = draft(Some(date(2025, 7, 7)), Some(date(2025, 7, 9)));
        d.emergency_contact = String::new();
        let result = evaluate(&d, today, 1);

        assert_eq!(
            kinds(&result),
            vec![
                ViolationKind::InsufficientNotice,
                ViolationKind::DurationTooShort,
                ViolationKind::InsufficientBalance,
                ViolationKind::MissingContact,
            ]
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let today = date(2025, 7, 1);
        let d = draft(Some(date(2025, 7, 10)), Some(date(2025, 7, 9)));

        let first = evaluate(&d, today, 2);
        let second = evaluate(&d, today, 2);
        assert_eq!(first, second);
    }
}
