//! Leave eligibility and duration rules.
//!
//! Everything here is pure: the current date and the requester's balance are
//! passed in by the caller, never read from the clock or the database. The
//! handlers in `api` call into this module both for live feedback
//! (`/vacation-requests/validate`) and as the authoritative check before a
//! request row is written.

pub mod business_days;
pub mod eligibility;

pub use business_days::business_days;
pub use eligibility::{
    EligibilityResult, LeaveRequestDraft, Violation, ViolationKind, evaluate,
};

/// Minimum calendar days between the request date and the vacation start.
pub const MIN_NOTICE_DAYS: i64 = 15;

/// Minimum chargeable duration of a single vacation period.
pub const MIN_BUSINESS_DAYS: u32 = 5;

/// Business days granted per year; also the seeded default balance.
pub const ANNUAL_ENTITLEMENT_DAYS: i32 = 30;
