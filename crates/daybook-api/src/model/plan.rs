//! Plan (habit) DTOs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{flag, timestamp};

/// How often a plan repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cycle {
    /// Every day.
    Day,
    /// Every ISO week (Monday to Sunday).
    #[default]
    Week,
    /// Every calendar month.
    Month,
    /// Every calendar year.
    Year,
    /// One-off plan with no repeating period.
    No,
}

impl Cycle {
    /// All cycles, in the order the create-plan form offers them.
    pub const ALL: [Self; 5] = [Self::Day, Self::Week, Self::Month, Self::Year, Self::No];

    /// Parse from the wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    /// Convert to the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::No => "no",
        }
    }

    /// Returns true for cycles that have a repeating period.
    #[must_use]
    pub const fn is_periodic(&self) -> bool {
        !matches!(self, Self::No)
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
            Self::Year => "Yearly",
            Self::No => "One-off",
        }
    }
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One check-in against a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRecord {
    /// Record ID.
    pub id: i64,
    /// Plan this record belongs to.
    pub plan_id: i64,
    /// User who checked in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// When the check-in happened (local wall clock).
    #[serde(with = "timestamp")]
    pub gmt_create: NaiveDateTime,
}

/// A recurring or one-off habit tracked with check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan ID.
    pub id: i64,
    /// Plan name shown in the list.
    pub name: String,
    /// Repeat cycle.
    pub cycle: Cycle,
    /// Target check-ins per period.
    #[serde(default)]
    pub times: u32,
    /// Optional deadline after which the plan stops.
    #[serde(default, with = "timestamp::option")]
    pub gmt_limit: Option<NaiveDateTime>,
    /// Pinned to the top of the list.
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_top: bool,
    /// Server-side lifecycle state (0 = active).
    #[serde(default)]
    pub state: i32,
    /// Check-ins, in whatever order the server returns them.
    #[serde(default)]
    pub records: Vec<PlanRecord>,
}

impl Plan {
    /// Returns true when the plan is active on the server.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state == 0
    }
}

/// Body for creating a plan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    /// Owner.
    pub user_id: i64,
    /// Plan name.
    pub name: String,
    /// Repeat cycle.
    pub cycle: Cycle,
    /// Target check-ins per period.
    pub times: u32,
    /// Optional deadline.
    #[serde(
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gmt_limit: Option<NaiveDateTime>,
    /// Pin to top.
    pub is_top: bool,
}

impl NewPlan {
    /// Creates a new plan body with one check-in per period.
    #[must_use]
    pub fn new(user_id: i64, name: impl Into<String>, cycle: Cycle) -> Self {
        Self {
            user_id,
            name: name.into(),
            cycle,
            times: 1,
            gmt_limit: None,
            is_top: false,
        }
    }

    /// Sets the target check-ins per period.
    #[must_use]
    pub const fn with_times(mut self, times: u32) -> Self {
        self.times = times;
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_limit(mut self, limit: NaiveDateTime) -> Self {
        self.gmt_limit = Some(limit);
        self
    }

    /// Pins the plan.
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.is_top = true;
        self
    }
}

/// Body for editing a plan. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Cycle>,
    /// New target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
    /// New deadline.
    #[serde(
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gmt_limit: Option<NaiveDateTime>,
    /// New pin state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_top: Option<bool>,
    /// New lifecycle state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<i32>,
}

impl PlanUpdate {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.cycle.is_none()
            && self.times.is_none()
            && self.gmt_limit.is_none()
            && self.is_top.is_none()
            && self.state.is_none()
    }
}

/// Body for a check-in.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewRecord {
    pub plan_id: i64,
    pub user_id: i64,
}
