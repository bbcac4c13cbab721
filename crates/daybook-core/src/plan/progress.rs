//! Check-in counting for plans.
//!
//! Completion is never stored on the server; it is derived here from the
//! plan's cycle and its record timestamps.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use daybook_api::{Cycle, Plan};

use super::period::{Period, period_label, period_start};

/// Check-ins counted for one period of a plan's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTally {
    /// Period label (`2024-05-06`, `2024-05`, `2024`).
    pub label: String,
    /// First day of the period.
    pub start: NaiveDate,
    /// Number of check-ins in the period.
    pub times: usize,
}

/// Snapshot of a plan's progress at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanProgress {
    /// Check-ins in the current period (always 0 for one-off plans).
    pub finished: usize,
    /// Target per period.
    pub target: u32,
    /// Check-ins still needed this period.
    pub remaining: u32,
    /// Whether the plan counts as done for now.
    pub is_finished: bool,
    /// Whether the plan's deadline has passed.
    pub is_expired: bool,
}

/// Counts the check-ins that fall in the period containing `now`.
///
/// One-off plans have no period and always report 0.
#[must_use]
pub fn calculate_finish_times(plan: &Plan, now: NaiveDateTime) -> usize {
    let Some(current) = Period::containing(plan.cycle, now.date()) else {
        return 0;
    };
    plan.records
        .iter()
        .filter(|r| current.contains(r.gmt_create))
        .count()
}

/// Whether the plan is complete at `now`.
///
/// Periodic plans are complete once the current period reaches `times`.
/// One-off plans are complete once they hold more than one record.
#[must_use]
pub fn is_finished(plan: &Plan, now: NaiveDateTime) -> bool {
    if plan.cycle.is_periodic() {
        calculate_finish_times(plan, now) >= target(plan)
    } else {
        plan.records.len() > 1
    }
}

/// Check-ins still needed in the current period.
#[must_use]
pub fn remaining_times(plan: &Plan, now: NaiveDateTime) -> u32 {
    if !plan.cycle.is_periodic() {
        return u32::from(!is_finished(plan, now));
    }
    let left = target(plan).saturating_sub(calculate_finish_times(plan, now));
    u32::try_from(left).unwrap_or(u32::MAX)
}

/// Whether the plan's deadline has passed.
#[must_use]
pub fn is_expired(plan: &Plan, now: NaiveDateTime) -> bool {
    plan.gmt_limit.is_some_and(|limit| now >= limit)
}

/// Progress snapshot used by the plan list.
#[must_use]
pub fn progress(plan: &Plan, now: NaiveDateTime) -> PlanProgress {
    PlanProgress {
        finished: calculate_finish_times(plan, now),
        target: plan.times,
        remaining: remaining_times(plan, now),
        is_finished: is_finished(plan, now),
        is_expired: is_expired(plan, now),
    }
}

/// Groups a plan's check-ins by period, most recent period first.
///
/// Only periods with at least one check-in appear. One-off plans are
/// grouped per day.
#[must_use]
pub fn plan_keep_times_list(plan: &Plan) -> Vec<PeriodTally> {
    let cycle = match plan.cycle {
        Cycle::No => Cycle::Day,
        other => other,
    };

    let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in &plan.records {
        if let Some(start) = period_start(cycle, record.gmt_create.date()) {
            *buckets.entry(start).or_default() += 1;
        }
    }

    buckets
        .into_iter()
        .rev()
        .map(|(start, times)| PeriodTally {
            label: period_label(cycle, start),
            start,
            times,
        })
        .collect()
}

/// Orders plans for display: pinned first, then unfinished before finished.
///
/// The sort is stable, so server order is kept within each group.
pub fn sort_plans(plans: &mut [Plan], now: NaiveDateTime) {
    plans.sort_by(|a, b| match (a.is_top, b.is_top) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => is_finished(a, now).cmp(&is_finished(b, now)),
    });
}

fn target(plan: &Plan) -> usize {
    usize::try_from(plan.times).unwrap_or(usize::MAX).max(1)
}
