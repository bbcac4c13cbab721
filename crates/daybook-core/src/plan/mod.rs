//! Plan (habit) cycle arithmetic.
//!
//! Pure functions over [`daybook_api::Plan`]: which calendar period a
//! check-in belongs to, how many check-ins the current period holds, and the
//! per-period history shown on the plan detail screen.

mod period;
mod progress;

pub use period::{Period, next_period_start, period_label, period_start};
pub use progress::{
    PeriodTally, PlanProgress, calculate_finish_times, is_expired, is_finished,
    plan_keep_times_list, progress, remaining_times, sort_plans,
};
