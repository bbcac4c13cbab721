//! `plan` subcommands.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Subcommand;

use daybook_api::{Cycle, NewPlan, Plan, PlanUpdate};
use daybook_core::plan::{Period, plan_keep_times_list, progress, sort_plans};

use crate::app::App;

#[derive(Subcommand)]
pub enum PlanCommand {
    /// List plans, pinned and unfinished first
    List,

    /// Show a plan's progress
    Show {
        /// Plan id
        id: i64,
    },

    /// Create a plan
    Create {
        /// Plan name
        name: String,

        /// Repeat cycle: day, week, month, year or no
        #[arg(long, default_value = "week", value_parser = parse_cycle)]
        cycle: Cycle,

        /// Check-ins per period
        #[arg(long, default_value_t = 1)]
        times: u32,

        /// Deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_deadline)]
        limit: Option<NaiveDateTime>,

        /// Pin to the top
        #[arg(long)]
        pin: bool,
    },

    /// Edit a plan
    Edit {
        /// Plan id
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New cycle
        #[arg(long, value_parser = parse_cycle)]
        cycle: Option<Cycle>,

        /// New check-ins per period
        #[arg(long)]
        times: Option<u32>,

        /// New deadline (YYYY-MM-DD)
        #[arg(long, value_parser = parse_deadline)]
        limit: Option<NaiveDateTime>,

        /// Pin or unpin
        #[arg(long)]
        pin: Option<bool>,
    },

    /// Delete a plan
    Delete {
        /// Plan id
        id: i64,
    },

    /// Check in once for a plan
    Checkin {
        /// Plan id
        id: i64,
    },

    /// Check-ins per period, most recent first
    History {
        /// Plan id
        id: i64,
    },
}

pub async fn run(app: &App, command: PlanCommand) -> Result<()> {
    match command {
        PlanCommand::List => list(app).await,
        PlanCommand::Show { id } => {
            let plan = app.client.get_plan(id).await?;
            print_plan(&plan, app.now());
            Ok(())
        }
        PlanCommand::Create {
            name,
            cycle,
            times,
            limit,
            pin,
        } => {
            let user_id = app.user_id().await?;
            let mut new_plan = NewPlan::new(user_id, name, cycle).with_times(times.max(1));
            if let Some(limit) = limit {
                new_plan = new_plan.with_limit(limit);
            }
            if pin {
                new_plan = new_plan.pinned();
            }
            let plan = app.client.create_plan(&new_plan).await?;
            println!("Created plan {} \"{}\"", plan.id, plan.name);
            Ok(())
        }
        PlanCommand::Edit {
            id,
            name,
            cycle,
            times,
            limit,
            pin,
        } => {
            let update = PlanUpdate {
                name,
                cycle,
                times,
                gmt_limit: limit,
                is_top: pin,
                state: None,
            };
            if update.is_empty() {
                bail!("nothing to change");
            }
            app.client.update_plan(id, &update).await?;
            println!("Plan {id} updated");
            Ok(())
        }
        PlanCommand::Delete { id } => {
            app.client.delete_plan(id).await?;
            println!("Plan {id} deleted");
            Ok(())
        }
        PlanCommand::Checkin { id } => check_in(app, id).await,
        PlanCommand::History { id } => {
            let plan = app.client.get_plan(id).await?;
            print_history(&plan);
            Ok(())
        }
    }
}

async fn list(app: &App) -> Result<()> {
    let user_id = app.user_id().await?;
    let now = app.now();
    let mut plans = app.client.list_plans(user_id).await?;
    sort_plans(&mut plans, now);

    if plans.is_empty() {
        println!("No plans");
    }
    for plan in &plans {
        let p = progress(plan, now);
        let mark = if p.is_finished { "x" } else { " " };
        let pin = if plan.is_top { "*" } else { " " };
        let status = if p.is_expired { "  (expired)" } else { "" };
        println!(
            "[{mark}]{pin}{:>5}  {}  {}{status}",
            plan.id,
            plan.name,
            describe_progress(plan, &p),
        );
    }
    Ok(())
}

async fn check_in(app: &App, id: i64) -> Result<()> {
    let user_id = app.user_id().await?;
    let now = app.now();
    let plan = app.client.get_plan(id).await?;
    if progress(&plan, now).is_expired {
        bail!("plan {id} has expired");
    }

    let record = app.client.check_in(id, user_id).await?;
    let mut plan = plan;
    plan.records.push(record);
    let p = progress(&plan, now);
    println!("Checked in: {}", describe_progress(&plan, &p));
    Ok(())
}

fn print_plan(plan: &Plan, now: NaiveDateTime) {
    let p = progress(plan, now);
    println!("#{} {}", plan.id, plan.name);
    println!("cycle:    {}", plan.cycle.display_name());
    println!("progress: {}", describe_progress(plan, &p));
    if let Some(period) = Period::containing(plan.cycle, now.date()) {
        println!("period:   {} (since {})", period.label(), period.start);
    }
    if let Some(limit) = plan.gmt_limit {
        let note = if p.is_expired { " (expired)" } else { "" };
        println!("deadline: {}{note}", limit.format("%Y-%m-%d"));
    }
    println!("total:    {} check-ins", plan.records.len());
}

fn print_history(plan: &Plan) {
    let history = plan_keep_times_list(plan);
    if history.is_empty() {
        println!("No check-ins yet");
    }
    for tally in history {
        println!("{:<12} {}", tally.label, tally.times);
    }
}

fn describe_progress(plan: &Plan, p: &daybook_core::PlanProgress) -> String {
    if plan.cycle.is_periodic() {
        format!(
            "{}/{} this {}",
            p.finished,
            p.target.max(1),
            plan.cycle.as_str()
        )
    } else if p.is_finished {
        "done".to_string()
    } else {
        format!("{} check-ins", plan.records.len())
    }
}

fn parse_cycle(s: &str) -> Result<Cycle, String> {
    Cycle::parse(s).ok_or_else(|| format!("unknown cycle `{s}`, expected day, week, month, year or no"))
}

/// Deadlines are inclusive: the plan stays open until the end of that day.
fn parse_deadline(s: &str) -> Result<NaiveDateTime, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("{s}: {e}"))?;
    let end = NaiveTime::from_hms_opt(23, 59, 59).ok_or("invalid time")?;
    Ok(date.and_time(end))
}
