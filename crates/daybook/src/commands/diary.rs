//! `diary` subcommands.

use anyhow::{Result, bail};
use chrono::Datelike;
use clap::Subcommand;

use daybook_api::{DiaryDetail, DiaryQuery, DiaryUpdate};

use super::FramePrinter;
use super::chat::open_session;
use crate::app::App;

#[derive(Subcommand)]
pub enum DiaryCommand {
    /// Turn the current conversation into a diary
    Generate,

    /// List diaries, optionally for one month
    List {
        /// Year
        #[arg(long)]
        year: Option<i32>,

        /// Month (1-12), defaults to the current month when --year is given
        #[arg(long, requires = "year")]
        month: Option<u32>,
    },

    /// Show one diary
    Show {
        /// Diary id
        id: i64,
    },

    /// Replace a diary's text and images
    Edit {
        /// Diary id
        id: i64,

        /// New text
        text: String,

        /// Image paths (repeatable); omitted keeps no images
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Move a diary to the recycle bin
    Delete {
        /// Diary id
        id: i64,
    },

    /// Restore a diary from the recycle bin
    Restore {
        /// Diary id
        id: i64,
    },

    /// Delete a diary permanently
    Purge {
        /// Diary id
        id: i64,
    },

    /// List the recycle bin
    Trash,
}

pub async fn run(app: &App, command: DiaryCommand) -> Result<()> {
    match command {
        DiaryCommand::Generate => generate(app).await,
        DiaryCommand::List { year, month } => list(app, year, month).await,
        DiaryCommand::Show { id } => {
            let diary = app.client.get_diary(id).await?;
            print_diary(&diary);
            Ok(())
        }
        DiaryCommand::Edit { id, text, images } => {
            if text.trim().is_empty() {
                bail!("diary text cannot be empty");
            }
            app.client
                .update_diary(id, &DiaryUpdate::new(text, &images))
                .await?;
            println!("Diary {id} updated");
            Ok(())
        }
        DiaryCommand::Delete { id } => {
            app.client.delete_diary(id).await?;
            println!(
                "Diary {id} moved to the recycle bin for {} days",
                daybook_api::model::RECYCLE_RETENTION_DAYS
            );
            Ok(())
        }
        DiaryCommand::Restore { id } => {
            app.client.restore_diary(id).await?;
            println!("Diary {id} restored");
            Ok(())
        }
        DiaryCommand::Purge { id } => {
            app.client.purge_diary(id).await?;
            println!("Diary {id} deleted permanently");
            Ok(())
        }
        DiaryCommand::Trash => trash(app).await,
    }
}

async fn generate(app: &App) -> Result<()> {
    let session = open_session(app).await?;
    let mut printer = FramePrinter::default();
    session.generate_diary(|frame| printer.frame(frame)).await?;
    printer.finish();
    Ok(())
}

async fn list(app: &App, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let user_id = app.user_id().await?;
    let query = match year {
        Some(year) => {
            let month = month.unwrap_or_else(|| app.now().month());
            if !(1..=12).contains(&month) {
                bail!("month must be 1-12");
            }
            DiaryQuery::month(user_id, year, month)
        }
        None => DiaryQuery::all(user_id),
    };

    let diaries = app.client.list_diaries(&query).await?;
    if diaries.is_empty() {
        println!("No diaries");
    }
    for diary in &diaries {
        println!(
            "{:>6}  {}  {}",
            diary.id,
            diary.gmt_create.format("%Y-%m-%d"),
            first_line(&diary.context, 60)
        );
    }
    Ok(())
}

async fn trash(app: &App) -> Result<()> {
    let user_id = app.user_id().await?;
    let now = app.now();
    let deleted = app.client.list_recycled_diaries(user_id).await?;
    if deleted.is_empty() {
        println!("Recycle bin is empty");
    }
    for entry in deleted.iter().filter(|d| d.is_recoverable(now)) {
        println!(
            "{:>6}  {}  {} days left  {}",
            entry.diary.id,
            entry.gmt_delete.format("%Y-%m-%d"),
            entry.days_remaining(now),
            first_line(&entry.diary.context, 40)
        );
    }
    Ok(())
}

fn print_diary(diary: &DiaryDetail) {
    println!("#{}  {}", diary.id, diary.gmt_create.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", diary.context);
    match diary.image_paths() {
        Ok(paths) => {
            for path in paths {
                println!("  [image] {path}");
            }
        }
        Err(e) => tracing::warn!("Diary {} has unreadable images: {e}", diary.id),
    }
}

fn first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}
