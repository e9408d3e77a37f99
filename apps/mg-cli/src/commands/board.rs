// board.rs — Whole-board commands: ingest, show, clear, meeting edits.

use std::io::Read;

use clap::Subcommand;
use mg_goal::{BoardConfig, MeetingUpdate, SessionFile};

use super::{truncate, Board};

#[derive(Subcommand)]
pub enum MeetingCommands {
    /// Edit the meeting title, date or summary.
    Update {
        #[arg(long)]
        title: Option<String>,
        /// Meeting date as shown to readers (empty string clears it).
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        summary: Option<String>,
    },
}

pub fn execute(cmd: &MeetingCommands, config: &BoardConfig) -> anyhow::Result<()> {
    match cmd {
        MeetingCommands::Update {
            title,
            date,
            summary,
        } => update_meeting(config, title.clone(), date.clone(), summary.clone()),
    }
}

pub fn ingest(config: &BoardConfig, source: &str) -> anyhow::Result<()> {
    let body = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };

    // Parse before opening: a bad result must not touch the saved board.
    let result = mg_goal::parse_result_str(&body)?;
    let mut board = Board::open_fresh(config)?;
    board.store.ingest(result);
    board.save()?;

    let meeting = board
        .store
        .meeting()
        .ok_or(mg_goal::GoalError::NoMeetingLoaded)?;
    println!("Ingested meeting #{}: {}", meeting.id, meeting.title);
    println!("  Goals: {}", board.store.goals().len());

    let issues = board.store.integrity_issues();
    if !issues.is_empty() {
        println!();
        println!("Warning: the result has {} integrity issue(s):", issues.len());
        for issue in &issues {
            println!("  - {}", issue);
        }
    }

    Ok(())
}

pub fn show(config: &BoardConfig) -> anyhow::Result<()> {
    let board = Board::open(config)?;
    let Some(meeting) = board.store.meeting() else {
        println!("No board loaded. Run `mg ingest <file>` first.");
        return Ok(());
    };

    println!("Meeting #{}: {}", meeting.id, meeting.title);
    if let Some(ref date) = meeting.date {
        println!("Date:    {}", date);
    }
    if meeting.summary.is_empty() {
        println!("Summary: No summary available");
    } else {
        println!("Summary: {}", meeting.summary);
    }
    println!();

    let goals = board.store.goals();
    if goals.is_empty() {
        println!("No goals.");
        return Ok(());
    }

    println!(
        "{:<5} {:<32} {:<8} {:<24} {}",
        "ID", "NAME", "PRIORITY", "ASSIGNEES", "DEPENDS ON"
    );
    println!("{}", "-".repeat(90));

    for g in goals {
        let deps: Vec<String> = g
            .dependencies
            .iter()
            .map(|&dep| match board.store.goal(dep) {
                Some(d) => format!("#{} ({})", dep, truncate(&d.name, 15)),
                None => format!("#{}", dep),
            })
            .collect();
        println!(
            "{:<5} {:<32} {:<8} {:<24} {}",
            g.id,
            truncate(&g.name, 29),
            g.priority.to_string(),
            truncate(&g.assignees.join(", "), 21),
            if deps.is_empty() {
                "None".to_string()
            } else {
                deps.join(", ")
            },
        );
    }
    println!("\n{} goal(s) total.", goals.len());

    Ok(())
}

pub fn clear(config: &BoardConfig) -> anyhow::Result<()> {
    let session = SessionFile::new(&config.session_file);
    if session.clear()? {
        println!("Removed saved board: {}", session.path().display());
    } else {
        println!("No saved board.");
    }
    Ok(())
}

fn update_meeting(
    config: &BoardConfig,
    title: Option<String>,
    date: Option<String>,
    summary: Option<String>,
) -> anyhow::Result<()> {
    let mut board = Board::open(config)?;
    let update = MeetingUpdate {
        title,
        date: date.map(|d| if d.trim().is_empty() { None } else { Some(d) }),
        summary,
    };
    board.store.update_meeting(update)?;
    board.save()?;
    println!("Meeting updated.");
    Ok(())
}
