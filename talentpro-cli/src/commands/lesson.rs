//! Lesson command - lesson schedule

use anyhow::{Context, Result};
use clap::Subcommand;
use uuid::Uuid;

use super::get_context;
use crate::output;
use talentpro_core::Lesson;

#[derive(Subcommand)]
pub enum LessonCommands {
    /// List lessons by date and start time
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Schedule a lesson
    Add {
        #[arg(long)]
        title: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        start: Option<String>,
        /// HH:MM
        #[arg(long)]
        end: Option<String>,
        /// Acting, Dance, Vocal, ...
        #[arg(long = "type")]
        lesson_type: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        instructor: Option<String>,
    },
    /// Remove a lesson by id
    Remove { id: String },
}

pub fn run(command: LessonCommands) -> Result<()> {
    let ctx = get_context()?;
    let service = &ctx.schedule_service;

    match command {
        LessonCommands::List { json } => {
            let lessons = service.lessons()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&lessons)?);
                return Ok(());
            }
            if lessons.is_empty() {
                println!("No lessons scheduled.");
                return Ok(());
            }
            let mut table = output::create_table();
            table.set_header(vec!["Date", "Time", "Title", "Type", "Location", "Instructor", "ID"]);
            for l in lessons {
                table.add_row(vec![
                    l.date,
                    format!("{}-{}", l.start_time, l.end_time),
                    l.title,
                    l.lesson_type,
                    l.location,
                    l.instructor,
                    l.id.to_string(),
                ]);
            }
            println!("{}", table);
        }
        LessonCommands::Add {
            title,
            date,
            start,
            end,
            lesson_type,
            location,
            instructor,
        } => {
            let mut lesson = Lesson::new(Uuid::new_v4(), title.trim(), date.trim());
            lesson.start_time = start.unwrap_or_default();
            lesson.end_time = end.unwrap_or_default();
            lesson.lesson_type = lesson_type.unwrap_or_default();
            lesson.location = location.unwrap_or_default();
            lesson.instructor = instructor.unwrap_or_default();

            let lesson = service.add_lesson(lesson)?;
            output::success(&format!("Scheduled '{}' on {} ({})", lesson.title, lesson.date, lesson.id));
        }
        LessonCommands::Remove { id } => {
            let id = Uuid::parse_str(id.trim()).context("Invalid lesson id")?;
            if service.remove_lesson(id)? {
                output::success("Lesson removed");
            } else {
                output::warning(&format!("Lesson not found: {}", id));
            }
        }
    }

    Ok(())
}
