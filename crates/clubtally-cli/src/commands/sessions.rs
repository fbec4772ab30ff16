use clubtally_core::db::{ClassSessionRepository, Database, SqliteClassSessionRepository};
use clubtally_core::models::NewClassSession;
use clubtally_core::util::now_rfc3339;

use crate::cli::SessionCommands;
use crate::error::CliError;

pub fn run(db: &Database, command: SessionCommands) -> Result<(), CliError> {
    match command {
        SessionCommands::Add {
            title,
            scheduled_at,
            coach,
            capacity,
            note,
        } => {
            let conn = db.conn()?;
            let session = SqliteClassSessionRepository::new(&conn).create(&NewClassSession {
                title,
                coach,
                scheduled_at,
                capacity,
                note,
            })?;
            println!(
                "Scheduled '{}' at {} (id {})",
                session.title, session.scheduled_at, session.id
            );
            Ok(())
        }
        SessionCommands::List { limit, json } => {
            let conn = db.conn()?;
            let sessions =
                SqliteClassSessionRepository::new(&conn).list_from(&now_rfc3339(), limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }

            if sessions.is_empty() {
                println!("No upcoming sessions.");
                return Ok(());
            }
            for session in sessions {
                let coach = session.coach.as_deref().unwrap_or("-");
                println!(
                    "{:>5}  {}  {}  coach {}",
                    session.id, session.scheduled_at, session.title, coach
                );
            }
            Ok(())
        }
    }
}
