use clubtally_core::db::{Database, MemberRepository, SqliteMemberRepository};
use clubtally_core::models::NewMember;

use crate::cli::MemberCommands;
use crate::commands::today;
use crate::error::CliError;

pub fn run(db: &Database, command: MemberCommands) -> Result<(), CliError> {
    match command {
        MemberCommands::Add {
            name,
            email,
            phone,
            joined_on,
            notes,
        } => {
            let conn = db.conn()?;
            let repo = SqliteMemberRepository::new(&conn);
            let member = repo.create(&NewMember {
                name,
                email,
                phone,
                joined_on: joined_on.unwrap_or_else(today),
                notes,
            })?;
            println!("Added member {} (id {})", member.name, member.id);
            Ok(())
        }
        MemberCommands::List { json } => {
            let conn = db.conn()?;
            let members = SqliteMemberRepository::new(&conn).list()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&members)?);
                return Ok(());
            }

            if members.is_empty() {
                println!("No members.");
                return Ok(());
            }
            for member in members {
                let contact = member.email.as_deref().unwrap_or("-");
                println!(
                    "{:>5}  {}  joined {}  {}",
                    member.id, member.name, member.joined_on, contact
                );
            }
            Ok(())
        }
        MemberCommands::Remove { id } => {
            let conn = db.conn()?;
            let repo = SqliteMemberRepository::new(&conn);
            // Rows that never reached the remote can go entirely; anything
            // else is soft-deleted so the deletion syncs
            if repo.hard_delete_unsynced(id)? {
                println!("Removed member {id}");
            } else {
                repo.soft_delete(id)?;
                println!("Marked member {id} as deleted; removal will sync");
            }
            Ok(())
        }
    }
}
