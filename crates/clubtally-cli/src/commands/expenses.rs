use clubtally_core::db::{Database, ExpenseRepository, SqliteExpenseRepository};
use clubtally_core::models::NewExpense;

use crate::cli::ExpenseCommands;
use crate::commands::{format_cents, today};
use crate::error::CliError;

pub fn run(db: &Database, command: ExpenseCommands) -> Result<(), CliError> {
    match command {
        ExpenseCommands::Add {
            category,
            amount_cents,
            spent_on,
            note,
        } => {
            let conn = db.conn()?;
            let expense = SqliteExpenseRepository::new(&conn).create(&NewExpense {
                category,
                amount_cents,
                spent_on: spent_on.unwrap_or_else(today),
                note,
            })?;
            println!(
                "Recorded {} expense of {} (id {})",
                expense.category,
                format_cents(expense.amount_cents),
                expense.id
            );
            Ok(())
        }
        ExpenseCommands::List { limit, json } => {
            let conn = db.conn()?;
            let expenses = SqliteExpenseRepository::new(&conn).list(limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&expenses)?);
                return Ok(());
            }

            if expenses.is_empty() {
                println!("No expenses.");
                return Ok(());
            }
            for expense in expenses {
                println!(
                    "{:>5}  {}  {}  {}",
                    expense.id,
                    expense.spent_on,
                    expense.category,
                    format_cents(expense.amount_cents)
                );
            }
            Ok(())
        }
    }
}
