use clubtally_core::db::{Database, PaymentRepository, SqlitePaymentRepository};
use clubtally_core::models::NewPayment;

use crate::cli::PaymentCommands;
use crate::commands::{format_cents, today};
use crate::error::CliError;

pub fn run(db: &Database, command: PaymentCommands) -> Result<(), CliError> {
    match command {
        PaymentCommands::Add {
            member_id,
            amount_cents,
            method,
            paid_on,
            subscription_id,
            note,
        } => {
            let conn = db.conn()?;
            let payment = SqlitePaymentRepository::new(&conn).create(&NewPayment {
                member_id,
                subscription_id,
                amount_cents,
                method,
                paid_on: paid_on.unwrap_or_else(today),
                note,
            })?;
            println!(
                "Recorded payment of {} from member {} (id {})",
                format_cents(payment.amount_cents),
                payment.member_id,
                payment.id
            );
            Ok(())
        }
        PaymentCommands::List { limit, json } => {
            let conn = db.conn()?;
            let payments = SqlitePaymentRepository::new(&conn).list(limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&payments)?);
                return Ok(());
            }

            if payments.is_empty() {
                println!("No payments.");
                return Ok(());
            }
            for payment in payments {
                println!(
                    "{:>5}  {}  member {}  {}  {}",
                    payment.id,
                    payment.paid_on,
                    payment.member_id,
                    format_cents(payment.amount_cents),
                    payment.method
                );
            }
            Ok(())
        }
    }
}
