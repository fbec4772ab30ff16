//! Command implementations.

pub mod expenses;
pub mod members;
pub mod payments;
pub mod sessions;
pub mod sync;

/// Format an amount in cents as a decimal string, e.g. `5000` -> `50.00`.
pub fn format_cents(amount_cents: i64) -> String {
    let sign = if amount_cents < 0 { "-" } else { "" };
    let cents = amount_cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

/// Today's date as an ISO date string.
pub fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_cents_handles_signs_and_padding() {
        assert_eq!(format_cents(5000), "50.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-1234), "-12.34");
        assert_eq!(format_cents(0), "0.00");
    }

    #[test]
    fn today_is_an_iso_date() {
        let value = today();
        assert_eq!(value.len(), 10);
        assert_eq!(value.matches('-').count(), 2);
    }
}
