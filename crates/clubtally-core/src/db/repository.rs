//! Entity repositories over the local store.
//!
//! Every mutating statement bundles the `updated_at` rewrite and the
//! `sync_status = 'pending'` flip with the field write it belongs to, so an
//! interrupted process can never leave a row claiming `synced` while holding
//! unsynced field values.

use rusqlite::{params, Connection};

use crate::error::{Error, Result};
use crate::models::{
    ClassSession, Expense, Member, NewClassSession, NewExpense, NewMember, NewPackage, NewPayment,
    NewSubscription, Package, Payment, Subscription, SyncStatus,
};
use crate::util::now_rfc3339;

const MEMBER_COLUMNS: &str =
    "id, name, email, phone, joined_on, notes, created_at, updated_at, sync_status, deleted_at";
const PACKAGE_COLUMNS: &str =
    "id, name, price_cents, duration_days, description, created_at, updated_at, sync_status, deleted_at";
const SUBSCRIPTION_COLUMNS: &str =
    "id, member_id, package_id, starts_on, ends_on, status, created_at, updated_at, sync_status, deleted_at";
const PAYMENT_COLUMNS: &str =
    "id, member_id, subscription_id, amount_cents, method, paid_on, note, created_at, updated_at, sync_status, deleted_at";
const EXPENSE_COLUMNS: &str =
    "id, category, amount_cents, spent_on, note, created_at, updated_at, sync_status, deleted_at";
const CLASS_SESSION_COLUMNS: &str =
    "id, title, coach, scheduled_at, capacity, note, created_at, updated_at, sync_status, deleted_at";

/// Trait for member storage operations
pub trait MemberRepository {
    /// Create a new member
    fn create(&self, input: &NewMember) -> Result<Member>;

    /// Get a member by ID (excluding soft-deleted)
    fn get(&self, id: i64) -> Result<Option<Member>>;

    /// List members (excluding soft-deleted), ordered by name
    fn list(&self) -> Result<Vec<Member>>;

    /// Update a member's fields
    fn update(&self, id: i64, input: &NewMember) -> Result<Member>;

    /// Soft delete a member
    fn soft_delete(&self, id: i64) -> Result<()>;

    /// Hard delete a member that was never pushed to the remote store.
    ///
    /// Returns `false` (and leaves the row alone) when the row may already
    /// exist remotely; callers should fall back to `soft_delete`.
    fn hard_delete_unsynced(&self, id: i64) -> Result<bool>;
}

/// `SQLite` implementation of `MemberRepository`
pub struct SqliteMemberRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteMemberRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_member(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
        Ok(Member {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            joined_on: row.get(4)?,
            notes: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(8)?),
            deleted_at: row.get(9)?,
        })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create(&self, input: &NewMember) -> Result<Member> {
        if input.name.trim().is_empty() {
            return Err(Error::InvalidInput("member name must not be empty".into()));
        }

        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO members (name, email, phone, joined_on, notes, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.name,
                input.email,
                input.phone,
                input.joined_on,
                input.notes,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("members[{id}]")))
    }

    fn get(&self, id: i64) -> Result<Option<Member>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ? AND deleted_at IS NULL");
        let result = self
            .conn
            .query_row(&sql, params![id], Self::parse_member);

        match result {
            Ok(member) => Ok(Some(member)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<Member>> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE deleted_at IS NULL ORDER BY name COLLATE NOCASE"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let members = stmt
            .query_map([], Self::parse_member)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(members)
    }

    fn update(&self, id: i64, input: &NewMember) -> Result<Member> {
        let now = now_rfc3339();
        let rows = self.conn.execute(
            "UPDATE members
             SET name = ?, email = ?, phone = ?, joined_on = ?, notes = ?,
                 updated_at = ?, sync_status = 'pending'
             WHERE id = ? AND deleted_at IS NULL",
            params![
                input.name,
                input.email,
                input.phone,
                input.joined_on,
                input.notes,
                now,
                id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("members[{id}]")));
        }

        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("members[{id}]")))
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "members", id)
    }

    fn hard_delete_unsynced(&self, id: i64) -> Result<bool> {
        hard_delete_unsynced_row(self.conn, "members", id)
    }
}

/// Trait for package storage operations
pub trait PackageRepository {
    fn create(&self, input: &NewPackage) -> Result<Package>;
    fn get(&self, id: i64) -> Result<Option<Package>>;
    fn list(&self) -> Result<Vec<Package>>;
    fn soft_delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `PackageRepository`
pub struct SqlitePackageRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqlitePackageRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_package(row: &rusqlite::Row<'_>) -> rusqlite::Result<Package> {
        Ok(Package {
            id: row.get(0)?,
            name: row.get(1)?,
            price_cents: row.get(2)?,
            duration_days: row.get(3)?,
            description: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(7)?),
            deleted_at: row.get(8)?,
        })
    }
}

impl PackageRepository for SqlitePackageRepository<'_> {
    fn create(&self, input: &NewPackage) -> Result<Package> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO packages (name, price_cents, duration_days, description, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.name,
                input.price_cents,
                input.duration_days,
                input.description,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("packages[{id}]")))
    }

    fn get(&self, id: i64) -> Result<Option<Package>> {
        let sql =
            format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = ? AND deleted_at IS NULL");
        match self.conn.query_row(&sql, params![id], Self::parse_package) {
            Ok(package) => Ok(Some(package)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<Package>> {
        let sql = format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE deleted_at IS NULL ORDER BY name COLLATE NOCASE"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let packages = stmt
            .query_map([], Self::parse_package)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(packages)
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "packages", id)
    }
}

/// Trait for subscription storage operations
pub trait SubscriptionRepository {
    fn create(&self, input: &NewSubscription) -> Result<Subscription>;
    fn get(&self, id: i64) -> Result<Option<Subscription>>;
    fn list_for_member(&self, member_id: i64) -> Result<Vec<Subscription>>;
    fn set_status(&self, id: i64, status: &str) -> Result<Subscription>;
    fn soft_delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `SubscriptionRepository`
pub struct SqliteSubscriptionRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSubscriptionRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_subscription(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subscription> {
        Ok(Subscription {
            id: row.get(0)?,
            member_id: row.get(1)?,
            package_id: row.get(2)?,
            starts_on: row.get(3)?,
            ends_on: row.get(4)?,
            status: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(8)?),
            deleted_at: row.get(9)?,
        })
    }
}

impl SubscriptionRepository for SqliteSubscriptionRepository<'_> {
    fn create(&self, input: &NewSubscription) -> Result<Subscription> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO subscriptions (member_id, package_id, starts_on, ends_on, status, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.member_id,
                input.package_id,
                input.starts_on,
                input.ends_on,
                input.status,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("subscriptions[{id}]")))
    }

    fn get(&self, id: i64) -> Result<Option<Subscription>> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = ? AND deleted_at IS NULL"
        );
        match self
            .conn
            .query_row(&sql, params![id], Self::parse_subscription)
        {
            Ok(subscription) => Ok(Some(subscription)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_for_member(&self, member_id: i64) -> Result<Vec<Subscription>> {
        let sql = format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions
             WHERE member_id = ? AND deleted_at IS NULL
             ORDER BY starts_on DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let subscriptions = stmt
            .query_map(params![member_id], Self::parse_subscription)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(subscriptions)
    }

    fn set_status(&self, id: i64, status: &str) -> Result<Subscription> {
        let now = now_rfc3339();
        let rows = self.conn.execute(
            "UPDATE subscriptions
             SET status = ?, updated_at = ?, sync_status = 'pending'
             WHERE id = ? AND deleted_at IS NULL",
            params![status, now, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(format!("subscriptions[{id}]")));
        }

        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("subscriptions[{id}]")))
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "subscriptions", id)
    }
}

/// Trait for payment storage operations
pub trait PaymentRepository {
    fn create(&self, input: &NewPayment) -> Result<Payment>;
    fn get(&self, id: i64) -> Result<Option<Payment>>;
    /// List payments (excluding soft-deleted), most recent first
    fn list(&self, limit: usize) -> Result<Vec<Payment>>;
    fn soft_delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `PaymentRepository`
pub struct SqlitePaymentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqlitePaymentRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_payment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Payment> {
        Ok(Payment {
            id: row.get(0)?,
            member_id: row.get(1)?,
            subscription_id: row.get(2)?,
            amount_cents: row.get(3)?,
            method: row.get(4)?,
            paid_on: row.get(5)?,
            note: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(9)?),
            deleted_at: row.get(10)?,
        })
    }
}

impl PaymentRepository for SqlitePaymentRepository<'_> {
    fn create(&self, input: &NewPayment) -> Result<Payment> {
        if input.amount_cents <= 0 {
            return Err(Error::InvalidInput(
                "payment amount must be positive".into(),
            ));
        }

        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO payments (member_id, subscription_id, amount_cents, method, paid_on, note, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.member_id,
                input.subscription_id,
                input.amount_cents,
                input.method,
                input.paid_on,
                input.note,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .ok_or_else(|| Error::NotFound(format!("payments[{id}]")))
    }

    fn get(&self, id: i64) -> Result<Option<Payment>> {
        let sql =
            format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ? AND deleted_at IS NULL");
        match self.conn.query_row(&sql, params![id], Self::parse_payment) {
            Ok(payment) => Ok(Some(payment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, limit: usize) -> Result<Vec<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments
             WHERE deleted_at IS NULL
             ORDER BY paid_on DESC, id DESC
             LIMIT ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        #[allow(clippy::cast_possible_wrap)]
        let payments = stmt
            .query_map(params![limit as i64], Self::parse_payment)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(payments)
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "payments", id)
    }
}

/// Trait for expense storage operations
pub trait ExpenseRepository {
    fn create(&self, input: &NewExpense) -> Result<Expense>;
    fn list(&self, limit: usize) -> Result<Vec<Expense>>;
    fn soft_delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `ExpenseRepository`
pub struct SqliteExpenseRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteExpenseRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_expense(row: &rusqlite::Row<'_>) -> rusqlite::Result<Expense> {
        Ok(Expense {
            id: row.get(0)?,
            category: row.get(1)?,
            amount_cents: row.get(2)?,
            spent_on: row.get(3)?,
            note: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(7)?),
            deleted_at: row.get(8)?,
        })
    }
}

impl ExpenseRepository for SqliteExpenseRepository<'_> {
    fn create(&self, input: &NewExpense) -> Result<Expense> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO expenses (category, amount_cents, spent_on, note, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.category,
                input.amount_cents,
                input.spent_on,
                input.note,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        let sql =
            format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ? AND deleted_at IS NULL");
        self.conn
            .query_row(&sql, params![id], Self::parse_expense)
            .map_err(Into::into)
    }

    fn list(&self, limit: usize) -> Result<Vec<Expense>> {
        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses
             WHERE deleted_at IS NULL
             ORDER BY spent_on DESC, id DESC
             LIMIT ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        #[allow(clippy::cast_possible_wrap)]
        let expenses = stmt
            .query_map(params![limit as i64], Self::parse_expense)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(expenses)
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "expenses", id)
    }
}

/// Trait for class session storage operations
pub trait ClassSessionRepository {
    fn create(&self, input: &NewClassSession) -> Result<ClassSession>;
    /// List sessions scheduled at or after the given timestamp, soonest first
    fn list_from(&self, from: &str, limit: usize) -> Result<Vec<ClassSession>>;
    fn soft_delete(&self, id: i64) -> Result<()>;
}

/// `SQLite` implementation of `ClassSessionRepository`
pub struct SqliteClassSessionRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteClassSessionRepository<'a> {
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn parse_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<ClassSession> {
        Ok(ClassSession {
            id: row.get(0)?,
            title: row.get(1)?,
            coach: row.get(2)?,
            scheduled_at: row.get(3)?,
            capacity: row.get(4)?,
            note: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
            sync_status: SyncStatus::parse(&row.get::<_, String>(8)?),
            deleted_at: row.get(9)?,
        })
    }
}

impl ClassSessionRepository for SqliteClassSessionRepository<'_> {
    fn create(&self, input: &NewClassSession) -> Result<ClassSession> {
        let now = now_rfc3339();
        self.conn.execute(
            "INSERT INTO class_sessions (title, coach, scheduled_at, capacity, note, created_at, updated_at, sync_status)
             VALUES (?, ?, ?, ?, ?, ?, ?, 'pending')",
            params![
                input.title,
                input.coach,
                input.scheduled_at,
                input.capacity,
                input.note,
                now,
                now
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        let sql = format!(
            "SELECT {CLASS_SESSION_COLUMNS} FROM class_sessions WHERE id = ? AND deleted_at IS NULL"
        );
        self.conn
            .query_row(&sql, params![id], Self::parse_session)
            .map_err(Into::into)
    }

    fn list_from(&self, from: &str, limit: usize) -> Result<Vec<ClassSession>> {
        let sql = format!(
            "SELECT {CLASS_SESSION_COLUMNS} FROM class_sessions
             WHERE scheduled_at >= ? AND deleted_at IS NULL
             ORDER BY scheduled_at ASC
             LIMIT ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        #[allow(clippy::cast_possible_wrap)]
        let sessions = stmt
            .query_map(params![from, limit as i64], Self::parse_session)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sessions)
    }

    fn soft_delete(&self, id: i64) -> Result<()> {
        soft_delete_row(self.conn, "class_sessions", id)
    }
}

/// Soft-delete a row: set `deleted_at`, rewrite `updated_at`, flip `pending`.
///
/// The table name is always one of the fixed schema tables, never user input.
fn soft_delete_row(conn: &Connection, table: &str, id: i64) -> Result<()> {
    let now = now_rfc3339();
    let sql = format!(
        "UPDATE {table}
         SET deleted_at = ?, updated_at = ?, sync_status = 'pending'
         WHERE id = ? AND deleted_at IS NULL"
    );
    let rows = conn.execute(&sql, params![now, now, id])?;

    if rows == 0 {
        return Err(Error::NotFound(format!("{table}[{id}]")));
    }

    Ok(())
}

/// Hard-delete a row only when it provably never reached the remote store:
/// still `pending` and never mutated since creation.
fn hard_delete_unsynced_row(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!(
        "DELETE FROM {table}
         WHERE id = ? AND sync_status = 'pending' AND created_at = updated_at"
    );
    let rows = conn.execute(&sql, params![id])?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_member() -> NewMember {
        NewMember {
            name: "Ada Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
            joined_on: "2026-01-15".to_string(),
            ..NewMember::default()
        }
    }

    #[test]
    fn test_create_member_starts_pending() {
        let db = setup();
        let conn = db.conn().unwrap();
        let repo = SqliteMemberRepository::new(&conn);

        let member = repo.create(&sample_member()).unwrap();
        assert_eq!(member.sync_status, SyncStatus::Pending);
        assert_eq!(member.created_at, member.updated_at);
        assert!(member.deleted_at.is_none());
    }

    #[test]
    fn test_create_member_rejects_empty_name() {
        let db = setup();
        let conn = db.conn().unwrap();
        let repo = SqliteMemberRepository::new(&conn);

        let result = repo.create(&NewMember {
            name: "   ".to_string(),
            ..NewMember::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_update_member_advances_timestamp_and_flips_pending() {
        let db = setup();
        let conn = db.conn().unwrap();
        let repo = SqliteMemberRepository::new(&conn);

        let member = repo.create(&sample_member()).unwrap();

        // Simulate a synced row so the pending flip is observable
        conn.execute(
            "UPDATE members SET sync_status = 'synced' WHERE id = ?",
            params![member.id],
        )
        .unwrap();

        let mut input = sample_member();
        input.phone = Some("555-0100".to_string());
        let updated = repo.update(member.id, &input).unwrap();

        assert_eq!(updated.sync_status, SyncStatus::Pending);
        assert!(updated.updated_at >= member.updated_at);
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_soft_delete_flips_pending_and_hides_row() {
        let db = setup();
        let conn = db.conn().unwrap();
        let repo = SqliteMemberRepository::new(&conn);

        let member = repo.create(&sample_member()).unwrap();
        conn.execute(
            "UPDATE members SET sync_status = 'synced' WHERE id = ?",
            params![member.id],
        )
        .unwrap();

        repo.soft_delete(member.id).unwrap();

        assert!(repo.get(member.id).unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());

        let (status, deleted_at): (String, Option<String>) = conn
            .query_row(
                "SELECT sync_status, deleted_at FROM members WHERE id = ?",
                params![member.id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(status, "pending");
        assert!(deleted_at.is_some());
    }

    #[test]
    fn test_hard_delete_only_for_never_synced_rows() {
        let db = setup();
        let conn = db.conn().unwrap();
        let repo = SqliteMemberRepository::new(&conn);

        let fresh = repo.create(&sample_member()).unwrap();
        assert!(repo.hard_delete_unsynced(fresh.id).unwrap());

        let synced = repo.create(&sample_member()).unwrap();
        conn.execute(
            "UPDATE members SET sync_status = 'synced' WHERE id = ?",
            params![synced.id],
        )
        .unwrap();
        assert!(!repo.hard_delete_unsynced(synced.id).unwrap());
        assert!(repo.get(synced.id).unwrap().is_some());
    }

    #[test]
    fn test_subscription_lifecycle() {
        let db = setup();
        let conn = db.conn().unwrap();

        let member = SqliteMemberRepository::new(&conn)
            .create(&sample_member())
            .unwrap();
        let package = SqlitePackageRepository::new(&conn)
            .create(&NewPackage {
                name: "Monthly".to_string(),
                price_cents: 5000,
                duration_days: 30,
                description: None,
            })
            .unwrap();

        let repo = SqliteSubscriptionRepository::new(&conn);
        let subscription = repo
            .create(&NewSubscription {
                member_id: member.id,
                package_id: package.id,
                starts_on: "2026-02-01".to_string(),
                ends_on: "2026-03-01".to_string(),
                status: "active".to_string(),
            })
            .unwrap();

        let updated = repo.set_status(subscription.id, "expired").unwrap();
        assert_eq!(updated.status, "expired");
        assert_eq!(updated.sync_status, SyncStatus::Pending);

        let listed = repo.list_for_member(member.id).unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn test_payment_requires_positive_amount() {
        let db = setup();
        let conn = db.conn().unwrap();

        let member = SqliteMemberRepository::new(&conn)
            .create(&sample_member())
            .unwrap();
        let repo = SqlitePaymentRepository::new(&conn);

        let result = repo.create(&NewPayment {
            member_id: member.id,
            amount_cents: 0,
            method: "cash".to_string(),
            paid_on: "2026-02-01".to_string(),
            ..NewPayment::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_payments_listed_most_recent_first() {
        let db = setup();
        let conn = db.conn().unwrap();

        let member = SqliteMemberRepository::new(&conn)
            .create(&sample_member())
            .unwrap();
        let repo = SqlitePaymentRepository::new(&conn);

        for paid_on in ["2026-01-01", "2026-03-01", "2026-02-01"] {
            repo.create(&NewPayment {
                member_id: member.id,
                amount_cents: 5000,
                method: "cash".to_string(),
                paid_on: paid_on.to_string(),
                ..NewPayment::default()
            })
            .unwrap();
        }

        let payments = repo.list(10).unwrap();
        assert_eq!(payments.len(), 3);
        assert_eq!(payments[0].paid_on, "2026-03-01");
        assert_eq!(payments[2].paid_on, "2026-01-01");
    }

    #[test]
    fn test_expense_and_session_round_trip() {
        let db = setup();
        let conn = db.conn().unwrap();

        let expense = SqliteExpenseRepository::new(&conn)
            .create(&NewExpense {
                category: "equipment".to_string(),
                amount_cents: 12900,
                spent_on: "2026-02-10".to_string(),
                note: Some("new kettlebells".to_string()),
            })
            .unwrap();
        assert_eq!(expense.sync_status, SyncStatus::Pending);

        let session = SqliteClassSessionRepository::new(&conn)
            .create(&NewClassSession {
                title: "Morning HIIT".to_string(),
                coach: Some("Sam".to_string()),
                scheduled_at: "2026-02-20T07:00:00.000Z".to_string(),
                capacity: 12,
                note: None,
            })
            .unwrap();

        let upcoming = SqliteClassSessionRepository::new(&conn)
            .list_from("2026-02-01T00:00:00.000Z", 10)
            .unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, session.id);
    }
}
