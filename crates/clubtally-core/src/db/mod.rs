//! Database layer: connection management, migrations, and repositories

mod connection;
mod meta_repository;
pub mod migrations;
mod repository;

pub use connection::Database;
pub use meta_repository::{MetaRepository, SqliteMetaRepository};
pub use repository::{
    ClassSessionRepository, ExpenseRepository, MemberRepository, PackageRepository,
    PaymentRepository, SqliteClassSessionRepository, SqliteExpenseRepository,
    SqliteMemberRepository, SqlitePackageRepository, SqlitePaymentRepository,
    SqliteSubscriptionRepository, SubscriptionRepository,
};
