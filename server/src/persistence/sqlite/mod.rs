//! SQLite-backed settings repository.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and multiple concurrent readers.
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_site_settings.sql`
//!   when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Table
//!
//! `site_settings(id, setting_key UNIQUE, setting_type, setting_value, updated_at)`.
//! Only key uniqueness is enforced by the database. `setting_type` is free text
//! and is mapped back to a `DeclaredType` by the helpers in [`helpers`].
//!
//! [`SqliteSettingRepository`] implements
//! [`SettingRepository`](crate::persistence::SettingRepository) on top of the pool.

mod database;
pub(crate) mod helpers;
mod setting_repo;

pub use database::Database;
pub use setting_repo::SqliteSettingRepository;
