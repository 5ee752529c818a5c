//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx over SQLite.
//! It follows the Repository pattern: each entity (users, lists, movies)
//! has a repository in [`handlers`] encapsulating all queries for its
//! table, with record types in [`models`] and error normalization in
//! [`errors`].
//!
//! Repositories borrow a `SqliteConnection`; acquire one from the pool
//! (read paths) or open a transaction (multi-statement writes such as
//! registration and list deletion) and pass it in:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let mut users = Users::new(&mut tx);
//! // ... operations ...
//! tx.commit().await?;
//! ```
//!
//! Migrations live in `migrations/` and are applied on startup via
//! [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
