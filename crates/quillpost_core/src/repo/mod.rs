//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/authorization orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, constraint
//!   violations) in addition to DB transport errors.
//! - Mutations that read before writing do so inside one transaction.

pub mod error;
pub mod post_repo;
mod schema_check;
pub mod user_repo;

pub use error::{RepoError, RepoResult};
