//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate guard and repository calls into use-case level APIs.
//! - Keep the HTTP layer decoupled from storage details.

pub mod account_service;
pub mod post_service;
