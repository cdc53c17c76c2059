//! Shared types, errors, and configuration for Tallybook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs and the per-call tenant context
//! - Money rounding policy and balance tolerance
//! - The error taxonomy and the uniform `OpResult` shape
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind, OpResult};
pub use types::TenantContext;
