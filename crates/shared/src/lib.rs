//! Shared types, errors, and configuration for Kivela.
//!
//! This crate provides common types used across all other crates:
//! - Money type with fixed-point precision
//! - Typed IDs for type-safe entity references
//! - Application-wide error taxonomy
//! - JWT claims and token handling
//! - Configuration management

pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::{AppConfig, LedgerConfig};
pub use error::{AppError, AppResult};
pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
