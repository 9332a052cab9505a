//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types and own their transaction boundaries.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are never exposed to the domain layer.
//! - **Startup schema**: `ensure_schema` creates the tables idempotently
//!   before the server starts.
//!
//! # Example
//!
//! ```ignore
//! use fitpass::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, ensure_schema};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/fitpass")).await?;
//! ensure_schema(&pool).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_profile_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;
mod schema_bootstrap;
mod transaction;

pub use diesel_profile_repository::DieselProfileRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use schema_bootstrap::{SCHEMA_STATEMENTS, SchemaError, ensure_schema};
