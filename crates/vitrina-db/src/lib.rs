//! Vitrina DB - Persistence layer
//!
//! SQLx-backed repositories for subscribers, the payment ledger, and
//! staged notifications.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitrina_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/vitrina").await?;
//! let repos = Repositories::new(pool);
//!
//! // Use repositories
//! let subscriber = repos.subscribers.find_by_id(id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
