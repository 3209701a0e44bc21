//! REST API handlers

pub mod health;
pub mod payments;
pub mod public;
pub mod reconcile;
pub mod status;

pub use health::*;
pub use payments::*;
pub use public::*;
pub use reconcile::*;
pub use status::*;
