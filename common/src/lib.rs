//! FxView Common Types
//!
//! Shared types used across the FxView crates: currency codes, monetary
//! amounts, rate tables and the injectable clock.

pub mod monetary;
pub mod rates;
pub mod error;
pub mod time;

pub use monetary::*;
pub use rates::*;
pub use error::*;
pub use time::*;
