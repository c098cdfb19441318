//! FxView locale profiles
//!
//! Maps a UI language code to the currency and the number, date and time
//! conventions used to display amounts in that language. Everything here is
//! pure: no I/O, no failure modes.

pub mod number;
pub mod profile;
pub mod registry;

pub use number::{NumberFormat, SymbolPlacement};
pub use profile::{LocaleProfile, ENGLISH, PORTUGUESE, SPANISH};
pub use registry::LocaleRegistry;
