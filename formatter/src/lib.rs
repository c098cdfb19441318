//! FxView Currency Formatter
//!
//! The display-facing surface: converts amounts held in any currency into the
//! active UI language's currency and renders them with that locale's rules.
//! Formatting always produces a string; rate problems degrade to "no
//! conversion applied" and are visible only through [`FormatterStatus`].

pub mod config;
pub mod formatter;

pub use config::FormatterConfig;
pub use formatter::{CurrencyFormatter, FormatterStatus};
