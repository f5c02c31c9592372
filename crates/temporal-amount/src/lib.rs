//! # temporal-amount
//!
//! Parse and format compact time amounts such as `"1d2h30m"` or `"-3w"`.
//!
//! Callers choose which unit symbols exist, which units are rounded away
//! on output, and, for calendar amounts, which date-time months and years
//! are measured from. Parsing is exact: totals are held in `i128`
//! nanoseconds or as separate calendar fields, so large counts of coarse
//! units never wrap.
//!
//! ## Modules
//!
//! - [`unit`] — elementary time units and their fixed lengths
//! - [`tokenizer`] — lexical scan of `<digits><letters>` tokens
//! - [`amount`] — [`Elapsed`] and [`Period`] totals behind [`TemporalAmount`]
//! - [`parser`] — the configurable [`TemporalAmountParser`] and presets
//! - [`provider`] — reference date-time for calendar amounts
//! - [`config`] — JSON unit tables
//! - [`serde_utils`] — `#[serde(with)]` helpers
//! - [`error`] — Error types

pub mod amount;
pub mod config;
pub mod error;
mod format;
pub mod parser;
pub mod provider;
pub mod serde_utils;
pub mod tokenizer;
pub mod unit;

pub use amount::{Elapsed, Entry, Period, TemporalAmount};
pub use config::{UnitBinding, UnitTable};
pub use error::{ConfigError, Error, FormatError, ParseError, Result};
pub use parser::{DurationParser, PeriodParser, TemporalAmountParser};
pub use provider::DateTimeProvider;
pub use unit::{TimeUnit, UnknownTimeUnit};
