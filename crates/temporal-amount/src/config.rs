//! Declarative unit tables, loadable from JSON.
//!
//! ```
//! use temporal_amount::{DurationParser, UnitTable};
//!
//! let table = UnitTable::from_json(r#"{
//!     "units": [
//!         { "symbol": "s", "unit": "seconds" },
//!         { "symbol": "m", "unit": "minutes" }
//!     ],
//!     "round_off": ["seconds"]
//! }"#).unwrap();
//! let parser: DurationParser = table.build().unwrap();
//! let amount = parser.parse("2m5s").unwrap();
//! assert_eq!(parser.format(&amount).unwrap(), "2m");
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::amount::TemporalAmount;
use crate::error::{Error, Result};
use crate::parser::TemporalAmountParser;
use crate::provider::DateTimeProvider;
use crate::unit::TimeUnit;

/// A single symbol registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitBinding {
    pub symbol: String,
    pub unit: TimeUnit,
}

/// Serializable description of a [`TemporalAmountParser`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitTable {
    /// Registrations, smallest unit first.
    pub units: Vec<UnitBinding>,
    pub round_off: Vec<TimeUnit>,
    /// Fixed reference for calendar amounts; the live clock when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<NaiveDateTime>,
}

impl UnitTable {
    /// # Errors
    ///
    /// Returns [`Error::InvalidTable`] if `json` is malformed, names an
    /// unknown unit, or has unexpected fields.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidTable(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::InvalidTable(e.to_string()))
    }

    /// Capture a parser's registry and rounding set. The provider is not
    /// serializable and is left out.
    pub fn from_parser<T: TemporalAmount>(parser: &TemporalAmountParser<T>) -> Self {
        Self {
            units: parser
                .units()
                .map(|(symbol, unit)| UnitBinding {
                    symbol: symbol.to_string(),
                    unit,
                })
                .collect(),
            round_off: parser.rounded_units().collect(),
            reference: None,
        }
    }

    /// Build a parser by replaying every registration through
    /// [`TemporalAmountParser::with_unit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] wrapping the first [`ConfigError`](crate::ConfigError) any
    /// registration produces.
    pub fn build<T: TemporalAmount>(&self) -> Result<TemporalAmountParser<T>> {
        let mut parser = TemporalAmountParser::<T>::new();
        for binding in &self.units {
            parser = parser.with_unit(binding.symbol.as_str(), binding.unit)?;
        }
        for &unit in &self.round_off {
            parser = parser.round_off(unit);
        }
        if let Some(reference) = self.reference {
            parser = parser.with_local_date_time_provider(DateTimeProvider::fixed(reference));
        }
        Ok(parser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigError, DurationParser, Period, PeriodParser};

    #[test]
    fn test_build_registers_in_order() {
        let table = UnitTable {
            units: vec![
                UnitBinding {
                    symbol: "h".to_string(),
                    unit: TimeUnit::Hours,
                },
                UnitBinding {
                    symbol: "d".to_string(),
                    unit: TimeUnit::Days,
                },
            ],
            ..Default::default()
        };
        let parser: DurationParser = table.build().unwrap();
        let symbols: Vec<&str> = parser.units().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["h", "d"]);
    }

    #[test]
    fn test_build_surfaces_duplicate_symbol() {
        let table = UnitTable::from_json(
            r#"{"units": [{"symbol": "d", "unit": "days"}, {"symbol": "d", "unit": "weeks"}]}"#,
        )
        .unwrap();
        let err = table.build::<crate::Elapsed>().unwrap_err();
        assert_eq!(
            err,
            Error::Config(ConfigError::DuplicateSymbol("d".to_string()))
        );
        assert_eq!(err.to_string(), "Symbol 'd' is already used");
    }

    #[test]
    fn test_from_json_rejects_unknown_unit() {
        let err = UnitTable::from_json(r#"{"units": [{"symbol": "f", "unit": "fortnights"}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid unit table"), "got: {err}");
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        assert!(UnitTable::from_json(r#"{"unitz": []}"#).is_err());
    }

    #[test]
    fn test_reference_fixes_provider() {
        let table = UnitTable::from_json(
            r#"{"units": [{"symbol": "d", "unit": "days"}, {"symbol": "mo", "unit": "months"}],
                "reference": "2026-03-01T00:00:00"}"#,
        )
        .unwrap();
        let parser: PeriodParser = table.build().unwrap();
        let amount = parser.parse("1mo").unwrap();
        assert_eq!(amount, Period::new(0, 1, 0));
        // March has 31 days: a 30-day month plus one.
        assert_eq!(parser.format(&amount).unwrap(), "1mo1d");
    }

    #[test]
    fn test_from_parser_round_trips_through_json() {
        let parser = DurationParser::time_units().round_off(TimeUnit::Nanos);
        let table = UnitTable::from_parser(&parser);
        let json = table.to_json().unwrap();
        let restored = UnitTable::from_json(&json).unwrap();
        assert_eq!(restored, table);

        let rebuilt: DurationParser = restored.build().unwrap();
        let amount = rebuilt.parse("1h5ns").unwrap();
        assert_eq!(rebuilt.format(&amount).unwrap(), "1h");
    }
}
