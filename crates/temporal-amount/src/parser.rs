//! Configurable parser and formatter for compact amount expressions.
//!
//! A [`TemporalAmountParser`] holds a unit registry (symbol → [`TimeUnit`]
//! in registration order), a set of units to round off when formatting,
//! and a [`DateTimeProvider`] for calendar-relative amounts. It is an
//! immutable value: every builder method returns a new parser and leaves
//! the receiver untouched, so one instance can be shared freely across
//! threads.
//!
//! # Example
//!
//! ```
//! use temporal_amount::{DurationParser, Elapsed};
//!
//! let parser = DurationParser::date_time_units();
//! let amount = parser.parse("1d2h30m").unwrap();
//! assert_eq!(amount, Elapsed::from_secs(95_400));
//! assert_eq!(parser.format(&amount).unwrap(), "1d2h30m");
//! ```

use std::collections::BTreeSet;
use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::amount::{Elapsed, Entry, Period, TemporalAmount};
use crate::error::{ConfigError, FormatError, ParseError, Result as CrateResult};
use crate::format::decompose;
use crate::provider::DateTimeProvider;
use crate::tokenizer::{Lexeme, Tokenizer};
use crate::unit::TimeUnit;

/// Parser producing fixed [`Elapsed`] durations.
pub type DurationParser = TemporalAmountParser<Elapsed>;

/// Parser producing calendar-relative [`Period`]s.
pub type PeriodParser = TemporalAmountParser<Period>;

/// Immutable parse/format configuration for amounts of kind `T`.
#[derive(Debug, Clone)]
pub struct TemporalAmountParser<T> {
    units: Vec<(String, TimeUnit)>,
    rounded: BTreeSet<TimeUnit>,
    provider: DateTimeProvider,
    kind: PhantomData<fn() -> T>,
}

impl<T: TemporalAmount> Default for TemporalAmountParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemporalAmount> TemporalAmountParser<T> {
    /// An empty registry reading the live local clock.
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            rounded: BTreeSet::new(),
            provider: DateTimeProvider::now(),
            kind: PhantomData,
        }
    }

    // Preset tables are valid by construction.
    fn from_symbols(symbols: &[(&str, TimeUnit)]) -> Self {
        let mut parser = Self::new();
        parser.units = symbols
            .iter()
            .map(|&(symbol, unit)| (symbol.to_string(), unit))
            .collect();
        parser
    }

    // ── Builders ────────────────────────────────────────────────────────

    /// Register `symbol` for `unit`, after every existing registration.
    ///
    /// Register from smallest to largest unit: formatting walks the
    /// registry backwards, so that order yields largest-first output.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateSymbol`] if `symbol` is already registered.
    /// - [`ConfigError::InvalidSymbol`] if `symbol` is empty or contains a
    ///   non-alphabetic character (digits and `-` belong to the grammar).
    /// - [`ConfigError::UnsupportedUnit`] if `T` cannot hold `unit`.
    pub fn with_unit(
        &self,
        symbol: impl Into<String>,
        unit: TimeUnit,
    ) -> Result<Self, ConfigError> {
        let symbol = symbol.into();
        if self.unit_for(&symbol).is_some() {
            return Err(ConfigError::DuplicateSymbol(symbol));
        }
        if symbol.is_empty() || !symbol.chars().all(char::is_alphabetic) {
            return Err(ConfigError::InvalidSymbol(symbol));
        }
        if !T::supports(unit) {
            return Err(ConfigError::UnsupportedUnit {
                unit,
                kind: T::KIND,
            });
        }

        let mut next = self.clone();
        next.units.push((symbol, unit));
        Ok(next)
    }

    /// Leave `unit` out of formatted output.
    pub fn round_off(&self, unit: TimeUnit) -> Self {
        let mut next = self.clone();
        next.rounded.insert(unit);
        next
    }

    /// Use `provider` as the reference for calendar-relative amounts.
    pub fn with_local_date_time_provider(&self, provider: DateTimeProvider) -> Self {
        Self {
            provider,
            ..self.clone()
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// Registered `(symbol, unit)` pairs in registration order.
    pub fn units(&self) -> impl DoubleEndedIterator<Item = (&str, TimeUnit)> + '_ {
        self.units
            .iter()
            .map(|(symbol, unit)| (symbol.as_str(), *unit))
    }

    pub fn rounded_units(&self) -> impl Iterator<Item = TimeUnit> + '_ {
        self.rounded.iter().copied()
    }

    pub fn unit_for(&self, symbol: &str) -> Option<TimeUnit> {
        self.units
            .iter()
            .find(|(registered, _)| registered == symbol)
            .map(|(_, unit)| *unit)
    }

    pub fn provider(&self) -> &DateTimeProvider {
        &self.provider
    }

    // ── Parse / format ──────────────────────────────────────────────────

    /// Parse an expression such as `"1d2h30m"` or `"-3w"`.
    ///
    /// A leading `-` negates the whole expression. Repeated units add up
    /// (`"1h1h"` is two hours).
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered scanning left to right.
    /// No partial amount is ever returned.
    pub fn parse(&self, input: &str) -> Result<T, ParseError> {
        let mut tokens = Tokenizer::new(input)?;

        let mut total = T::zero();
        for lexeme in tokens.by_ref() {
            let entry = self.resolve(lexeme?)?;
            trace!(magnitude = entry.magnitude, unit = %entry.unit, "fold entry");
            total = total.plus(entry)?;
        }

        if tokens.is_negative() {
            total = total.negate()?;
        }

        debug!(input, kind = T::KIND, "parsed temporal amount");
        Ok(total)
    }

    fn resolve(&self, lexeme: Lexeme<'_>) -> Result<Entry, ParseError> {
        if lexeme.digits.is_empty() {
            return Err(ParseError::MissingMagnitude(lexeme.symbol.to_string()));
        }
        let unit = self
            .unit_for(lexeme.symbol)
            .ok_or_else(|| ParseError::UnknownUnit(lexeme.symbol.to_string()))?;
        let magnitude = lexeme
            .digits
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidNumber(lexeme.digits.to_string()))?;
        Ok(Entry { magnitude, unit })
    }

    /// Render `amount` in canonical compact form, largest unit first.
    ///
    /// Calendar-relative amounts are measured from the configured
    /// provider's date-time, read once per call.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::OutOfRange`] if a calendar-relative amount
    /// cannot be applied to the reference date-time.
    pub fn format(&self, amount: &T) -> Result<String, FormatError> {
        let nanos = amount.to_nanos(&self.provider)?;
        let formatted = decompose(nanos, self.units(), &self.rounded);
        debug!(%nanos, formatted = formatted.as_str(), "formatted temporal amount");
        Ok(formatted)
    }

    /// Parse `input` and render it back in canonical form (`"90m"` becomes
    /// `"1h30m"`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) or
    /// [`Error::Format`](crate::Error::Format).
    pub fn normalize(&self, input: &str) -> CrateResult<String> {
        let amount = self.parse(input)?;
        Ok(self.format(&amount)?)
    }
}

// ── Presets ─────────────────────────────────────────────────────────────────

impl TemporalAmountParser<Elapsed> {
    /// `ns us ms s m h d w mo y dec`: every unit from nanoseconds to decades.
    pub fn date_time_units() -> Self {
        Self::from_symbols(&[
            ("ns", TimeUnit::Nanos),
            ("us", TimeUnit::Micros),
            ("ms", TimeUnit::Millis),
            ("s", TimeUnit::Seconds),
            ("m", TimeUnit::Minutes),
            ("h", TimeUnit::Hours),
            ("d", TimeUnit::Days),
            ("w", TimeUnit::Weeks),
            ("mo", TimeUnit::Months),
            ("y", TimeUnit::Years),
            ("dec", TimeUnit::Decades),
        ])
    }

    /// `ns us ms s m h d`: clock units up to a day.
    pub fn time_units() -> Self {
        Self::from_symbols(&[
            ("ns", TimeUnit::Nanos),
            ("us", TimeUnit::Micros),
            ("ms", TimeUnit::Millis),
            ("s", TimeUnit::Seconds),
            ("m", TimeUnit::Minutes),
            ("h", TimeUnit::Hours),
            ("d", TimeUnit::Days),
        ])
    }
}

impl TemporalAmountParser<Period> {
    /// `d w mo y dec`: calendar units.
    pub fn date_units() -> Self {
        Self::from_symbols(&[
            ("d", TimeUnit::Days),
            ("w", TimeUnit::Weeks),
            ("mo", TimeUnit::Months),
            ("y", TimeUnit::Years),
            ("dec", TimeUnit::Decades),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dhm() -> DurationParser {
        DurationParser::new()
            .with_unit("m", TimeUnit::Minutes)
            .unwrap()
            .with_unit("h", TimeUnit::Hours)
            .unwrap()
            .with_unit("d", TimeUnit::Days)
            .unwrap()
            .with_unit("w", TimeUnit::Weeks)
            .unwrap()
    }

    fn jan_first() -> DateTimeProvider {
        DateTimeProvider::start_of(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    // ── Builder tests ───────────────────────────────────────────────────

    #[test]
    fn test_with_unit_appends_in_order() {
        let parser = dhm();
        let symbols: Vec<&str> = parser.units().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["m", "h", "d", "w"]);
    }

    #[test]
    fn test_with_unit_rejects_duplicate() {
        let base = DurationParser::new();
        let first = base.with_unit("d", TimeUnit::Days).unwrap();
        let err = first.with_unit("d", TimeUnit::Days).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateSymbol("d".to_string()));
        // The rejected call leaves the first parser usable.
        assert_eq!(first.parse("2d").unwrap(), Elapsed::from_days(2));
    }

    #[test]
    fn test_with_unit_rejects_non_letters() {
        for symbol in ["d2", "-d", "m s", "", "_"] {
            let err = DurationParser::new()
                .with_unit(symbol, TimeUnit::Days)
                .unwrap_err();
            assert_eq!(err, ConfigError::InvalidSymbol(symbol.to_string()));
        }
    }

    #[test]
    fn test_with_unit_rejects_sub_day_units_for_periods() {
        let err = PeriodParser::new()
            .with_unit("h", TimeUnit::Hours)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedUnit {
                unit: TimeUnit::Hours,
                ..
            }
        ));
        assert!(err.to_string().contains("calendar"), "got: {err}");
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base = dhm();
        let _rounded = base.round_off(TimeUnit::Minutes);
        let _extended = base.with_unit("s", TimeUnit::Seconds).unwrap();
        assert_eq!(base.rounded_units().count(), 0);
        assert_eq!(base.unit_for("s"), None);
        assert!(matches!(base.parse("5s"), Err(ParseError::UnknownUnit(_))));
    }

    #[test]
    fn test_round_off_is_idempotent_and_survives_with_unit() {
        let parser = dhm()
            .round_off(TimeUnit::Minutes)
            .round_off(TimeUnit::Minutes)
            .with_unit("s", TimeUnit::Seconds)
            .unwrap();
        assert_eq!(parser.rounded_units().collect::<Vec<_>>(), vec![TimeUnit::Minutes]);
        let amount = parser.parse("1h30m").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1h");
    }

    #[test]
    fn test_provider_replacement_keeps_registry() {
        let parser = PeriodParser::date_units().with_local_date_time_provider(jan_first());
        assert_eq!(parser.units().count(), 5);
        assert_eq!(
            parser.provider().get(),
            NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    // ── Parse tests ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_compound() {
        assert_eq!(dhm().parse("1d2h30m").unwrap(), Elapsed::from_secs(95_400));
    }

    #[test]
    fn test_parse_negative_applies_to_whole_expression() {
        assert_eq!(dhm().parse("-90m").unwrap(), Elapsed::from_minutes(-90));
        assert_eq!(dhm().parse("-1h30m").unwrap(), Elapsed::from_minutes(-90));
    }

    #[test]
    fn test_parse_repeated_units_accumulate() {
        assert_eq!(dhm().parse("1h1h").unwrap(), Elapsed::from_hours(2));
    }

    #[test]
    fn test_parse_unknown_unit() {
        let err = dhm().parse("5x").unwrap_err();
        assert_eq!(err, ParseError::UnknownUnit("x".to_string()));
        assert!(err.to_string().contains("'x'"), "got: {err}");
    }

    #[test]
    fn test_parse_missing_magnitude() {
        assert_eq!(
            dhm().parse("h30m"),
            Err(ParseError::MissingMagnitude("h".to_string()))
        );
    }

    #[test]
    fn test_parse_number_too_large_for_u64() {
        assert_eq!(
            dhm().parse("99999999999999999999m"),
            Err(ParseError::InvalidNumber("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn test_parse_dangling_number() {
        assert_eq!(
            dhm().parse("1h30"),
            Err(ParseError::IncompleteToken("30".to_string()))
        );
    }

    #[test]
    fn test_parse_multi_letter_symbols() {
        let parser = DurationParser::date_time_units();
        assert_eq!(parser.parse("1mo").unwrap(), Elapsed::from_days(30));
        assert_eq!(
            parser.parse("1m500ms").unwrap(),
            Elapsed::from_nanos(60_500_000_000)
        );
    }

    #[test]
    fn test_parse_large_decades() {
        let parser = DurationParser::date_time_units();
        let amount = parser.parse("1000000000dec").unwrap();
        assert_eq!(
            amount.as_nanos(),
            1_000_000_000 * TimeUnit::Decades.nanos() as i128
        );
        assert_eq!(parser.format(&amount).unwrap(), "1000000000dec");
    }

    #[test]
    fn test_parse_period() {
        let parser = PeriodParser::date_units();
        assert_eq!(parser.parse("1y2mo3w4d").unwrap(), Period::new(1, 2, 25));
        assert_eq!(parser.parse("-1dec").unwrap(), Period::new(-10, 0, 0));
    }

    // ── Format tests ────────────────────────────────────────────────────

    #[test]
    fn test_normalize_canonicalizes() {
        assert_eq!(dhm().normalize("90m").unwrap(), "1h30m");
        assert_eq!(dhm().normalize("-1d24h").unwrap(), "-2d");
    }

    #[test]
    fn test_normalize_wraps_parse_error() {
        assert_eq!(
            dhm().normalize("5x"),
            Err(crate::Error::Parse(ParseError::UnknownUnit("x".to_string())))
        );
    }

    #[test]
    fn test_normalize_wraps_format_error() {
        let parser = PeriodParser::date_units().with_local_date_time_provider(
            DateTimeProvider::fixed(chrono::NaiveDateTime::MAX),
        );
        let err = parser.normalize("1y").unwrap_err();
        assert!(
            matches!(err, crate::Error::Format(FormatError::OutOfRange { .. })),
            "got: {err}"
        );
    }

    #[test]
    fn test_format_round_trip() {
        let parser = dhm();
        let amount = parser.parse("1d2h30m").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1d2h30m");
    }

    #[test]
    fn test_format_normalizes() {
        let parser = dhm();
        let amount = parser.parse("90m").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1h30m");
        let amount = parser.parse("8d").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1w1d");
    }

    #[test]
    fn test_format_negative() {
        let parser = dhm();
        let amount = parser.parse("-3w").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "-3w");
    }

    #[test]
    fn test_format_zero_is_empty() {
        assert_eq!(dhm().format(&Elapsed::ZERO).unwrap(), "");
    }

    #[test]
    fn test_format_period_uses_reference() {
        let parser = PeriodParser::date_units().with_local_date_time_provider(jan_first());
        // January has 31 days: one 30-day month plus a day.
        let amount = parser.parse("1mo").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1mo1d");
        // 2026 is not a leap year.
        let amount = parser.parse("1y").unwrap();
        assert_eq!(parser.format(&amount).unwrap(), "1y");
    }

    #[test]
    fn test_period_order_independent_against_fixed_reference() {
        let parser = PeriodParser::date_units().with_local_date_time_provider(
            DateTimeProvider::start_of(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()),
        );
        let a = parser.parse("1y1mo").unwrap();
        let b = parser.parse("1mo1y").unwrap();
        assert_eq!(a, b);
        assert_eq!(parser.format(&a).unwrap(), parser.format(&b).unwrap());
    }
}
