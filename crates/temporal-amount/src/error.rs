//! Error types for temporal-amount operations.

use thiserror::Error;

use crate::unit::TimeUnit;

/// A unit registration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Symbol '{0}' is already used")]
    DuplicateSymbol(String),

    #[error("Symbol '{0}' contains non-letter characters")]
    InvalidSymbol(String),

    #[error("Unit {unit} is not supported by {kind} amounts")]
    UnsupportedUnit { unit: TimeUnit, kind: &'static str },
}

/// An input string could not be turned into a temporal amount.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Minus sign is only allowed at the start of the input (found at position {position})")]
    MisplacedSign { position: usize },

    #[error("Missing number before unit '{0}'")]
    MissingMagnitude(String),

    #[error("Unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    #[error("Input is not in the format of <number><unit>: dangling '{0}'")]
    IncompleteToken(String),

    #[error("Unit {0} cannot be added to this amount")]
    UnsupportedUnit(TimeUnit),

    #[error("Amount overflows the representable range")]
    Overflow,
}

/// A temporal amount could not be rendered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Amount cannot be resolved against reference {reference}")]
    OutOfRange { reference: chrono::NaiveDateTime },
}

/// Any error produced by this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Invalid unit table: {0}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
