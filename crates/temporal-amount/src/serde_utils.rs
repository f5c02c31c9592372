//! `#[serde(with = "...")]` helpers for compact-string fields.

/// (De)serialize an [`Elapsed`](crate::Elapsed) as a compact string using
/// [`DurationParser::date_time_units`](crate::DurationParser::date_time_units).
///
/// Deserialization also accepts an integer number of milliseconds.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use temporal_amount::Elapsed;
///
/// #[derive(Serialize, Deserialize)]
/// struct Settings {
///     #[serde(with = "temporal_amount::serde_utils::elapsed")]
///     timeout: Elapsed,
/// }
///
/// let settings: Settings = serde_json::from_str(r#"{"timeout": "1m30s"}"#).unwrap();
/// assert_eq!(settings.timeout, Elapsed::from_secs(90));
/// assert_eq!(serde_json::to_string(&settings).unwrap(), r#"{"timeout":"1m30s"}"#);
/// ```
pub mod elapsed {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};
    use serde::ser::{self, Serializer};

    use crate::amount::Elapsed;
    use crate::parser::DurationParser;
    use crate::unit::TimeUnit;

    pub fn serialize<S>(value: &Elapsed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = DurationParser::date_time_units()
            .format(value)
            .map_err(ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    /// Same as `serialize`, for an `Option<Elapsed>` field.
    pub fn serialize_opt<S>(value: &Option<Elapsed>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    struct ElapsedVisitor;

    impl<'de> Visitor<'de> for ElapsedVisitor {
        type Value = Elapsed;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str(
                "an integer number of milliseconds, or a compact duration such as \"1h30m\"",
            )
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Elapsed::from_nanos(
                i128::from(value) * TimeUnit::Millis.nanos() as i128,
            ))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Elapsed::of(value, TimeUnit::Millis))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            DurationParser::date_time_units()
                .parse(value)
                .map_err(de::Error::custom)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Elapsed, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ElapsedVisitor)
    }

    /// Same as `deserialize`, but allows the field to be `null`.
    pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Elapsed>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OptVisitor;

        impl<'de> Visitor<'de> for OptVisitor {
            type Value = Option<Elapsed>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                ElapsedVisitor.expecting(formatter)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserialize(deserializer).map(Some)
            }
        }

        deserializer.deserialize_option(OptVisitor)
    }
}
