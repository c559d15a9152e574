/// Serde utility functions for common patterns
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// (De)serialize a `Duration` as a whole number of seconds.
///
/// Usage:
/// ```ignore
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Example {
///     #[serde(with = "crate::serde_utils::duration_secs")]
///     connect_timeout: std::time::Duration,
/// }
/// ```
pub mod duration_secs {
    use super::*;

    pub fn serialize<S>(value: &Duration, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(de).map(Duration::from_secs)
    }
}
