use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;
use time::OffsetDateTime;
use time::macros::format_description;

pub const DEFAULT_RADIUS_KM: f64 = 3.0;

/// One named map pin as stored in the CSV file and returned to clients. The
/// serde field names double as the CSV header, so a rename here changes the
/// on-disk format.
///
/// Coordinate fields are deliberately plain text: whatever was stored is
/// returned verbatim, with no numeric validation. The `circleCenter*` fields
/// are owned by the client; the submit path leaves them empty and only a bulk
/// save threads them through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default = "default_radius", deserialize_with = "radius_or_default")]
    pub radius: f64,
    #[serde(rename = "circleCenterLng", default)]
    pub circle_center_lng: String,
    #[serde(rename = "circleCenterLat", default)]
    pub circle_center_lat: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Default for LocationRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            radius: DEFAULT_RADIUS_KM,
            circle_center_lng: String::new(),
            circle_center_lat: String::new(),
            timestamp: String::new(),
        }
    }
}

impl LocationRecord {
    /// Stamp the record with the current time if it doesn't carry one yet.
    pub fn ensure_timestamp(&mut self) {
        if self.timestamp.is_empty() {
            self.timestamp = current_timestamp();
        }
    }
}

/// A record as submitted by a client. Browsers send coordinates as either
/// JSON numbers or strings depending on which input they came from, so every
/// field accepts both and normalizes to the stored text form.
#[derive(Debug, Deserialize)]
pub struct RecordInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: String,
    #[serde(default = "default_radius", deserialize_with = "lenient_radius")]
    pub radius: f64,
    #[serde(
        rename = "circleCenterLng",
        default,
        deserialize_with = "lenient_string"
    )]
    pub circle_center_lng: String,
    #[serde(
        rename = "circleCenterLat",
        default,
        deserialize_with = "lenient_string"
    )]
    pub circle_center_lat: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: String,
}

impl From<RecordInput> for LocationRecord {
    fn from(input: RecordInput) -> Self {
        Self {
            name: input.name,
            address: input.address,
            latitude: input.latitude,
            longitude: input.longitude,
            radius: input.radius,
            circle_center_lng: input.circle_center_lng,
            circle_center_lat: input.circle_center_lat,
            timestamp: input.timestamp,
        }
    }
}

pub fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

/// Current time as `YYYY-MM-DD HH:MM:SS` on the server-local clock, falling
/// back to UTC when the local offset can't be determined.
pub fn current_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_default()
}

/// Radius as stored in the file: empty or unparseable values (including rows
/// written before the column existed) fall back to [`DEFAULT_RADIUS_KM`].
fn radius_or_default<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(de)?;
    Ok(opt
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RADIUS_KM))
}

/// Accept a string, a number, or null and keep the text form.
pub fn lenient_string<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientString;

    impl de::Visitor<'_> for LenientString {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    de.deserialize_any(LenientString)
}

/// Same leniency for the radius: number, numeric string, or nothing at all.
/// Anything unparseable falls back to [`DEFAULT_RADIUS_KM`].
pub fn lenient_radius<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientRadius;

    impl de::Visitor<'_> for LenientRadius {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            Ok(v.trim().parse().unwrap_or(DEFAULT_RADIUS_KM))
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(DEFAULT_RADIUS_KM)
        }
    }

    de.deserialize_any(LenientRadius)
}
