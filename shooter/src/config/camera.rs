use std::{path::PathBuf, time::Duration};

use serde::{ Deserialize, Deserializer, de::Unexpected };

#[derive(Debug, Deserialize)]
pub struct Camera {
    pub module: CaptureModule,

    pub session_path: PathBuf,

    /// gphoto2 port, empty for auto detection
    #[serde(deserialize_with = "deserialize_port")]
    pub port: Option<String>,

    /// Pause inserted between shots when the interval is zero. Some cameras report
    /// busy when the next capture follows immediately; this is a device workaround,
    /// not a rate limit.
    #[serde(deserialize_with = "deserialize_millis")]
    pub settle: Duration,

    #[serde(deserialize_with = "deserialize_exposure")]
    pub dummy_exposure: Duration,
    #[serde(deserialize_with = "deserialize_failure_rate")]
    pub dummy_failure_rate: f64,
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureModule {
    Dummy,
    GPhoto2,
}

fn deserialize_port<'de, D>(d: D) -> Result<Option<String>, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    let s = s.trim();
    Ok(if s.is_empty() { None } else { Some(s.to_string()) })
}

fn deserialize_millis<'de, D>(d: D) -> Result<Duration, D::Error> where D: Deserializer<'de> {
    let s = String::deserialize(d)?;
    match s.parse::<u64>() {
        Ok(v) => Ok(Duration::from_millis(v)),
        Err(e) => Err(serde::de::Error::invalid_value(Unexpected::Str(&s), &format!("to be milliseconds as u64. (camera.settle) {e}").as_str())),
    }
}

fn deserialize_exposure<'de, D>(d: D) -> Result<Duration, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value >= 0.0 { Ok(Duration::from_secs_f64(value)) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"to be greater than or equal 0. (camera.dummy_exposure)")) }
}

fn deserialize_failure_rate<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    let value = f64::deserialize(d)?;
    if value.is_finite() && value >= 0.0 && value <= 1.0 { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Float(value), &"to be 0.0 <= x <= 1.0. (camera.dummy_failure_rate)")) }
}
