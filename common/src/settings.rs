use std::time::Duration;

use serde::{ Deserialize, Deserializer, Serialize, de::Unexpected };

pub const SHOT_COUNT_MAX: u32 = 10000;
pub const SHOT_INTERVAL_MAX: u32 = 1000;

/// Read side of the persisted shooter settings. Values are read once when a run starts.
pub trait SettingsStore {
    fn shot_count(&self) -> u32;

    /// seconds
    fn shot_interval(&self) -> u32;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShooterSettings {
    #[serde(deserialize_with = "deserialize_shot_count")]
    pub shot_count: u32,

    #[serde(deserialize_with = "deserialize_shot_interval")]
    pub shot_interval: u32,
}

impl ShooterSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.shot_interval as u64)
    }
}

impl Default for ShooterSettings {
    fn default() -> Self {
        ShooterSettings { shot_count: 1, shot_interval: 0 }
    }
}

impl SettingsStore for ShooterSettings {
    fn shot_count(&self) -> u32 {
        self.shot_count
    }

    fn shot_interval(&self) -> u32 {
        self.shot_interval
    }
}

fn deserialize_shot_count<'de, D>(d: D) -> Result<u32, D::Error> where D: Deserializer<'de> {
    let value = u32::deserialize(d)?;
    if value >= 1 && value <= SHOT_COUNT_MAX { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Unsigned(value as u64), &format!("to be 1 <= x <= {SHOT_COUNT_MAX}. (shooter.shot_count)").as_str())) }
}

fn deserialize_shot_interval<'de, D>(d: D) -> Result<u32, D::Error> where D: Deserializer<'de> {
    let value = u32::deserialize(d)?;
    if value <= SHOT_INTERVAL_MAX { Ok(value) }
    else { Err(serde::de::Error::invalid_value(Unexpected::Unsigned(value as u64), &format!("to be 0 <= x <= {SHOT_INTERVAL_MAX}. (shooter.shot_interval)").as_str())) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_is_whole_seconds() {
        let s = ShooterSettings { shot_count: 3, shot_interval: 2 };
        assert_eq!(s.interval(), Duration::from_secs(2));
        assert_eq!(ShooterSettings::default().interval(), Duration::ZERO);
    }

    #[test]
    fn store_reads_through() {
        let s = ShooterSettings { shot_count: 7, shot_interval: 4 };
        let store: &dyn SettingsStore = &s;
        assert_eq!(store.shot_count(), 7);
        assert_eq!(store.shot_interval(), 4);
    }
}
