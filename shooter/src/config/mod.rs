pub mod general;
pub mod camera;
pub mod logging;

use serde::Deserialize;
use config_rs::{self, builder::DefaultState, ConfigBuilder, ConfigError};

use common::settings::ShooterSettings;

use general::General;
use camera::Camera;
use logging::Logging;

const CONFIGS: &[&str] = &["shooter.toml"];
const ENV_PREFIX: &str = "SHOOTER";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub camera: Camera,
    pub shooter: ShooterSettings,
    pub logging: Logging,
}

impl Config {
    /// Embedded defaults, then `shooter.toml` if present, then `SHOOTER__SECTION__KEY` variables.
    pub fn load() -> Result<Config, ConfigError> {
        let mut config_rs_builder = defaults();
        for s in CONFIGS {
            config_rs_builder = config_rs_builder.add_source(config_rs::File::with_name(s).required(false));
        }
        config_rs_builder
            .add_source(config_rs::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize::<Config>()
    }
}

fn defaults() -> ConfigBuilder<DefaultState> {
    config_rs::Config::builder()
        .add_source(config_rs::File::from_str(include_str!("defaults/general.toml"), config_rs::FileFormat::Toml))
        .add_source(config_rs::File::from_str(include_str!("defaults/camera.toml"), config_rs::FileFormat::Toml))
        .add_source(config_rs::File::from_str(include_str!("defaults/shooter.toml"), config_rs::FileFormat::Toml))
        .add_source(config_rs::File::from_str(include_str!("defaults/logging.toml"), config_rs::FileFormat::Toml))
}
