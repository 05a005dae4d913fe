use std::path::Path;

use log4rs::{
    self,
    append::{ console::{ConsoleAppender, Target}, rolling_file::{ policy::compound::{ roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy, }, RollingFileAppender, }, },
    config::{Appender, Root},
    encode::pattern::PatternEncoder
};

use crate::config::logging::Logging;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

const PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {h({l}):5} {t} {T} - {m}{n}";

/// Installs the global logger and routes panics into it.
pub fn init(cnf: &Logging) -> Result<()> {
    log4rs::init_config(generate_config(cnf)?)?;
    log_panics::init();
    Ok(())
}

fn generate_config(cnf: &Logging) -> Result<log4rs::Config> {
    let size = cnf.size.checked_mul(1024 * 1024).unwrap_or(u64::MAX);
    let path = Path::new(&cnf.path);

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let roller = FixedWindowRoller::builder()
        .build(&path.join("shooter.{}.log").to_string_lossy(), cnf.count)?;

    let rolling_file_appender = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build(
            path.join("shooter.log"),
            Box::new(CompoundPolicy::new(Box::new(SizeTrigger::new(size)), Box::new(roller))),
        )?;

    let log_cnf = log4rs::Config::builder()
        .appender(Appender::builder().build("rolling_file_appender", Box::new(rolling_file_appender)))
        .appender(Appender::builder().build("console_appender", Box::new(console_appender)))
        .build(
            Root::builder()
                .appender("rolling_file_appender")
                .appender("console_appender")
                .build(cnf.level),
        )?;

    Ok(log_cnf)
}
