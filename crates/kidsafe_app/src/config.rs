use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use kidsafe_engine::{EngineConfig, PollSettings, ServiceSettings};
use log::LevelFilter;

use crate::platform::logging::LogDestination;

/// Terminal client for the KidSafe ingredient analysis service.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base URL of the analysis service.
    #[arg(long, env = "KIDSAFE_API_URL", default_value = "http://localhost:5001")]
    pub api_url: String,

    /// Precomputed analyses produced by the batch generator.
    #[arg(long, env = "KIDSAFE_PRECOMPUTED", default_value = "precomputed-analyses.json")]
    pub precomputed: PathBuf,

    /// Delay between backend readiness checks.
    #[arg(long, default_value_t = 3000)]
    pub status_interval_ms: u64,

    /// Readiness checks before the backend is reported unavailable.
    #[arg(long, default_value_t = 40)]
    pub status_max_attempts: u32,

    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log_destination: LogDestination,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Args {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            service: ServiceSettings {
                base_url: self.api_url.clone(),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..ServiceSettings::default()
            },
            poll: PollSettings {
                interval: Duration::from_millis(self.status_interval_ms),
                max_attempts: self.status_max_attempts.max(1),
            },
            precomputed_path: self.precomputed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_conventions() {
        let args = Args::try_parse_from(["kidsafe_app"]).unwrap();
        let config = args.engine_config();
        assert_eq!(config.service.base_url, "http://localhost:5001");
        assert_eq!(config.poll.interval, Duration::from_secs(3));
        assert_eq!(config.poll.max_attempts, 40);
        assert_eq!(config.precomputed_path, PathBuf::from("precomputed-analyses.json"));
        assert_eq!(args.log_destination, LogDestination::File);
        assert_eq!(args.log_level.filter(), LevelFilter::Info);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "kidsafe_app",
            "--api-url",
            "http://analysis:8080",
            "--status-max-attempts",
            "0",
            "--log-destination",
            "both",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = args.engine_config();
        assert_eq!(config.service.base_url, "http://analysis:8080");
        assert_eq!(config.poll.max_attempts, 1);
        assert_eq!(args.log_destination, LogDestination::Both);
        assert_eq!(args.log_level.filter(), LevelFilter::Debug);
    }
}
