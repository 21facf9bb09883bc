//! Configuration for Products API

use core_config::{app_info, env_parse_or, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// What to do when MongoDB cannot be reached at startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StartupPolicy {
    /// Retry with backoff, then exit with an error
    #[default]
    FailFast,
    /// Log the failure and serve anyway; store calls answer 500 and
    /// `/ready` reports 503 until the server becomes reachable
    Degrade,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub startup_policy: StartupPolicy,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let startup_policy = env_parse_or("MONGODB_STARTUP_POLICY", StartupPolicy::default())?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            startup_policy,
        })
    }
}
