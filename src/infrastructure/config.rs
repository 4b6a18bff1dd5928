use anyhow::Context;
use serde::Deserialize;

/// Connection settings, read once at startup from INFLUX_* environment
/// variables and passed by ownership into the services.
#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub url: String,
    pub token: String,
    pub org: String,
    pub org_id: String,
    pub bucket: String,
}

pub fn load_influx_settings() -> anyhow::Result<InfluxSettings> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("INFLUX"))
        .build()?;

    settings
        .try_deserialize()
        .context("missing or invalid INFLUX_* environment configuration (need INFLUX_URL, INFLUX_TOKEN, INFLUX_ORG, INFLUX_ORG_ID, INFLUX_BUCKET)")
}
