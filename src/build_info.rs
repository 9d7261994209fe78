//! Build metadata embedded by `build.rs` and the startup banner

use serde::Serialize;

use crate::conversion::TemperatureUnit;

const RAW_BUILD_NUMBER: Option<&str> = option_env!("TEMPCONV_BUILD_NUMBER");

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("TEMPCONV_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Version string reported in response envelopes
pub const API_VERSION: &str = "v1";

fn parse_build_number(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

/// Build number, 0 when built without the build script
pub fn build_number() -> u64 {
    parse_build_number(RAW_BUILD_NUMBER)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub api_version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            api_version: API_VERSION,
            build_number: build_number(),
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// One-line form, e.g. `tempconv 1.0.0 (api v1, build 12)`
    pub fn summary(&self) -> String {
        format!(
            "{} {} (api {}, build {})",
            self.name, self.version, self.api_version, self.build_number
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    let units: Vec<&str> = TemperatureUnit::ALL.iter().map(|u| u.as_str()).collect();
    eprintln!("===============================================");
    eprintln!("  Temperature Conversion Service");
    eprintln!("  {}", info.summary());
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("  Units: {}", units.join(", "));
    eprintln!("===============================================");
}
