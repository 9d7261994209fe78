//! Build script for tempconv
//!
//! Bumps the persisted build number and exposes build metadata to the crate.

use std::fs;
use std::path::Path;

const BUILD_NUMBER_FILE: &str = "build_number.txt";

fn read_build_number(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    println!("cargo:rerun-if-changed=src");

    let path = Path::new(BUILD_NUMBER_FILE);
    let build = read_build_number(path) + 1;

    // A read-only checkout still builds; the number just won't advance
    if let Err(e) = fs::write(path, build.to_string()) {
        println!("cargo:warning=Could not persist build number: {}", e);
    }

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    println!("cargo:rustc-env=TEMPCONV_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=TEMPCONV_BUILD_TIMESTAMP={}", timestamp);
}
