//! Build script for fuzzy-duration
//!
//! Embeds version and target triple for `--version` output.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FUZZY_DURATION_VERSION={}", version);

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=FUZZY_DURATION_TARGET={}", target);
}
