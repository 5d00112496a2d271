use std::env;
use std::process::Command;

use chrono::{SecondsFormat, Utc};

fn main() {
    for watched in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let hash = probe("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let status = match probe("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let rustc = probe("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    let values = [
        ("HASH", hash),
        ("STATUS", status.to_string()),
        (
            "TIMESTAMP",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "TARGET",
            env::var("TARGET").unwrap_or_else(|_| "unknown-target".into()),
        ),
        (
            "PROFILE",
            env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".into()),
        ),
        ("RUSTC", rustc),
    ];
    for (key, value) in values {
        println!("cargo:rustc-env=EXPENSE_TRACKER_BUILD_{key}={value}");
    }
}

/// Trimmed stdout of a successful command, `None` if it cannot run or fails.
fn probe(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
