use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let status = match command_stdout("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let rustc = command_stdout("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());

    stamp("HASH", &hash);
    stamp("STATUS", status);
    stamp("TIMESTAMP", &timestamp);
    stamp("TARGET", &env::var("TARGET").unwrap_or_else(|_| "unknown".into()));
    stamp("PROFILE", &env::var("PROFILE").unwrap_or_else(|_| "unknown".into()));
    stamp("RUSTC", &rustc);
}

fn stamp(key: &str, value: &str) {
    println!("cargo:rustc-env=FINANCE_LEDGER_BUILD_{key}={value}");
}

/// Trimmed stdout of a successful command run, `None` when it cannot run or fails.
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
