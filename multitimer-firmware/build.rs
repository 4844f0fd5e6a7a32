//! Build script for multitimer-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates multitimer.toml at compile time
//! - Generates the embedded `EngineConfig` constructor

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Limits mirrored from multitimer-core
const MAX_TIMERS: usize = 10;
const MAX_DURATION_SEC: i64 = 1000 * 86_400;
const TITLE_PREFIX_LEN: usize = 16;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values read from multitimer.toml
struct FirmwareConfig {
    lead_sec: i64,
    grace_sec: i64,
    seed_durations: Vec<i64>,
    title_prefix: String,
}

/// Validate multitimer.toml configuration at compile time
fn validate_config() -> FirmwareConfig {
    // Re-run if multitimer.toml changes
    println!("cargo:rerun-if-changed=multitimer.toml");

    let config_path = Path::new("multitimer.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: multitimer.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a multitimer.toml configuration file.     ║\n\
            ║  Please create one in the multitimer-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read multitimer.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in multitimer.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let lead_sec = integer(&config, "wake", "lead_sec", &mut errors);
    if !(0..=3_600).contains(&lead_sec) {
        errors.push("[wake] lead_sec must be 0-3600".to_string());
    }

    let grace_sec = integer(&config, "wake", "grace_sec", &mut errors);
    if !(1..=600).contains(&grace_sec) {
        errors.push("[wake] grace_sec must be 1-600".to_string());
    }

    let seed_durations = seed_durations(&config, &mut errors);

    let title_prefix = match config.get("timeline").and_then(|t| t.get("title_prefix")) {
        Some(toml::Value::String(prefix)) => {
            if prefix.len() > TITLE_PREFIX_LEN {
                errors.push(format!(
                    "[timeline] title_prefix must be at most {} bytes",
                    TITLE_PREFIX_LEN
                ));
            }
            prefix.clone()
        }
        _ => {
            errors.push("[timeline] missing 'title_prefix'".to_string());
            String::new()
        }
    };

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid multitimer.toml                                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=multitimer.toml validated successfully");

    FirmwareConfig {
        lead_sec,
        grace_sec,
        seed_durations,
        title_prefix,
    }
}

/// Read `[section] key` as an integer
fn integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(value)) => *value,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
    }
}

fn seed_durations(config: &toml::Value, errors: &mut Vec<String>) -> Vec<i64> {
    let durations = match config.get("timers").and_then(|t| t.get("seed_durations")) {
        Some(toml::Value::Array(values)) => values,
        Some(_) => {
            errors.push("[timers] seed_durations must be an array".to_string());
            return Vec::new();
        }
        None => {
            errors.push("[timers] missing 'seed_durations'".to_string());
            return Vec::new();
        }
    };

    if durations.len() > MAX_TIMERS {
        errors.push(format!(
            "[timers] at most {} seed_durations allowed",
            MAX_TIMERS
        ));
    }

    durations
        .iter()
        .enumerate()
        .filter_map(|(i, value)| match value {
            toml::Value::Integer(secs) if (1..=MAX_DURATION_SEC).contains(secs) => Some(*secs),
            _ => {
                errors.push(format!(
                    "[timers] seed_durations[{}] must be 1-{} seconds",
                    i, MAX_DURATION_SEC
                ));
                None
            }
        })
        .collect()
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `engine_config.rs` into OUT_DIR
fn generate_config(config: &FirmwareConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let build_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let seeds = config
        .seed_durations
        .iter()
        .map(|secs| format!("    let _ = config.seed_durations.push({});\n", secs))
        .collect::<String>();

    let code = format!(
        "// Generated from multitimer.toml by build.rs\n\
        \n\
        /// Wall clock used when the RTC has never been set\n\
        pub const BUILD_EPOCH: i64 = {build_epoch};\n\
        \n\
        /// Engine configuration compiled into the firmware\n\
        pub fn embedded_config() -> EngineConfig {{\n\
        \x20   let mut config = EngineConfig::default();\n\
        \x20   config.wake_lead_sec = {lead};\n\
        \x20   config.wake_grace_sec = {grace};\n\
        \x20   config.seed_durations.clear();\n\
        {seeds}\
        \x20   config.title_prefix.clear();\n\
        \x20   let _ = config.title_prefix.push_str({prefix:?});\n\
        \x20   config\n\
        }}\n",
        build_epoch = build_epoch,
        lead = config.lead_sec,
        grace = config.grace_sec,
        seeds = seeds,
        prefix = config.title_prefix,
    );

    fs::write(out_dir.join("engine_config.rs"), code).unwrap();
}
