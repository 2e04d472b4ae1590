//! `classify` and `modes` subcommands

use crate::render;
use forgeguard_core::guard::catalog;
use forgeguard_core::{classify, resolve_mode_config, ModeConfig, PermissionMode};
use std::process::ExitCode;

pub fn run_classify(command: &str, mode: PermissionMode) -> anyhow::Result<ExitCode> {
    let config = resolve_mode_config(mode);
    println!("Mode:           {}", mode);
    for line in render::classification_lines(&classify(command, &config)) {
        println!("{}", line);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn run_modes() -> anyhow::Result<ExitCode> {
    println!("\n🔒 Permission Modes\n");
    for mode in PermissionMode::ALL {
        for line in mode_lines(&resolve_mode_config(mode)) {
            println!("{}", line);
        }
        println!();
    }
    println!(
        "Always blocked in every mode: {} patterns",
        catalog().always_blocked().len()
    );
    Ok(ExitCode::SUCCESS)
}

fn mode_lines(config: &ModeConfig) -> Vec<String> {
    let blocked = if config.blocked_tools.is_empty() {
        "none".to_string()
    } else {
        config.blocked_tools.join(", ")
    };
    let unmatched = if config.mode.allows_all() {
        "allow"
    } else if config.prompt_for_bash {
        "prompt"
    } else {
        "block"
    };

    vec![
        format!("{} - {}", config.mode, config.mode.description()),
        format!("  blocked tools:      {}", blocked),
        format!("  read-only patterns: {}", config.read_only_patterns.len()),
        format!("  unmatched commands: {}", unmatched),
    ]
}
