//! `init` subcommand
//!
//! 현재 디렉토리에 .forgeguard/config.json을 만든다.

use anyhow::Context;
use forgeguard_foundation::{GuardConfig, JsonStore, PermissionMode, GUARD_CONFIG_FILE};
use std::process::ExitCode;

/// Write a project config with `mode` as the default
pub fn run_init(mode: &str, force: bool) -> anyhow::Result<ExitCode> {
    // 쓰기 경로라 알 수 없는 값은 ask로 떨어뜨리지 않고 거부한다
    let mode: PermissionMode = mode.parse()?;
    let store = JsonStore::current_project()?;
    init_store(&store, mode, force)?;
    Ok(ExitCode::SUCCESS)
}

/// Returns false when a config already exists and `force` is off
fn init_store(store: &JsonStore, mode: PermissionMode, force: bool) -> anyhow::Result<bool> {
    let path = store.file_path(GUARD_CONFIG_FILE);

    if store.exists(GUARD_CONFIG_FILE) && !force {
        println!("✓ forgeguard already initialized: {}", path.display());
        println!("  Use --force to overwrite.");
        return Ok(false);
    }

    GuardConfig::new()
        .default_mode(mode)
        .save_to(store)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), %mode, "Wrote project guard config");

    println!("✓ Created {} (default mode: {})", path.display(), mode);
    Ok(true)
}
