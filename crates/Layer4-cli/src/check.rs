//! `check` and `tool` subcommands

use crate::render;
use forgeguard_core::{PermissionCheckResult, PermissionGate, PermissionMode};
use std::process::ExitCode;

/// Check a shell command in a fresh session
pub fn run_check(command: &str, mode: PermissionMode, json: bool) -> anyhow::Result<ExitCode> {
    let result = check_command(command, mode);
    print_result(&result, json)?;
    Ok(ExitCode::from(render::exit_code(&result)))
}

/// Check a tool call in a fresh session
pub fn run_tool(
    name: &str,
    command: Option<&str>,
    mode: PermissionMode,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let result = check_tool(name, command, mode);
    print_result(&result, json)?;
    Ok(ExitCode::from(render::exit_code(&result)))
}

fn check_command(command: &str, mode: PermissionMode) -> PermissionCheckResult {
    let gate = PermissionGate::with_default_mode(mode);
    let session_id = uuid::Uuid::new_v4().to_string();
    gate.check_bash_permission(&session_id, command)
}

fn check_tool(name: &str, command: Option<&str>, mode: PermissionMode) -> PermissionCheckResult {
    let gate = PermissionGate::with_default_mode(mode);
    let session_id = uuid::Uuid::new_v4().to_string();
    let args = command.map(|c| serde_json::json!({ "command": c }));
    gate.check_tool_permission(&session_id, name, args.as_ref())
}

fn print_result(result: &PermissionCheckResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", render::decision_json(result)?);
    } else {
        println!("{}", render::decision_line(result));
    }
    Ok(())
}
