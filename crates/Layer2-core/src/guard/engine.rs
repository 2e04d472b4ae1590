//! Permission decision engine
//!
//! Combines the catalog, mode config, classifier and session memo into one verdict.
//! Rules are evaluated in a fixed order and the first applicable rule wins:
//!
//! 1. always-blocked command (every mode)
//! 2. blocked shell construct (safe, ask)
//! 3. allow-all mode
//! 4. approved earlier in this session
//! 5. denied earlier in this session
//! 6. compound command: every segment read-only, else prompt (ask) or block (safe)
//! 7. read-only command
//! 8. safe mode: block
//! 9. ask mode: prompt

use super::catalog::is_shell_tool;
use super::classifier::{
    has_blocked_construct, is_always_blocked, is_compound, is_compound_safe, is_read_only,
    normalize,
};
use super::mode_config::{resolve_mode_config, ModeConfig};
use super::store::{CommandDecision, SessionPermissionStore};
use forgeguard_foundation::{PermissionCheckResult, PermissionMode};
use serde_json::Value;

pub const REASON_PREVIOUSLY_DENIED: &str = "Previously denied this session";
pub const REASON_COMPOUND_PROMPT: &str = "Compound command requires approval";
pub const REASON_COMPOUND_BLOCKED: &str = "Compound command contains non-read-only operations";
pub const REASON_NOT_ALLOWLISTED: &str = "Command not in read-only allowlist (safe mode)";
pub const REASON_REQUIRES_APPROVAL: &str = "Command requires user approval";

/// Stateless decision logic. Session state is passed in by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionEngine;

impl PermissionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether a shell command may run in this session
    pub fn check_bash_permission(
        &self,
        store: &mut SessionPermissionStore,
        session_id: &str,
        command: &str,
    ) -> PermissionCheckResult {
        let state = store.get_or_create(session_id);
        let config = resolve_mode_config(state.mode());
        let memo = state.decision(command);

        let result = Self::decide_bash(&config, memo, command);
        tracing::debug!(
            session_id,
            mode = %config.mode,
            command = %normalize(command),
            verdict = ?result.kind(),
            reason = result.reason().unwrap_or(""),
            "Bash permission decision"
        );
        result
    }

    fn decide_bash(
        config: &ModeConfig,
        memo: Option<CommandDecision>,
        command: &str,
    ) -> PermissionCheckResult {
        // 1. 어떤 모드에서도 우회 불가
        if let Some(reason) = is_always_blocked(command) {
            return PermissionCheckResult::block(reason);
        }

        // 2-3.
        if config.mode.allows_all() {
            return PermissionCheckResult::allow();
        }
        if let Some(construct) = has_blocked_construct(command) {
            return PermissionCheckResult::block(construct.reason());
        }

        // 4-5. 세션 메모
        match memo {
            Some(CommandDecision::Approved) => return PermissionCheckResult::allow(),
            Some(CommandDecision::Denied) => {
                return PermissionCheckResult::block(REASON_PREVIOUSLY_DENIED)
            }
            None => {}
        }

        // 6.
        if is_compound(command) {
            return if is_compound_safe(command, config) {
                PermissionCheckResult::allow()
            } else if config.prompt_for_bash {
                PermissionCheckResult::prompt(REASON_COMPOUND_PROMPT)
            } else {
                PermissionCheckResult::block(REASON_COMPOUND_BLOCKED)
            };
        }

        // 7.
        if is_read_only(command, config) {
            return PermissionCheckResult::allow();
        }

        // 8-9.
        if config.prompt_for_bash {
            PermissionCheckResult::prompt(REASON_REQUIRES_APPROVAL)
        } else {
            PermissionCheckResult::block(REASON_NOT_ALLOWLISTED)
        }
    }

    /// Decide whether a structured tool call may run.
    ///
    /// Shell tools defer to [`Self::check_bash_permission`] with `args["command"]`;
    /// a missing or non-string command is checked as the empty command.
    pub fn check_tool_permission(
        &self,
        store: &mut SessionPermissionStore,
        session_id: &str,
        tool_name: &str,
        args: Option<&Value>,
    ) -> PermissionCheckResult {
        let mode = store.get_or_create(session_id).mode();
        let config = resolve_mode_config(mode);

        if mode.allows_all() {
            tracing::debug!(session_id, tool_name, "Tool allowed (allow-all)");
            return PermissionCheckResult::allow();
        }

        if config.is_tool_blocked(tool_name) {
            tracing::debug!(session_id, tool_name, mode = %mode, "Tool blocked");
            return PermissionCheckResult::block(blocked_tool_reason(tool_name, mode));
        }

        if is_shell_tool(tool_name) {
            let command = args
                .and_then(|a| a.get("command"))
                .and_then(Value::as_str)
                .unwrap_or("");
            return self.check_bash_permission(store, session_id, command);
        }

        tracing::debug!(session_id, tool_name, mode = %mode, "Tool allowed");
        PermissionCheckResult::allow()
    }
}

pub fn blocked_tool_reason(tool_name: &str, mode: PermissionMode) -> String {
    format!("Tool '{}' is blocked in {} mode", tool_name, mode)
}
