//! Mode configuration resolver
//!
//! Maps a [`PermissionMode`] to the concrete policy it enforces.

use super::catalog::{catalog, tool_in, CommandPattern, BLOCKED_TOOLS};
use forgeguard_foundation::PermissionMode;

/// Policy record for one permission mode
#[derive(Debug, Clone, Copy)]
pub struct ModeConfig {
    /// Mode this config was resolved from
    pub mode: PermissionMode,

    /// Tools rejected outright
    pub blocked_tools: &'static [&'static str],

    /// Allowlist a bash command must match to run without confirmation
    pub read_only_patterns: &'static [CommandPattern],

    /// Unmatched bash commands escalate to a prompt instead of a hard block
    pub prompt_for_bash: bool,
}

impl ModeConfig {
    pub fn is_tool_blocked(&self, tool_name: &str) -> bool {
        tool_in(self.blocked_tools, tool_name)
    }

    /// First allowlist entry matching an already-normalized command.
    ///
    /// A side-effect flag (`sort -o`, `rg --pre`, ...) voids any match.
    pub fn read_only_match(&self, command: &str) -> Option<&'static CommandPattern> {
        if let Some(flag) = catalog().side_effect_flag(command) {
            tracing::trace!(command, flag, "Allowlist match voided by side-effect flag");
            return None;
        }
        self.read_only_patterns.iter().find(|p| p.is_match(command))
    }
}

/// Resolve the policy for `mode`. Pure; the same mode always yields the same config.
pub fn resolve_mode_config(mode: PermissionMode) -> ModeConfig {
    let allowlist = catalog().read_only();

    match mode {
        PermissionMode::Safe => ModeConfig {
            mode,
            blocked_tools: BLOCKED_TOOLS,
            read_only_patterns: allowlist,
            prompt_for_bash: false,
        },
        PermissionMode::Ask => ModeConfig {
            mode,
            blocked_tools: &[],
            read_only_patterns: allowlist,
            prompt_for_bash: true,
        },
        PermissionMode::AllowAll => ModeConfig {
            mode,
            blocked_tools: &[],
            read_only_patterns: &[],
            prompt_for_bash: false,
        },
    }
}

/// Resolve from raw text; anything unrecognized resolves to the `ask` config
pub fn resolve_mode_config_str(mode: &str) -> ModeConfig {
    resolve_mode_config(PermissionMode::parse_or_ask(mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_config() {
        let config = resolve_mode_config(PermissionMode::Safe);
        assert_eq!(config.mode, PermissionMode::Safe);
        assert_eq!(config.blocked_tools.len(), 5);
        assert!(!config.read_only_patterns.is_empty());
        assert!(!config.prompt_for_bash);
        assert!(config.is_tool_blocked("Write"));
        assert!(config.is_tool_blocked("notebook_edit"));
        assert!(!config.is_tool_blocked("Read"));
    }

    #[test]
    fn test_ask_config() {
        let config = resolve_mode_config(PermissionMode::Ask);
        assert!(config.blocked_tools.is_empty());
        assert_eq!(
            config.read_only_patterns.len(),
            catalog().read_only().len()
        );
        assert!(config.prompt_for_bash);
    }

    #[test]
    fn test_allow_all_config() {
        let config = resolve_mode_config(PermissionMode::AllowAll);
        assert!(config.blocked_tools.is_empty());
        assert!(config.read_only_patterns.is_empty());
        assert!(!config.prompt_for_bash);
        assert!(config.read_only_match("ls").is_none());
    }

    #[test]
    fn test_garbage_resolves_to_ask() {
        for raw in ["", "root", "ALLOW EVERYTHING", "allow-all-please", "2"] {
            let config = resolve_mode_config_str(raw);
            assert_eq!(config.mode, PermissionMode::Ask, "input {:?}", raw);
            assert!(config.prompt_for_bash);
        }
        assert_eq!(
            resolve_mode_config_str("allow-all").mode,
            PermissionMode::AllowAll
        );
    }

    #[test]
    fn test_read_only_match_label() {
        let config = resolve_mode_config(PermissionMode::Safe);
        let hit = config.read_only_match("git status").map(|p| p.label());
        assert_eq!(hit, Some("git read-only"));
    }

    #[test]
    fn test_side_effect_flag_voids_match() {
        let config = resolve_mode_config(PermissionMode::Ask);
        assert!(config.read_only_match("git diff --stat").is_some());
        assert!(config.read_only_match("git diff --output=src/main.rs").is_none());
        assert!(config.read_only_match("sort -o Cargo.toml Cargo.toml").is_none());
    }
}
