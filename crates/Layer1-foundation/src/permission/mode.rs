//! Permission modes
//!
//! 세션별 권한 모드. 가장 제한적인 것부터 `safe < ask < allow-all` 순서.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission mode applied to one agent session.
///
/// - **Safe**: read-only. Write-class tools are rejected and shell commands must match the
///   read-only allowlist; anything else is a hard block.
/// - **Ask**: human in the loop. Commands the allowlist cannot clear escalate to a prompt.
/// - **AllowAll**: everything runs except the always-blocked catalog, which no mode overrides.
///
/// The derived ordering follows restrictiveness, so `Safe < Ask < AllowAll`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionMode {
    /// Read-only allowlist, no prompts
    Safe,

    /// Escalate unknown commands to the user
    #[default]
    Ask,

    /// Allow everything except always-blocked commands
    AllowAll,
}

impl PermissionMode {
    /// All modes, most restrictive first
    pub const ALL: [PermissionMode; 3] = [
        PermissionMode::Safe,
        PermissionMode::Ask,
        PermissionMode::AllowAll,
    ];

    /// Stable identifier (`safe`, `ask`, `allow-all`)
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionMode::Safe => "safe",
            PermissionMode::Ask => "ask",
            PermissionMode::AllowAll => "allow-all",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PermissionMode::Safe => "Read-only: only allowlisted commands run, write tools blocked",
            PermissionMode::Ask => "Ask before running anything not on the read-only allowlist",
            PermissionMode::AllowAll => "Allow everything except always-blocked commands (dangerous)",
        }
    }

    pub fn allows_all(&self) -> bool {
        matches!(self, PermissionMode::AllowAll)
    }

    /// Parse a mode, failing closed.
    ///
    /// Unknown or corrupted values resolve to [`PermissionMode::Ask`], never to
    /// [`PermissionMode::AllowAll`].
    pub fn parse_or_ask(value: &str) -> Self {
        match value.parse() {
            Ok(mode) => mode,
            Err(_) => {
                tracing::warn!(value, "Unknown permission mode, falling back to 'ask'");
                PermissionMode::Ask
            }
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "safe" | "read-only" | "readonly" | "read_only" | "plan" => Ok(PermissionMode::Safe),
            "ask" | "default" | "prompt" => Ok(PermissionMode::Ask),
            "allow-all" | "allow_all" | "allowall" | "bypass" | "yolo" => {
                Ok(PermissionMode::AllowAll)
            }
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}
