//! Permission check result
//!
//! Every check returns one of three shapes:
//! - allow: `{ allowed: true }`
//! - hard block: `{ allowed: false, reason }`
//! - prompt: `{ allowed: false, requiresPrompt: true, reason }`

use serde::{Deserialize, Serialize};

/// Decision returned by the permission engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionCheckResult {
    /// Primary verdict
    pub allowed: bool,

    /// Human-readable explanation, always set on a block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// When true the caller should ask the user instead of rejecting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_prompt: Option<bool>,
}

/// Coarse classification of a [`PermissionCheckResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    Allow,
    Block,
    Prompt,
}

impl PermissionCheckResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            requires_prompt: None,
        }
    }

    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            requires_prompt: None,
        }
    }

    pub fn prompt(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            requires_prompt: Some(true),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// The caller must obtain a human decision
    pub fn needs_prompt(&self) -> bool {
        !self.allowed && self.requires_prompt.unwrap_or(false)
    }

    /// Rejected with no way through for this session
    pub fn is_hard_block(&self) -> bool {
        !self.allowed && !self.requires_prompt.unwrap_or(false)
    }

    pub fn kind(&self) -> DecisionKind {
        if self.allowed {
            DecisionKind::Allow
        } else if self.needs_prompt() {
            DecisionKind::Prompt
        } else {
            DecisionKind::Block
        }
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}
