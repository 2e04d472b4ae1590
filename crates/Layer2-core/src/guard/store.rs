//! Session permission store
//!
//! In-memory, per-session state: current mode and the approve/deny memo.
//! The store itself is not synchronized; wrap it (see `PermissionGate`) when shared.

use super::classifier::normalize;
use chrono::{DateTime, Utc};
use forgeguard_foundation::PermissionMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Memoized human decision for one normalized command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandDecision {
    Approved,
    Denied,
}

/// State for one agent session
#[derive(Debug, Clone)]
pub struct SessionPermissionState {
    mode: PermissionMode,
    created_at: DateTime<Utc>,
    /// 명령어 → 결정. 하나의 맵이라 승인/거부가 동시에 존재할 수 없다.
    decisions: HashMap<String, CommandDecision>,
}

impl SessionPermissionState {
    pub fn new(mode: PermissionMode) -> Self {
        Self {
            mode,
            created_at: Utc::now(),
            decisions: HashMap::new(),
        }
    }

    pub fn mode(&self) -> PermissionMode {
        self.mode
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Memoized decision for a command (normalized before lookup)
    pub fn decision(&self, command: &str) -> Option<CommandDecision> {
        self.decisions.get(&normalize(command)).copied()
    }

    pub fn is_approved(&self, command: &str) -> bool {
        self.decision(command) == Some(CommandDecision::Approved)
    }

    pub fn is_denied(&self, command: &str) -> bool {
        self.decision(command) == Some(CommandDecision::Denied)
    }

    pub fn approved_commands(&self) -> impl Iterator<Item = &str> {
        self.commands_with(CommandDecision::Approved)
    }

    pub fn denied_commands(&self) -> impl Iterator<Item = &str> {
        self.commands_with(CommandDecision::Denied)
    }

    fn commands_with(&self, decision: CommandDecision) -> impl Iterator<Item = &str> {
        self.decisions
            .iter()
            .filter(move |(_, d)| **d == decision)
            .map(|(command, _)| command.as_str())
    }

    fn record(&mut self, command: &str, decision: CommandDecision) {
        self.decisions.insert(normalize(command), decision);
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mode: self.mode,
            approved_count: self.approved_commands().count(),
            denied_count: self.denied_commands().count(),
            created_at: self.created_at,
        }
    }
}

/// Read-only diagnostic view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub mode: PermissionMode,
    pub approved_count: usize,
    pub denied_count: usize,
    pub created_at: DateTime<Utc>,
}

/// All session states, keyed by opaque session id
#[derive(Debug, Default)]
pub struct SessionPermissionStore {
    sessions: HashMap<String, SessionPermissionState>,
    default_mode: PermissionMode,
}

impl SessionPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose new sessions start in `default_mode`
    pub fn with_default_mode(default_mode: PermissionMode) -> Self {
        Self {
            sessions: HashMap::new(),
            default_mode,
        }
    }

    // ========================================================================
    // Default mode
    // ========================================================================

    pub fn default_mode(&self) -> PermissionMode {
        self.default_mode
    }

    /// Applies to sessions created afterwards; existing sessions keep their mode
    pub fn set_default_mode(&mut self, mode: PermissionMode) {
        if self.default_mode != mode {
            tracing::info!(from = %self.default_mode, to = %mode, "Default permission mode changed");
        }
        self.default_mode = mode;
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Existing state, or a fresh one in the default mode
    pub fn get_or_create(&mut self, session_id: &str) -> &mut SessionPermissionState {
        let default_mode = self.default_mode;
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id, mode = %default_mode, "Created permission session");
                SessionPermissionState::new(default_mode)
            })
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionPermissionState> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn clear(&mut self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::info!(session_id, "Cleared permission session");
        }
        removed
    }

    /// Forget approvals and denials but keep the session's mode and creation time.
    /// Returns how many decisions were dropped; unknown sessions are not created.
    pub fn clear_decisions(&mut self, session_id: &str) -> usize {
        let Some(state) = self.sessions.get_mut(session_id) else {
            return 0;
        };
        let count = state.decisions.len();
        state.decisions.clear();
        tracing::info!(session_id, count, "Cleared session decisions");
        count
    }

    pub fn clear_all(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        tracing::info!(count, "Cleared all permission sessions");
    }

    // ========================================================================
    // Mode
    // ========================================================================

    pub fn get_mode(&mut self, session_id: &str) -> PermissionMode {
        self.get_or_create(session_id).mode
    }

    /// Change the session's mode. Always drops every memoized decision.
    pub fn set_mode(&mut self, session_id: &str, mode: PermissionMode) {
        let state = self.get_or_create(session_id);
        let previous = state.mode;
        state.mode = mode;
        state.decisions.clear();
        tracing::info!(session_id, from = %previous, to = %mode, "Session permission mode changed");
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    pub fn approve(&mut self, session_id: &str, command: &str) {
        self.get_or_create(session_id)
            .record(command, CommandDecision::Approved);
        tracing::debug!(session_id, command, "Command approved for session");
    }

    pub fn deny(&mut self, session_id: &str, command: &str) {
        self.get_or_create(session_id)
            .record(command, CommandDecision::Denied);
        tracing::debug!(session_id, command, "Command denied for session");
    }

    /// Summary of an existing session; does not create one
    pub fn summary(&self, session_id: &str) -> Option<SessionSummary> {
        self.sessions.get(session_id).map(|s| s.summary())
    }
}
