//! PermissionGate - host-facing facade
//!
//! 엔진과 세션 저장소를 하나의 락 뒤에 묶는다. 모든 API는 `&self`로 호출 가능하므로
//! `Arc<PermissionGate>`로 여러 스레드에서 공유할 수 있다.

use super::engine::PermissionEngine;
use super::store::{SessionPermissionStore, SessionSummary};
use forgeguard_foundation::{GuardConfig, PermissionCheckResult, PermissionMode};
use parking_lot::Mutex;
use serde_json::Value;

/// Serialized access point for every permission operation
#[derive(Debug, Default)]
pub struct PermissionGate {
    engine: PermissionEngine,
    store: Mutex<SessionPermissionStore>,
}

impl PermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_mode(mode: PermissionMode) -> Self {
        Self {
            engine: PermissionEngine::new(),
            store: Mutex::new(SessionPermissionStore::with_default_mode(mode)),
        }
    }

    /// Default mode taken from merged configuration (fails closed to `ask`)
    pub fn from_config(config: &GuardConfig) -> Self {
        Self::with_default_mode(config.resolved_default_mode())
    }

    // ========================================================================
    // Checks
    // ========================================================================

    pub fn check_bash_permission(&self, session_id: &str, command: &str) -> PermissionCheckResult {
        let mut store = self.store.lock();
        self.engine
            .check_bash_permission(&mut store, session_id, command)
    }

    pub fn check_tool_permission(
        &self,
        session_id: &str,
        tool_name: &str,
        args: Option<&Value>,
    ) -> PermissionCheckResult {
        let mut store = self.store.lock();
        self.engine
            .check_tool_permission(&mut store, session_id, tool_name, args)
    }

    // ========================================================================
    // Session mode
    // ========================================================================

    pub fn get_session_mode(&self, session_id: &str) -> PermissionMode {
        self.store.lock().get_mode(session_id)
    }

    pub fn set_session_mode(&self, session_id: &str, mode: PermissionMode) {
        self.store.lock().set_mode(session_id, mode);
    }

    // ========================================================================
    // Human decisions
    // ========================================================================

    pub fn approve_command(&self, session_id: &str, command: &str) {
        self.store.lock().approve(session_id, command);
    }

    pub fn deny_command(&self, session_id: &str, command: &str) {
        self.store.lock().deny(session_id, command);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn clear_session_state(&self, session_id: &str) {
        self.store.lock().clear(session_id);
    }

    /// Drop the session's approvals and denials; mode and creation time stay
    pub fn clear_session_decisions(&self, session_id: &str) -> usize {
        self.store.lock().clear_decisions(session_id)
    }

    pub fn clear_all_session_states(&self) {
        self.store.lock().clear_all();
    }

    pub fn get_default_permission_mode(&self) -> PermissionMode {
        self.store.lock().default_mode()
    }

    pub fn set_default_permission_mode(&self, mode: PermissionMode) {
        self.store.lock().set_default_mode(mode);
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    pub fn session_summary(&self, session_id: &str) -> Option<SessionSummary> {
        self.store.lock().summary(session_id)
    }

    pub fn session_count(&self) -> usize {
        self.store.lock().len()
    }
}
