//! forgeguard-core: command permission engine
//!
//! Layer2 - 에이전트가 실행하려는 셸 명령과 도구 호출을 판정하는 레이어
//!
//! # 주요 모듈
//!
//! - `guard`: 패턴 카탈로그, 분류기, 세션 저장소, 판정 엔진, PermissionGate
//!
//! # 사용 예시
//!
//! ```
//! use forgeguard_core::{PermissionGate, PermissionMode};
//!
//! let gate = PermissionGate::with_default_mode(PermissionMode::Ask);
//!
//! assert!(gate.check_bash_permission("session-1", "git status").is_allowed());
//!
//! let result = gate.check_bash_permission("session-1", "cargo build");
//! if result.needs_prompt() {
//!     // 사용자 확인 후
//!     gate.approve_command("session-1", "cargo build");
//! }
//! assert!(gate.check_bash_permission("session-1", "cargo build").is_allowed());
//! ```

pub mod guard;

pub use guard::{
    classify, normalize, resolve_mode_config, resolve_mode_config_str, split_compound,
    BlockedConstruct, Classification, CommandDecision, ModeConfig, PermissionEngine,
    PermissionGate, SessionPermissionState, SessionPermissionStore, SessionSummary,
};

// Re-exports from foundation
pub use forgeguard_foundation::{DecisionKind, PermissionCheckResult, PermissionMode};
