//! Config - 통합 설정 관리
//!
//! - `guard.rs` - GuardConfig (기본 권한 모드, 로그 레벨)

mod guard;

pub use guard::{GuardConfig, DEFAULT_MODE_ENV, GUARD_CONFIG_FILE};
