//! Permission guard
//!
//! - `catalog`: 정적 패턴 테이블 (always-blocked, 구문 차단, 읽기 전용 allowlist, 도구 목록)
//! - `mode_config`: 모드 → 정책 변환
//! - `classifier`: 명령어 정규화/분류/복합 명령 분리
//! - `store`: 세션별 모드와 승인/거부 메모
//! - `engine`: 판정 순서
//! - `gate`: 락으로 감싼 호스트용 API

pub mod catalog;
pub mod classifier;
pub mod engine;
pub mod gate;
pub mod mode_config;
pub mod store;

pub use catalog::{
    canonical_tool_name, catalog, is_shell_tool, BlockedConstruct, CommandPattern,
    PatternCatalog, BLOCKED_TOOLS, SHELL_TOOLS,
};
pub use classifier::{
    classify, has_blocked_construct, is_always_blocked, is_compound, is_compound_safe,
    is_read_only, matching_read_only_pattern, normalize, split_compound, Classification,
    SegmentClassification,
};
pub use engine::PermissionEngine;
pub use gate::PermissionGate;
pub use mode_config::{resolve_mode_config, resolve_mode_config_str, ModeConfig};
pub use store::{CommandDecision, SessionPermissionState, SessionPermissionStore, SessionSummary};
