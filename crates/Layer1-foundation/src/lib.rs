//! # forgeguard-foundation
//!
//! Foundation layer for forgeguard:
//! - Permission: 권한 모드와 판정 결과 타입 (PermissionMode, PermissionCheckResult)
//! - Config: 통합 설정 (GuardConfig)
//! - Storage: JsonStore (설정 파일)
//! - Error: 공통 에러 타입
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Host (forgeguard-cli, agent runtime ...)    │
//! │                     │                        │
//! │                     ▼                        │
//! │      PermissionGate (forgeguard-core)        │
//! │      ├── PermissionEngine (decision order)   │
//! │      ├── Classifier + PatternCatalog         │
//! │      └── SessionPermissionStore              │
//! │                     │                        │
//! │                     ▼                        │
//! │   PermissionCheckResult (allow/block/prompt) │
//! └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod permission;
pub mod storage;

pub use config::{GuardConfig, DEFAULT_MODE_ENV, GUARD_CONFIG_FILE};
pub use error::{Error, Result};
pub use permission::{DecisionKind, PermissionCheckResult, PermissionMode};
pub use storage::JsonStore;
