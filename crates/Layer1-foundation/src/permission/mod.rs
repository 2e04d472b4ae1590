//! Permission vocabulary shared across forgeguard crates
//!
//! - `mode`: 세션 권한 모드 (safe / ask / allow-all)
//! - `result`: 권한 판정 결과 (allow / block / prompt)
//!
//! 판정 로직 자체는 forgeguard-core에 있다.

mod mode;
mod result;

pub use mode::PermissionMode;
pub use result::{DecisionKind, PermissionCheckResult};
