//! Error types for forgeguard
//!
//! 권한 판정 결과(allow/block/prompt)는 에러가 아니라 데이터로 전달된다.
//! 여기 정의된 에러는 설정 로드, 입력 파싱 같은 주변 경로에서만 사용한다.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// forgeguard 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid permission mode: {0}")]
    InvalidMode(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
