//! Storage module for forgeguard
//!
//! - `json`: JSON - 설정 파일 저장/로드
//!
//! 세션 권한 상태는 메모리에만 있다. 디스크에는 설정만 저장된다.

mod json;

pub use json::JsonStore;
pub(crate) use json::load_file;
