//! Guard Config - 통합 설정
//!
//! 글로벌 → 프로젝트 → 환경 변수 순서로 병합된다 (뒤쪽이 우선).

use crate::permission::PermissionMode;
use crate::storage::{load_file, JsonStore};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 설정 파일명
pub const GUARD_CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the default permission mode
pub const DEFAULT_MODE_ENV: &str = "FORGEGUARD_PERMISSION_MODE";

/// forgeguard 통합 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardConfig {
    /// 버전 (마이그레이션용)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default permission mode for new sessions.
    ///
    /// Kept as raw text so that a corrupted value can fail closed to `ask`
    /// instead of rejecting the whole file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mode: Option<String>,

    /// 로그 레벨 (tracing EnvFilter 문법)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_mode: None,
            log_level: None,
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 + 환경 변수 병합 로드
    pub fn load() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(global) = JsonStore::global() {
            config.merge_from(&global)?;
        }

        if let Ok(project) = JsonStore::current_project() {
            config.merge_from(&project)?;
        }

        config.apply_env_override(std::env::var(DEFAULT_MODE_ENV).ok());
        Ok(config)
    }

    /// 단일 파일 로드 (환경 변수는 여전히 적용)
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::new();
        config.merge(load_file(path)?);
        config.apply_env_override(std::env::var(DEFAULT_MODE_ENV).ok());
        Ok(config)
    }

    /// `store`의 config.json으로 저장
    pub fn save_to(&self, store: &JsonStore) -> Result<()> {
        store.save(GUARD_CONFIG_FILE, self)
    }

    fn merge_from(&mut self, store: &JsonStore) -> Result<()> {
        if let Some(other) = store.load_optional::<GuardConfig>(GUARD_CONFIG_FILE)? {
            tracing::debug!(dir = %store.base_dir().display(), "Loaded guard config");
            self.merge(other);
        }
        Ok(())
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: GuardConfig) {
        self.version = other.version;
        if other.default_mode.is_some() {
            self.default_mode = other.default_mode;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Apply the value of [`DEFAULT_MODE_ENV`], ignoring unset or blank values
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.default_mode = Some(value);
        }
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Default mode for new sessions; unknown values fail closed to `ask`
    pub fn resolved_default_mode(&self) -> PermissionMode {
        self.default_mode
            .as_deref()
            .map(PermissionMode::parse_or_ask)
            .unwrap_or_default()
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn default_mode(mut self, mode: PermissionMode) -> Self {
        self.default_mode = Some(mode.to_string());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }
}
