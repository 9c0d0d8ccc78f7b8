//! Reference tables - Job roles, activity requirements, scoring weights
//!
//! YAML 파일에서 기준 데이터를 로드하고 캐싱합니다.
//!
//! 전역 테이블은 스냅샷(`Arc`) 단위로 교체됩니다. 진행 중인 편성 요청은
//! 시작 시점의 스냅샷을 계속 사용하므로 교체 도중 섞인 상태를 보지 않습니다.
//!
//! ## 사용법
//!
//! ```rust
//! use party_core::tables;
//!
//! let tables = tables::snapshot();
//! assert!(tables.activities.lookup("nabel").is_some());
//! ```

pub mod activities;
pub mod jobs;
pub mod weights;

pub use activities::{normalize_activity_name, ActivityEntry, ActivityTable};
pub use jobs::{normalize_job_label, JobEntry, JobTable};
pub use weights::{HybridWeights, SynergyWeights, WeightTable};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use once_cell::sync::Lazy;
use std::sync::{Arc, PoisonError, RwLock};

// =============================================================================
// Embedded YAML Data
// =============================================================================

/// 직업 분류표 (컴파일 타임 임베딩)
pub const JOBS_YAML: &str = include_str!("jobs.yaml");

/// 활동 참가 조건
pub const ACTIVITIES_YAML: &str = include_str!("activities.yaml");

/// 시너지/하이브리드 가중치
pub const WEIGHTS_YAML: &str = include_str!("weights.yaml");

/// 편성에 필요한 기준 데이터 묶음
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub config: EngineConfig,
    pub jobs: JobTable,
    pub activities: ActivityTable,
    pub weights: WeightTable,
}

impl ReferenceTables {
    /// 임베딩된 기본 데이터
    ///
    /// # Panics
    ///
    /// YAML 파싱에 실패하면 패닉합니다 (컴파일 타임에 임베딩된 데이터이므로
    /// 정상적인 빌드에서는 발생하지 않음).
    pub fn embedded() -> Self {
        Self::from_yaml_parts(JOBS_YAML, ACTIVITIES_YAML, WEIGHTS_YAML, EngineConfig::default())
            .expect("Failed to parse embedded reference tables")
    }

    pub fn from_yaml_parts(
        jobs_yaml: &str,
        activities_yaml: &str,
        weights_yaml: &str,
        config: EngineConfig,
    ) -> Result<Self> {
        let tables = Self {
            config,
            jobs: JobTable::from_yaml(jobs_yaml)?,
            activities: ActivityTable::from_yaml(activities_yaml)?,
            weights: WeightTable::from_yaml(weights_yaml)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<()> {
        self.config.validate().map_err(EngineError::TableLoad)?;
        if self.jobs.is_empty() && self.jobs.buffer_keywords().is_empty() {
            return Err(EngineError::TableLoad("job table is empty".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Global Snapshot
// =============================================================================

static TABLES: Lazy<RwLock<Arc<ReferenceTables>>> =
    Lazy::new(|| RwLock::new(Arc::new(ReferenceTables::embedded())));

/// 현재 기준 데이터 스냅샷
pub fn snapshot() -> Arc<ReferenceTables> {
    TABLES.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// 기준 데이터 교체. 검증에 실패하면 기존 데이터를 유지한다.
pub fn install(tables: ReferenceTables) -> Result<()> {
    tables.validate()?;
    log::info!(
        "Installing reference tables: {} job entries, {} activities",
        tables.jobs.len(),
        tables.activities.entries().len()
    );
    *TABLES.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(tables);
    Ok(())
}

/// 임베딩된 기본 데이터로 되돌린다.
pub fn reset() {
    log::info!("Resetting reference tables to embedded defaults");
    *TABLES.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(ReferenceTables::embedded());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DifficultyTier;

    #[test]
    fn test_embedded_tables_parse() {
        let tables = ReferenceTables::embedded();
        assert!(tables.jobs.len() > 20);
        assert_eq!(tables.activities.lookup("nabel").map(|a| a.min_prestige), Some(63_000));
        assert_eq!(tables.activities.lookup("안개신").map(|a| a.min_buffers), Some(2));
        assert_eq!(tables.weights.synergy_for(DifficultyTier::Raid).dealer_buffer, 0.9);
        assert_eq!(tables.weights.hybrid_for(DifficultyTier::Hard).efficiency, 0.5);
    }

    #[test]
    fn test_install_keeps_existing_activities() {
        let base = snapshot();
        let extra = ActivityEntry {
            key: "test-only-activity".to_string(),
            aliases: vec![],
            min_prestige: 12_345,
            min_dealers: 2,
            min_buffers: 1,
            difficulty_tier: DifficultyTier::Normal,
        };
        let mut tables = (*base).clone();
        tables.activities = base.activities.with_entry(extra).unwrap();
        install(tables).unwrap();

        let current = snapshot();
        assert_eq!(current.activities.lookup("test-only-activity").map(|a| a.min_prestige), Some(12_345));
        assert!(current.activities.lookup("nabel").is_some());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut tables = ReferenceTables::embedded();
        tables.config.safety_margin = -1.0;
        assert!(install(tables).is_err());
        assert!(snapshot().config.validate().is_ok());
    }
}
