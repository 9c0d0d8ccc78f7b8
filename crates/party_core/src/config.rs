//! Engine thresholds
//!
//! 매직 넘버를 한 곳에서 관리한다. 값은 기존 운영 값을 그대로 유지한다.

use crate::models::DifficultyTier;
use serde::{Deserialize, Serialize};

/// 편성/채점 파라미터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === 8인 편성 ===
    /// 두 파티 점수 차가 이 값 미만이면 밸런스된 것으로 본다 (기본: 1000)
    pub balanced_gap_threshold: f64,
    /// 합산 점수의 점수 차 페널티 계수 (기본: 0.1)
    pub pair_gap_penalty: f64,

    // === Safety ===
    /// 최소 명성 대비 안전 마진 (기본: 0.2 = 20%)
    pub safety_margin: f64,

    // === Efficiency 쿼터 ===
    /// 딜러 슬롯 수 (기본: 3)
    pub dealer_quota: usize,
    /// 버퍼 슬롯 수 (기본: 1)
    pub buffer_quota: usize,

    // === Balance 목표 ===
    /// 딜러 목표 (기본: 2)
    pub balance_dealer_target: usize,
    /// 버퍼 목표 (기본: 1)
    pub balance_buffer_target: usize,
    /// 업둥이 목표 (기본: 1)
    pub balance_pinned_target: usize,

    // === 추천 정책 ===
    /// 이 등급 이상이면 Synergy/Balance를 추천한다 (기본: Raid)
    pub high_tier: DifficultyTier,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            balanced_gap_threshold: 1000.0,
            pair_gap_penalty: 0.1,

            safety_margin: 0.2,

            dealer_quota: 3,
            buffer_quota: 1,

            balance_dealer_target: 2,
            balance_buffer_target: 1,
            balance_pinned_target: 1,

            high_tier: DifficultyTier::Raid,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.safety_margin < 0.0 {
            return Err(format!("safety_margin must be >= 0, got {}", self.safety_margin));
        }
        if self.balanced_gap_threshold < 0.0 {
            return Err(format!(
                "balanced_gap_threshold must be >= 0, got {}",
                self.balanced_gap_threshold
            ));
        }
        if self.balance_dealer_target == 0
            || self.balance_buffer_target == 0
            || self.balance_pinned_target == 0
        {
            return Err("balance targets must be non-zero".to_string());
        }
        Ok(())
    }

    pub fn is_high_tier(&self, tier: DifficultyTier) -> bool {
        tier >= self.high_tier
    }
}
