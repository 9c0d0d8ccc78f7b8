use crate::error::{EngineError, Result};
use crate::models::{DifficultyTier, RoleClass, Strategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 역할 쌍별 시너지 가중치
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynergyWeights {
    pub dealer_dealer: f64,
    pub dealer_buffer: f64,
    pub buffer_buffer: f64,
    /// Other 역할이 포함된 모든 쌍
    pub with_other: f64,
}

impl Default for SynergyWeights {
    fn default() -> Self {
        Self { dealer_dealer: 0.7, dealer_buffer: 0.8, buffer_buffer: 0.6, with_other: 0.6 }
    }
}

impl SynergyWeights {
    /// 순서 무관 역할 쌍 가중치
    pub fn pair(&self, a: RoleClass, b: RoleClass) -> f64 {
        match (a, b) {
            (RoleClass::Dealer, RoleClass::Dealer) => self.dealer_dealer,
            (RoleClass::Dealer, RoleClass::Buffer) | (RoleClass::Buffer, RoleClass::Dealer) => {
                self.dealer_buffer
            }
            (RoleClass::Buffer, RoleClass::Buffer) => self.buffer_buffer,
            _ => self.with_other,
        }
    }

    /// 가중치 내림차순 역할 쌍. 동점은 (Dealer, Buffer, Other) 순서로 앞선 쌍이 먼저.
    pub fn ranked_pairs(&self) -> Vec<((RoleClass, RoleClass), f64)> {
        let mut pairs = vec![
            ((RoleClass::Dealer, RoleClass::Dealer), self.dealer_dealer),
            ((RoleClass::Dealer, RoleClass::Buffer), self.dealer_buffer),
            ((RoleClass::Dealer, RoleClass::Other), self.with_other),
            ((RoleClass::Buffer, RoleClass::Buffer), self.buffer_buffer),
            ((RoleClass::Buffer, RoleClass::Other), self.with_other),
            ((RoleClass::Other, RoleClass::Other), self.with_other),
        ];
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
        pairs
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let all = [self.dealer_dealer, self.dealer_buffer, self.buffer_buffer, self.with_other];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("synergy weights must be finite and >= 0: {:?}", self));
        }
        Ok(())
    }
}

/// 하이브리드 전략의 전략별 가중치
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HybridWeights {
    pub efficiency: f64,
    pub balance: f64,
    pub synergy: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self { efficiency: 0.5, balance: 0.3, synergy: 0.2 }
    }
}

impl HybridWeights {
    pub fn weight_for(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Efficiency => self.efficiency,
            Strategy::Balance => self.balance,
            Strategy::Synergy => self.synergy,
            Strategy::Safety | Strategy::Hybrid => 0.0,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let all = [self.efficiency, self.balance, self.synergy];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(format!("hybrid weights must be finite and >= 0: {:?}", self));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightTableFile {
    #[serde(default)]
    pub version: u8,
    #[serde(default)]
    pub synergy: BTreeMap<DifficultyTier, SynergyWeights>,
    #[serde(default)]
    pub hybrid: BTreeMap<DifficultyTier, HybridWeights>,
}

/// 난이도 등급별 가중치 표
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    synergy: BTreeMap<DifficultyTier, SynergyWeights>,
    hybrid: BTreeMap<DifficultyTier, HybridWeights>,
}

impl WeightTable {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: WeightTableFile = serde_yaml::from_str(yaml)?;
        Self::from_file(file)
    }

    pub fn from_file(file: WeightTableFile) -> Result<Self> {
        for weights in file.synergy.values() {
            weights.validate().map_err(EngineError::TableLoad)?;
        }
        for weights in file.hybrid.values() {
            weights.validate().map_err(EngineError::TableLoad)?;
        }
        Ok(Self { synergy: file.synergy, hybrid: file.hybrid })
    }

    /// 해당 등급이 없으면 가장 가까운 하위 등급, 그것도 없으면 기본값
    pub fn synergy_for(&self, tier: DifficultyTier) -> SynergyWeights {
        self.synergy.range(..=tier).next_back().map(|(_, w)| *w).unwrap_or_default()
    }

    pub fn hybrid_for(&self, tier: DifficultyTier) -> HybridWeights {
        self.hybrid.range(..=tier).next_back().map(|(_, w)| *w).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_symmetric() {
        let w = SynergyWeights::default();
        assert_eq!(w.pair(RoleClass::Dealer, RoleClass::Buffer), w.pair(RoleClass::Buffer, RoleClass::Dealer));
        assert_eq!(w.pair(RoleClass::Other, RoleClass::Dealer), w.with_other);
    }

    #[test]
    fn test_ranked_pairs_top_is_dealer_buffer() {
        let w = SynergyWeights::default();
        let ranked = w.ranked_pairs();
        assert_eq!(ranked[0].0, (RoleClass::Dealer, RoleClass::Buffer));
    }

    #[test]
    fn test_missing_tier_falls_back_to_lower() {
        let yaml = r#"
synergy:
  normal: { dealer_dealer: 0.1, dealer_buffer: 0.2, buffer_buffer: 0.3, with_other: 0.4 }
"#;
        let table = WeightTable::from_yaml(yaml).unwrap();
        assert_eq!(table.synergy_for(DifficultyTier::Raid).dealer_dealer, 0.1);
        assert_eq!(table.hybrid_for(DifficultyTier::Raid), HybridWeights::default());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let yaml = r#"
synergy:
  raid: { dealer_dealer: -1.0, dealer_buffer: 0.2, buffer_buffer: 0.3, with_other: 0.4 }
"#;
        assert!(WeightTable::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_hybrid_weight_rejected() {
        let yaml = r#"
hybrid:
  hard: { efficiency: 0.5, balance: -0.3, synergy: 0.2 }
"#;
        assert!(matches!(WeightTable::from_yaml(yaml), Err(EngineError::TableLoad(_))));

        let file = WeightTableFile {
            hybrid: [(DifficultyTier::Raid, HybridWeights { efficiency: f64::NAN, ..HybridWeights::default() })]
                .into_iter()
                .collect(),
            ..WeightTableFile::default()
        };
        assert!(WeightTable::from_file(file).is_err());
    }
}
