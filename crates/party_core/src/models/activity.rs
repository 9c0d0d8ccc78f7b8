use serde::{Deserialize, Serialize};

/// 던전 난이도 등급 (서열형)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Normal,
    Hard,
    Raid,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] =
        [DifficultyTier::Normal, DifficultyTier::Hard, DifficultyTier::Raid];

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Normal => "normal",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Raid => "raid",
        }
    }
}

impl Default for DifficultyTier {
    fn default() -> Self {
        DifficultyTier::Normal
    }
}

/// 활동(던전/레이드) 참가 조건
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRequirement {
    /// 정규화된 활동 키 (예: "nabel"). 미등록 활동이면 입력 이름을 정규화한 값.
    pub key: String,
    /// 같은 활동을 가리키는 다른 이름들 (정규화됨)
    #[serde(default)]
    pub aliases: Vec<String>,
    pub min_prestige: u64,
    pub min_dealers: u8,
    pub min_buffers: u8,
    #[serde(default)]
    pub difficulty_tier: DifficultyTier,
    /// 알 수 없는 활동이라 기본 조건으로 대체되었는지 여부
    #[serde(default)]
    pub is_fallback: bool,
}

impl ActivityRequirement {
    /// 키와 별칭 전체 (제외/클리어 목록 매칭용)
    pub fn match_keys(&self) -> Vec<&str> {
        std::iter::once(self.key.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }

    /// 안전 전략 컷 (minPrestige * (1 + margin))
    pub fn safety_floor(&self, margin: f64) -> f64 {
        self.min_prestige as f64 * (1.0 + margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(DifficultyTier::Normal < DifficultyTier::Hard);
        assert!(DifficultyTier::Hard < DifficultyTier::Raid);
    }

    #[test]
    fn test_safety_floor() {
        let req = ActivityRequirement {
            key: "test".to_string(),
            aliases: vec![],
            min_prestige: 50_000,
            min_dealers: 3,
            min_buffers: 1,
            difficulty_tier: DifficultyTier::Normal,
            is_fallback: false,
        };
        assert!((req.safety_floor(0.2) - 60_000.0).abs() < 1e-9);
    }
}
