use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 파티 최적화 전략
///
/// 선언 순서가 곧 동점 처리 순서다 (Efficiency < Balance < Synergy < Safety < Hybrid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// 명성 중심
    Efficiency,
    /// 역할 균형 중심
    Balance,
    /// 직업 조합 시너지 중심
    Synergy,
    /// 안전 마진 중심
    Safety,
    /// Efficiency/Balance/Synergy 가중 비교
    Hybrid,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Efficiency,
        Strategy::Balance,
        Strategy::Synergy,
        Strategy::Safety,
        Strategy::Hybrid,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Strategy::Efficiency => "efficiency",
            Strategy::Balance => "balance",
            Strategy::Synergy => "synergy",
            Strategy::Safety => "safety",
            Strategy::Hybrid => "hybrid",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Efficiency => "Highest prestige first: 3 dealers + 1 buffer, pinned characters placed first",
            Strategy::Balance => "Even role spread: 2 dealers + 1 buffer + 1 pinned or best remaining",
            Strategy::Synergy => "Prestige-sorted prefix of the roles forming the highest-weighted pairs",
            Strategy::Safety => "Efficiency fill over characters clearing the prestige floor by the safety margin",
            Strategy::Hybrid => "Runs efficiency, balance and synergy and keeps the best tier-weighted result",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efficiency" => Ok(Strategy::Efficiency),
            "balance" | "balanced" => Ok(Strategy::Balance),
            "synergy" => Ok(Strategy::Synergy),
            "safety" => Ok(Strategy::Safety),
            "hybrid" => Ok(Strategy::Hybrid),
            other => Err(format!("Unknown strategy: {}", other)),
        }
    }
}
