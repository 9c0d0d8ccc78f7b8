use super::activity::ActivityRequirement;
use super::character::{CharacterRecord, RoleClass};
use super::strategy::Strategy;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// 한 파티(스쿼드)의 슬롯 수
pub const SQUAD_SIZE: usize = 4;

/// 요청 가능한 파티 인원
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartySize {
    /// 4인 단일 파티
    Four,
    /// 4인 파티 두 개 (8인 레이드)
    Eight,
}

impl PartySize {
    pub fn from_members(members: usize) -> Result<Self> {
        match members {
            4 => Ok(PartySize::Four),
            8 => Ok(PartySize::Eight),
            other => Err(EngineError::UnsupportedPartySize(other)),
        }
    }

    pub fn members(&self) -> usize {
        match self {
            PartySize::Four => SQUAD_SIZE,
            PartySize::Eight => SQUAD_SIZE * 2,
        }
    }
}

/// 파티 슬롯. 빈 슬롯은 정상 상태다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub occupant: Option<CharacterRecord>,
    pub assigned_role: Option<RoleClass>,
}

impl Slot {
    pub fn empty(index: usize) -> Self {
        Self { index, occupant: None, assigned_role: None }
    }

    pub fn occupied(index: usize, character: CharacterRecord, role: RoleClass) -> Self {
        Self { index, occupant: Some(character), assigned_role: Some(role) }
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub fn occupant_id(&self) -> Option<&str> {
        self.occupant.as_ref().map(|c| c.id.as_str())
    }

    /// 점유자의 역할. 역할이 비어 있는 점유 슬롯은 딜러로 본다.
    pub fn role(&self) -> Option<RoleClass> {
        self.occupant.as_ref().map(|_| self.assigned_role.unwrap_or(RoleClass::Dealer))
    }
}

/// 전략별 점수. 스쿼드마다 정확히 하나만 존재한다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SquadScore {
    Efficiency(f64),
    Balance(f64),
    Synergy(f64),
    Safety(f64),
}

impl SquadScore {
    pub fn value(&self) -> f64 {
        match *self {
            SquadScore::Efficiency(v)
            | SquadScore::Balance(v)
            | SquadScore::Synergy(v)
            | SquadScore::Safety(v) => v,
        }
    }

    /// 이 점수를 만든 전략
    pub fn strategy(&self) -> Strategy {
        match self {
            SquadScore::Efficiency(_) => Strategy::Efficiency,
            SquadScore::Balance(_) => Strategy::Balance,
            SquadScore::Synergy(_) => Strategy::Synergy,
            SquadScore::Safety(_) => Strategy::Safety,
        }
    }
}

/// 스쿼드 전투 수치 합계
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquadStats {
    pub member_count: usize,
    pub total_offensive_power: u64,
    pub total_support_power: u64,
    /// 딜량 + 버프력 * 1.5
    pub combined_power: f64,
}

/// 4인 스쿼드
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    /// 점수 계산에 쓰이는 전략. 항상 `score.strategy()`와 같다.
    pub strategy: Strategy,
    pub activity: ActivityRequirement,
    pub slots: Vec<Slot>,
    pub score: SquadScore,
}

impl Squad {
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn occupants(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.slots.iter().filter_map(|s| s.occupant.as_ref())
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.size() - self.occupied_count()
    }

    pub fn member_ids(&self) -> Vec<&str> {
        self.slots.iter().filter_map(Slot::occupant_id).collect()
    }

    pub fn contains(&self, character_id: &str) -> bool {
        self.slots.iter().any(|s| s.occupant_id() == Some(character_id))
    }

    pub fn count_role(&self, role: RoleClass) -> usize {
        self.slots
            .iter()
            .filter(|s| s.role() == Some(role))
            .count()
    }

    pub fn pinned_count(&self) -> usize {
        self.occupants().filter(|c| c.pinned).count()
    }

    /// 명성 합계. 오버플로 시 `u64::MAX`에서 멈춘다.
    pub fn total_prestige(&self) -> u64 {
        self.occupants().map(|c| c.prestige).fold(0, u64::saturating_add)
    }

    /// 슬롯 번호를 0..size-1로 다시 매긴다.
    pub fn renumber(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.index = i;
        }
    }

    pub fn stats(&self) -> SquadStats {
        let total_offensive_power = self
            .occupants()
            .map(|c| c.combat_stat.offensive_power)
            .fold(0, u64::saturating_add);
        let total_support_power = self
            .occupants()
            .map(|c| c.combat_stat.support_power)
            .fold(0, u64::saturating_add);
        SquadStats {
            member_count: self.occupied_count(),
            total_offensive_power,
            total_support_power,
            combined_power: total_offensive_power as f64 + total_support_power as f64 * 1.5,
        }
    }
}

/// 8인 편성 분석
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairAnalysis {
    pub total_dealers: usize,
    pub total_buffers: usize,
    pub total_pinned: usize,
    pub total_prestige: u64,
    pub average_prestige: f64,
    pub first_score: f64,
    pub second_score: f64,
}

/// 8인 레이드용 스쿼드 두 개
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPair {
    pub first: Squad,
    pub second: Squad,
    pub efficiency_gap: f64,
    pub is_balanced: bool,
    /// avg(score1, score2) - penalty * gap
    pub combined_score: f64,
    pub analysis: PairAnalysis,
}

impl SquadPair {
    /// 두 스쿼드로부터 파생 지표를 계산해 묶는다.
    pub fn assemble(first: Squad, second: Squad, config: &EngineConfig) -> Self {
        let first_score = first.score.value();
        let second_score = second.score.value();
        let efficiency_gap = (first_score - second_score).abs();
        let combined_score =
            (first_score + second_score) / 2.0 - config.pair_gap_penalty * efficiency_gap;

        let occupied = first.occupied_count() + second.occupied_count();
        let total_prestige = first.total_prestige().saturating_add(second.total_prestige());
        let prestige_sum: f64 =
            first.occupants().chain(second.occupants()).map(|c| c.prestige as f64).sum();
        let analysis = PairAnalysis {
            total_dealers: first.count_role(RoleClass::Dealer) + second.count_role(RoleClass::Dealer),
            total_buffers: first.count_role(RoleClass::Buffer) + second.count_role(RoleClass::Buffer),
            total_pinned: first.pinned_count() + second.pinned_count(),
            total_prestige,
            average_prestige: if occupied > 0 {
                prestige_sum / occupied as f64
            } else {
                0.0
            },
            first_score,
            second_score,
        };

        Self {
            first,
            second,
            efficiency_gap,
            is_balanced: efficiency_gap < config.balanced_gap_threshold,
            combined_score,
            analysis,
        }
    }

    pub fn squads(&self) -> [&Squad; 2] {
        [&self.first, &self.second]
    }
}

/// 빌더 결과: 4인 단일 파티 또는 8인 파티 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum Party {
    Single(Squad),
    Pair(SquadPair),
}

impl Party {
    /// 단일 파티는 스쿼드 점수, 쌍은 밸런스 페널티가 적용된 합산 점수
    pub fn score(&self) -> f64 {
        match self {
            Party::Single(squad) => squad.score.value(),
            Party::Pair(pair) => pair.combined_score,
        }
    }

    /// 점수를 만든 전략 태그
    pub fn scored_by(&self) -> Strategy {
        match self {
            Party::Single(squad) => squad.strategy,
            Party::Pair(pair) => pair.first.strategy,
        }
    }

    pub fn squads(&self) -> Vec<&Squad> {
        match self {
            Party::Single(squad) => vec![squad],
            Party::Pair(pair) => vec![&pair.first, &pair.second],
        }
    }

    pub fn squads_mut(&mut self) -> Vec<&mut Squad> {
        match self {
            Party::Single(squad) => vec![squad],
            Party::Pair(pair) => vec![&mut pair.first, &mut pair.second],
        }
    }
}
