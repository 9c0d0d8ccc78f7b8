//! 전략별 점수 계산
//!
//! - efficiency: 명성 평균 - 명성 표준편차(모집단)
//! - balance: 딜러/버퍼/업둥이 수가 목표에 얼마나 가까운지 (1 - |실제-목표|/목표) 평균
//! - synergy: 모든 점유 슬롯 쌍의 역할 조합 가중치 평균
//! - safety: clamp((명성 - 최소)/최소, 0, 1) 평균

use crate::config::EngineConfig;
use crate::models::{ActivityRequirement, CharacterRecord, RoleClass, Slot, Squad, SquadScore, Strategy};
use crate::tables::{ReferenceTables, SynergyWeights};

pub fn efficiency_score(slots: &[Slot]) -> f64 {
    let fames: Vec<f64> = occupied(slots).map(|(c, _)| c.prestige as f64).collect();
    if fames.is_empty() {
        return 0.0;
    }
    let n = fames.len() as f64;
    let mean = fames.iter().sum::<f64>() / n;
    let variance = fames.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / n;
    mean - variance.sqrt()
}

/// 딜러/버퍼는 업둥이가 아닌 인원만 센다. 업둥이는 역할과 무관하게 따로 센다.
pub fn balance_score(slots: &[Slot], config: &EngineConfig) -> f64 {
    let mut dealers = 0usize;
    let mut buffers = 0usize;
    let mut pinned = 0usize;
    for (character, role) in occupied(slots) {
        if character.pinned {
            pinned += 1;
        } else if role == RoleClass::Dealer {
            dealers += 1;
        } else if role == RoleClass::Buffer {
            buffers += 1;
        }
    }

    let closeness = |actual: usize, ideal: usize| -> f64 {
        if ideal == 0 {
            return if actual == 0 { 1.0 } else { 0.0 };
        }
        1.0 - (actual as f64 - ideal as f64).abs() / ideal as f64
    };

    (closeness(dealers, config.balance_dealer_target)
        + closeness(buffers, config.balance_buffer_target)
        + closeness(pinned, config.balance_pinned_target))
        / 3.0
}

pub fn synergy_score(slots: &[Slot], weights: &SynergyWeights) -> f64 {
    let roles: Vec<RoleClass> = occupied(slots).map(|(_, role)| role).collect();
    if roles.len() < 2 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for i in 0..roles.len() {
        for j in (i + 1)..roles.len() {
            total += weights.pair(roles[i], roles[j]);
            pairs += 1;
        }
    }
    total / pairs as f64
}

/// 최소 명성이 0이면 모든 슬롯을 1.0으로 본다.
pub fn safety_score(slots: &[Slot], min_prestige: u64) -> f64 {
    let per_slot: Vec<f64> = occupied(slots)
        .map(|(c, _)| {
            if min_prestige == 0 {
                1.0
            } else {
                let min = min_prestige as f64;
                ((c.prestige as f64 - min) / min).clamp(0.0, 1.0)
            }
        })
        .collect();
    if per_slot.is_empty() {
        return 0.0;
    }
    per_slot.iter().sum::<f64>() / per_slot.len() as f64
}

/// 단일 전략 점수. Hybrid는 자체 점수가 없으므로 Efficiency로 계산한다.
pub fn score_slots(
    strategy: Strategy,
    slots: &[Slot],
    requirement: &ActivityRequirement,
    tables: &ReferenceTables,
) -> SquadScore {
    match strategy {
        Strategy::Efficiency | Strategy::Hybrid => SquadScore::Efficiency(efficiency_score(slots)),
        Strategy::Balance => SquadScore::Balance(balance_score(slots, &tables.config)),
        Strategy::Synergy => SquadScore::Synergy(synergy_score(
            slots,
            &tables.weights.synergy_for(requirement.difficulty_tier),
        )),
        Strategy::Safety => SquadScore::Safety(safety_score(slots, requirement.min_prestige)),
    }
}

/// 스쿼드의 전략 태그로 점수를 다시 계산한다. 태그와 점수 종류가 항상 일치하도록 맞춘다.
pub fn rescore(squad: &mut Squad, tables: &ReferenceTables) {
    let score = score_slots(squad.strategy, &squad.slots, &squad.activity, tables);
    squad.strategy = score.strategy();
    squad.score = score;
}

fn occupied(slots: &[Slot]) -> impl Iterator<Item = (&CharacterRecord, RoleClass)> {
    slots.iter().filter_map(|s| Some((s.occupant.as_ref()?, s.role()?)))
}
