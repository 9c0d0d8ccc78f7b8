//! Squad Builder
//!
//! 캐릭터 풀 + 활동 조건 + 전략 → 4인 스쿼드 또는 8인 스쿼드 쌍.
//!
//! ## 파이프라인
//! 1. 풀 크기 확인 (`len(pool) < size` → `InsufficientPool`)
//! 2. 해당 활동을 제외/클리어한 캐릭터 제거
//! 3. 분류기로 역할 판별
//! 4. 전략별 채우기 ([`fill`]) → 점수 ([`scoring`])
//! 5. 8인이면 남은 풀로 두 번째 스쿼드 ([`pair`])
//!
//! 탐욕적 휴리스틱이며 최적해를 보장하지 않는다. 같은 입력이면 항상 같은 결과를 낸다.

pub mod fill;
pub mod pair;
pub mod scoring;

pub use fill::Candidate;
pub use scoring::{rescore, score_slots};

use crate::classifier::RoleClassifier;
use crate::error::{EngineError, Result};
use crate::models::{ActivityRequirement, CharacterRecord, Party, PartySize, Squad, Strategy};
use crate::tables::ReferenceTables;

/// 하이브리드가 비교하는 전략 (동점이면 앞쪽)
const HYBRID_COMPONENTS: [Strategy; 3] = [Strategy::Efficiency, Strategy::Balance, Strategy::Synergy];

#[derive(Debug, Clone, Copy)]
pub struct SquadBuilder<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> SquadBuilder<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    pub fn build(
        &self,
        pool: &[CharacterRecord],
        requirement: &ActivityRequirement,
        size: PartySize,
        strategy: Strategy,
        pinned_first: bool,
    ) -> Result<Party> {
        let required = size.members();
        if pool.len() < required {
            tracing::warn!(
                activity = %requirement.key,
                required,
                available = pool.len(),
                "Insufficient pool"
            );
            return Err(EngineError::InsufficientPool { required, available: pool.len() });
        }

        tracing::info!(
            activity = %requirement.key,
            strategy = strategy.id(),
            size = required,
            pool = pool.len(),
            "Building party"
        );

        let candidates = self.eligible(pool, requirement);
        let party = match strategy {
            Strategy::Hybrid => self.hybrid(&candidates, requirement, size, pinned_first),
            single => self.layout(&candidates, requirement, size, single, pinned_first),
        };

        tracing::info!(
            activity = %requirement.key,
            scored_by = party.scored_by().id(),
            score = party.score(),
            "Party built"
        );
        Ok(party)
    }

    /// 제외/클리어 활동 필터 + 역할 판별
    pub fn eligible<'p>(
        &self,
        pool: &'p [CharacterRecord],
        requirement: &ActivityRequirement,
    ) -> Vec<Candidate<'p>> {
        let classifier = RoleClassifier::new(&self.tables.jobs);
        let keys = requirement.match_keys();

        let candidates: Vec<Candidate<'p>> = pool
            .iter()
            .filter(|c| !c.is_barred_from(&keys))
            .map(|c| Candidate { character: c, role: classifier.role_of(c) })
            .collect();

        if candidates.len() < pool.len() {
            tracing::debug!(
                activity = %requirement.key,
                removed = pool.len() - candidates.len(),
                "Filtered excluded/cleared characters"
            );
        }
        candidates
    }

    /// 단일 전략(Hybrid 제외)으로 4인/8인 편성
    fn layout(
        &self,
        candidates: &[Candidate<'_>],
        requirement: &ActivityRequirement,
        size: PartySize,
        strategy: Strategy,
        pinned_first: bool,
    ) -> Party {
        match size {
            PartySize::Four => {
                Party::Single(self.squad(candidates, requirement, strategy, pinned_first))
            }
            PartySize::Eight => Party::Pair(pair::build_pair(candidates, &self.tables.config, |pool| {
                self.squad(pool, requirement, strategy, pinned_first)
            })),
        }
    }

    /// 한 스쿼드 채우기 + 채점
    pub fn squad(
        &self,
        candidates: &[Candidate<'_>],
        requirement: &ActivityRequirement,
        strategy: Strategy,
        pinned_first: bool,
    ) -> Squad {
        let config = &self.tables.config;
        let picked = match strategy {
            Strategy::Efficiency | Strategy::Hybrid => fill::efficiency(candidates, config, pinned_first),
            Strategy::Balance => fill::balance(candidates, config, pinned_first),
            Strategy::Synergy => {
                let weights = self.tables.weights.synergy_for(requirement.difficulty_tier);
                fill::synergy(candidates, &weights, pinned_first)
            }
            Strategy::Safety => {
                let floor = requirement.safety_floor(config.safety_margin);
                let safe = fill::safety_pool(candidates, floor);
                tracing::debug!(
                    floor,
                    kept = safe.len(),
                    dropped = candidates.len() - safe.len(),
                    "Safety pre-filter"
                );
                fill::efficiency(&safe, config, pinned_first)
            }
        };

        let slots = fill::into_slots(picked);
        let score = score_slots(strategy, &slots, requirement, self.tables);
        Squad { strategy: score.strategy(), activity: requirement.clone(), slots, score }
    }

    /// Efficiency / Balance / Synergy를 각각 만들고 등급별 가중 점수가 가장 높은 결과를 고른다.
    /// 결과 스쿼드의 전략 태그는 이긴 전략이다.
    fn hybrid(
        &self,
        candidates: &[Candidate<'_>],
        requirement: &ActivityRequirement,
        size: PartySize,
        pinned_first: bool,
    ) -> Party {
        let weights = self.tables.weights.hybrid_for(requirement.difficulty_tier);

        let mut best: Option<(f64, Party)> = None;
        for strategy in HYBRID_COMPONENTS {
            let party = self.layout(candidates, requirement, size, strategy, pinned_first);
            let weighted = weights.weight_for(strategy) * party.score();
            tracing::debug!(strategy = strategy.id(), weighted, "Hybrid candidate");

            let better = match &best {
                Some((top, _)) => weighted > *top,
                None => true,
            };
            if better {
                best = Some((weighted, party));
            }
        }

        match best {
            Some((_, party)) => party,
            // HYBRID_COMPONENTS는 비어 있지 않다
            None => self.layout(candidates, requirement, size, Strategy::Efficiency, pinned_first),
        }
    }
}

/// 테이블 스냅샷을 받아 바로 편성하는 단축 함수
pub fn build(
    tables: &ReferenceTables,
    pool: &[CharacterRecord],
    requirement: &ActivityRequirement,
    size: PartySize,
    strategy: Strategy,
    pinned_first: bool,
) -> Result<Party> {
    SquadBuilder::new(tables).build(pool, requirement, size, strategy, pinned_first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoleClass, SquadScore, SQUAD_SIZE};
    use crate::requirements::resolve;
    use crate::test_fixtures::{buffer, dealer, tables};

    #[test]
    fn test_insufficient_pool() {
        let tables = tables();
        let req = resolve(&tables.activities, "nabel");
        let pool = vec![dealer("a", 70_000), dealer("b", 70_000)];
        let err = build(&tables, &pool, &req, PartySize::Four, Strategy::Efficiency, true).unwrap_err();
        assert_eq!(err, EngineError::InsufficientPool { required: 4, available: 2 });
    }

    #[test]
    fn test_excluded_and_cleared_characters_skipped() {
        let tables = tables();
        let req = resolve(&tables.activities, "nabel");
        let pool = vec![
            dealer("a", 90_000).excluding("나벨"),
            dealer("b", 80_000).cleared("NABEL"),
            dealer("c", 70_000),
            buffer("d", 65_000),
        ];
        let party = build(&tables, &pool, &req, PartySize::Four, Strategy::Efficiency, true).unwrap();
        let squad = &party.squads()[0];
        assert_eq!(squad.member_ids(), vec!["c", "d"]);
        assert_eq!(squad.empty_count(), 2);
        assert_eq!(squad.size(), SQUAD_SIZE);
    }

    #[test]
    fn test_safety_scores_safety() {
        let tables = tables();
        let req = resolve(&tables.activities, "sirocco");
        let pool = vec![
            dealer("a", 100_000),
            dealer("b", 61_000),
            dealer("c", 59_000),
            buffer("d", 70_000),
        ];
        let party = build(&tables, &pool, &req, PartySize::Four, Strategy::Safety, true).unwrap();
        let squad = &party.squads()[0];
        assert!(!squad.contains("c"));
        assert!(matches!(squad.score, SquadScore::Safety(_)));
        assert_eq!(squad.strategy, Strategy::Safety);
    }

    #[test]
    fn test_hybrid_returns_component_strategy() {
        let tables = tables();
        let req = resolve(&tables.activities, "venus");
        let pool = vec![
            dealer("a", 80_000),
            dealer("b", 70_000),
            dealer("c", 60_000),
            buffer("d", 50_000),
            dealer("e", 40_000).as_pinned(),
        ];
        let party = build(&tables, &pool, &req, PartySize::Four, Strategy::Hybrid, true).unwrap();
        let squad = &party.squads()[0];
        assert_ne!(squad.strategy, Strategy::Hybrid);
        assert_eq!(squad.strategy, squad.score.strategy());
        // 명성 점수가 수만 단위라 가중 효율 점수가 이긴다
        assert_eq!(squad.strategy, Strategy::Efficiency);
    }

    #[test]
    fn test_pair_has_no_duplicates() {
        let tables = tables();
        let req = resolve(&tables.activities, "bakal");
        let pool: Vec<CharacterRecord> = (0..10)
            .map(|i| {
                if i % 4 == 0 {
                    buffer(&format!("c{}", i), 60_000 + i * 1_000)
                } else {
                    dealer(&format!("c{}", i), 60_000 + i * 1_000)
                }
            })
            .collect();
        let party = build(&tables, &pool, &req, PartySize::Eight, Strategy::Balance, true).unwrap();
        let Party::Pair(pair) = party else { panic!("expected pair") };
        let mut ids: Vec<&str> = pair.first.member_ids();
        ids.extend(pair.second.member_ids());
        let unique: std::collections::HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert_eq!(ids.len(), 8);
        assert_eq!(pair.first.count_role(RoleClass::Buffer), 1);
    }
}
