//! Strategy Comparator
//!
//! 모든 전략으로 한 번씩 편성해 점수 순위를 매기고, 활동 난이도에 따른 추천 전략을 따로 고른다.
//! - best: 점수만 본 1위
//! - recommended: 정책 (고난도 → Synergy/Balance, 그 외 → Efficiency)

use crate::builder::SquadBuilder;
use crate::error::Result;
use crate::models::{ActivityRequirement, CharacterRecord, Party, PartySize, Strategy};
use crate::tables::ReferenceTables;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedStrategy {
    pub strategy: Strategy,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub results: BTreeMap<Strategy, Party>,
    /// 점수 내림차순, 동점은 전략 순서 (Efficiency < Balance < Synergy < Safety < Hybrid)
    pub ranking: Vec<RankedStrategy>,
    pub best_strategy: Strategy,
    pub recommended_strategy: Strategy,
}

pub fn compare(
    tables: &ReferenceTables,
    pool: &[CharacterRecord],
    requirement: &ActivityRequirement,
    size: PartySize,
) -> Result<StrategyComparison> {
    let builder = SquadBuilder::new(tables);

    let built: Vec<(Strategy, Party)> = Strategy::ALL
        .par_iter()
        .map(|&strategy| {
            builder
                .build(pool, requirement, size, strategy, true)
                .map(|party| (strategy, party))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut ranking: Vec<RankedStrategy> = built
        .iter()
        .map(|(strategy, party)| RankedStrategy { strategy: *strategy, score: party.score() })
        .collect();
    ranking.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.strategy.cmp(&b.strategy)));

    let results: BTreeMap<Strategy, Party> = built.into_iter().collect();
    let best_strategy = ranking.first().map(|r| r.strategy).unwrap_or(Strategy::Efficiency);
    let recommended_strategy = recommend(tables, requirement, &results);

    tracing::info!(
        activity = %requirement.key,
        best = best_strategy.id(),
        recommended = recommended_strategy.id(),
        "Compared strategies"
    );

    Ok(StrategyComparison { results, ranking, best_strategy, recommended_strategy })
}

/// 고난도 활동은 Synergy 점수가 Balance 이상이면 Synergy, 아니면 Balance.
/// 나머지는 Efficiency.
pub fn recommend(
    tables: &ReferenceTables,
    requirement: &ActivityRequirement,
    results: &BTreeMap<Strategy, Party>,
) -> Strategy {
    if !tables.config.is_high_tier(requirement.difficulty_tier) {
        return Strategy::Efficiency;
    }

    let score_of = |s: Strategy| results.get(&s).map(Party::score).unwrap_or(f64::NEG_INFINITY);
    if score_of(Strategy::Synergy) >= score_of(Strategy::Balance) {
        Strategy::Synergy
    } else {
        Strategy::Balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::requirements::resolve;
    use crate::test_fixtures::{buffer, dealer, tables};

    fn pool() -> Vec<CharacterRecord> {
        vec![
            dealer("d1", 80_000),
            dealer("d2", 75_000),
            dealer("d3", 70_000),
            buffer("b1", 65_000),
            dealer("p1", 62_000).as_pinned(),
        ]
    }

    #[test]
    fn test_ranking_covers_all_strategies() {
        let tables = tables();
        let req = resolve(&tables.activities, "nabel");
        let cmp = compare(&tables, &pool(), &req, PartySize::Four).unwrap();
        assert_eq!(cmp.results.len(), 5);
        assert_eq!(cmp.ranking.len(), 5);
        for pair in cmp.ranking.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert_eq!(cmp.best_strategy, cmp.ranking[0].strategy);
        // 명성 단위 점수가 가장 크고, 동점이면 Efficiency가 앞선다
        assert_eq!(cmp.best_strategy, Strategy::Efficiency);
        assert_eq!(cmp.recommended_strategy, Strategy::Efficiency);
    }

    #[test]
    fn test_raid_recommends_synergy_or_balance() {
        let tables = tables();
        let req = resolve(&tables.activities, "kain");
        let cmp = compare(&tables, &pool(), &req, PartySize::Four).unwrap();
        assert!(matches!(cmp.recommended_strategy, Strategy::Synergy | Strategy::Balance));
        assert_ne!(cmp.best_strategy, cmp.recommended_strategy);
    }

    #[test]
    fn test_insufficient_pool_propagates() {
        let tables = tables();
        let req = resolve(&tables.activities, "nabel");
        let err = compare(&tables, &pool(), &req, PartySize::Eight).unwrap_err();
        assert_eq!(err, EngineError::InsufficientPool { required: 8, available: 5 });
    }
}
