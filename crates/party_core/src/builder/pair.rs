//! 8인 편성: 같은 풀에서 4인 스쿼드를 순서대로 두 번 만든다.

use super::fill::Candidate;
use crate::models::{Squad, SquadPair};
use crate::config::EngineConfig;

/// 첫 스쿼드를 전체 후보로 만들고, 그 인원을 뺀 나머지로 두 번째 스쿼드를 만든다.
pub fn build_pair<'p>(
    candidates: &[Candidate<'p>],
    config: &EngineConfig,
    mut build_squad: impl FnMut(&[Candidate<'p>]) -> Squad,
) -> SquadPair {
    let first = build_squad(candidates);

    let remaining: Vec<Candidate<'p>> = candidates
        .iter()
        .filter(|c| !first.contains(c.id()))
        .copied()
        .collect();
    let second = build_squad(&remaining);

    tracing::debug!(
        first_members = first.occupied_count(),
        second_members = second.occupied_count(),
        remaining = remaining.len(),
        "Built squad pair"
    );

    SquadPair::assemble(first, second, config)
}
