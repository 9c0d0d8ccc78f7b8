//! PartyEngine - 기준 데이터 스냅샷을 묶은 진입점
//!
//! 엔진은 생성 시점의 테이블 스냅샷(`Arc`)을 계속 사용한다. 전역 테이블이 교체되어도
//! 이미 만든 엔진의 결과는 바뀌지 않는다.

use crate::builder::{rescore, SquadBuilder};
use crate::classifier::RoleClassifier;
use crate::comparator::{self, StrategyComparison};
use crate::editor::{EditOperation, SquadEditor};
use crate::error::Result;
use crate::models::{
    ActivityRequirement, CharacterRecord, DifficultyTier, Party, PartySize, RoleClass, Strategy,
    SquadPair,
};
use crate::requirements;
use crate::tables::{self, HybridWeights, ReferenceTables};
use crate::validator::{self, ValidationReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 전략 목록 항목
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    pub strategy: Strategy,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCatalog {
    pub strategies: Vec<StrategyInfo>,
    /// 등급별 하이브리드 가중치
    pub hybrid_weights: BTreeMap<DifficultyTier, HybridWeights>,
}

#[derive(Debug, Clone)]
pub struct PartyEngine {
    tables: Arc<ReferenceTables>,
}

impl Default for PartyEngine {
    fn default() -> Self {
        Self::from_global()
    }
}

impl PartyEngine {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    /// 현재 전역 테이블 스냅샷으로 생성
    pub fn from_global() -> Self {
        Self::new(tables::snapshot())
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn classify(&self, job_name: &str, job_grow_name: Option<&str>) -> RoleClass {
        RoleClassifier::new(&self.tables.jobs).classify(job_name, job_grow_name)
    }

    pub fn resolve(&self, activity_name: &str) -> ActivityRequirement {
        requirements::resolve(&self.tables.activities, activity_name)
    }

    /// 활동 이름 + 인원(4 또는 8)으로 편성
    pub fn build(
        &self,
        pool: &[CharacterRecord],
        activity_name: &str,
        members: usize,
        strategy: Strategy,
        pinned_first: bool,
    ) -> Result<Party> {
        let size = PartySize::from_members(members)?;
        let requirement = self.resolve(activity_name);
        SquadBuilder::new(&self.tables).build(pool, &requirement, size, strategy, pinned_first)
    }

    /// 외부에서 들어온 파티의 빈 역할을 분류기로 채운다.
    /// 역할이 바뀐 스쿼드는 점수를 다시 계산하고, 8인 파티는 쌍 지표를 다시 묶는다.
    pub fn assign_roles(&self, mut party: Party) -> Party {
        let classifier = RoleClassifier::new(&self.tables.jobs);
        let mut changed = false;
        for squad in party.squads_mut() {
            let mut touched = false;
            for slot in squad.slots.iter_mut().filter(|s| s.assigned_role.is_none()) {
                if let Some(character) = &slot.occupant {
                    slot.assigned_role = Some(classifier.role_of(character));
                    touched = true;
                }
            }
            if touched {
                rescore(squad, &self.tables);
                changed = true;
            }
        }

        match party {
            Party::Pair(pair) if changed => {
                tracing::debug!("Re-assembled pair after role assignment");
                Party::Pair(SquadPair::assemble(pair.first, pair.second, &self.tables.config))
            }
            other => other,
        }
    }

    pub fn validate(&self, party: &Party, activity_name: &str) -> ValidationReport {
        let party = self.assign_roles(party.clone());
        validator::validate_party(&party, &self.resolve(activity_name))
    }

    pub fn edit(&self, party: &Party, operation: EditOperation) -> Result<Party> {
        let party = self.assign_roles(party.clone());
        SquadEditor::new(&self.tables).apply(&party, operation)
    }

    pub fn compare(
        &self,
        pool: &[CharacterRecord],
        activity_name: &str,
        members: usize,
    ) -> Result<StrategyComparison> {
        let size = PartySize::from_members(members)?;
        let requirement = self.resolve(activity_name);
        comparator::compare(&self.tables, pool, &requirement, size)
    }

    pub fn strategy_catalog(&self) -> StrategyCatalog {
        StrategyCatalog {
            strategies: Strategy::ALL
                .iter()
                .map(|s| StrategyInfo { strategy: *s, description: s.description().to_string() })
                .collect(),
            hybrid_weights: DifficultyTier::ALL
                .iter()
                .map(|tier| (*tier, self.tables.weights.hybrid_for(*tier)))
                .collect(),
        }
    }
}
