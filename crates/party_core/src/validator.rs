//! Squad Validator
//!
//! 스쿼드(또는 8인 쌍)가 활동 조건을 만족하는지 검사한다. 입력만 보는 순수 함수이므로
//! 같은 입력을 다시 검증하면 같은 결과가 나온다.
//!
//! 검사 순서:
//! 1. 빈 슬롯 (오류)
//! 2. 중복 캐릭터 (오류, 쌍 전체 기준)
//! 3. 슬롯별 명성 미달 (경고)
//! 4. 딜러/버퍼 최소 인원 미달 (오류, 스쿼드별)

use crate::models::{ActivityRequirement, Party, RoleClass, Squad, SquadPair};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// 검증 결과 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    EmptySlots { count: usize },
    DuplicateCharacters { ids: Vec<String> },
    BelowMinPrestige {
        squad: usize,
        slot: usize,
        character_id: String,
        name: String,
        prestige: u64,
        required: u64,
    },
    RoleShortfall { squad: usize, role: RoleClass, actual: usize, required: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptySlots { count } => write!(f, "{} empty slot(s)", count),
            ValidationIssue::DuplicateCharacters { ids } => {
                write!(f, "duplicate characters assigned: {}", ids.join(", "))
            }
            ValidationIssue::BelowMinPrestige { squad, slot, name, prestige, required, .. } => write!(
                f,
                "squad {} slot {}: {} has prestige {} (minimum {})",
                squad + 1,
                slot,
                name,
                prestige,
                required
            ),
            ValidationIssue::RoleShortfall { squad, role, actual, required } => write!(
                f,
                "squad {}: {} {}(s), at least {} required",
                squad + 1,
                actual,
                role.label(),
                required
            ),
        }
    }
}

/// 스쿼드별 구성 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSummary {
    pub dealers: usize,
    pub buffers: usize,
    pub others: usize,
    pub empty_slots: usize,
    pub occupied: usize,
    pub total_slots: usize,
}

impl CompositionSummary {
    fn of(squad: &Squad) -> Self {
        Self {
            dealers: squad.count_role(RoleClass::Dealer),
            buffers: squad.count_role(RoleClass::Buffer),
            others: squad.count_role(RoleClass::Other),
            empty_slots: squad.empty_count(),
            occupied: squad.occupied_count(),
            total_slots: squad.size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    /// (명성 충족률 + 역할 충족률) / 2. 참고용이며 is_valid와 무관하다.
    pub compatibility: f64,
    pub composition: Vec<CompositionSummary>,
}

impl ValidationReport {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}

pub fn validate_squad(squad: &Squad, requirement: &ActivityRequirement) -> ValidationReport {
    validate_squads(&[squad], requirement)
}

pub fn validate_pair(pair: &SquadPair, requirement: &ActivityRequirement) -> ValidationReport {
    validate_squads(&[&pair.first, &pair.second], requirement)
}

pub fn validate_party(party: &Party, requirement: &ActivityRequirement) -> ValidationReport {
    validate_squads(&party.squads(), requirement)
}

/// 여러 스쿼드를 한 편성으로 보고 검증한다 (중복은 전체 기준).
pub fn validate_squads(squads: &[&Squad], requirement: &ActivityRequirement) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // 1. 빈 슬롯
    let empty: usize = squads.iter().map(|s| s.empty_count()).sum();
    if empty > 0 {
        errors.push(ValidationIssue::EmptySlots { count: empty });
    }

    // 2. 중복: 목록 길이와 집합 크기 비교
    let ids: Vec<&str> = squads.iter().flat_map(|s| s.member_ids()).collect();
    let unique: HashSet<&str> = ids.iter().copied().collect();
    if unique.len() != ids.len() {
        let mut seen = HashSet::new();
        let duplicated: BTreeSet<&str> = ids.iter().copied().filter(|id| !seen.insert(*id)).collect();
        errors.push(ValidationIssue::DuplicateCharacters {
            ids: duplicated.into_iter().map(str::to_string).collect(),
        });
    }

    // 3. 명성 미달
    let mut meeting_prestige = 0usize;
    for (squad_index, squad) in squads.iter().enumerate() {
        for slot in &squad.slots {
            let Some(character) = &slot.occupant else { continue };
            if character.prestige >= requirement.min_prestige {
                meeting_prestige += 1;
            } else {
                warnings.push(ValidationIssue::BelowMinPrestige {
                    squad: squad_index,
                    slot: slot.index,
                    character_id: character.id.clone(),
                    name: character.name.clone(),
                    prestige: character.prestige,
                    required: requirement.min_prestige,
                });
            }
        }
    }

    // 4. 역할 최소 인원
    let mut roles_checked = 0usize;
    let mut roles_met = 0usize;
    for (squad_index, squad) in squads.iter().enumerate() {
        let quotas = [
            (RoleClass::Dealer, requirement.min_dealers as usize),
            (RoleClass::Buffer, requirement.min_buffers as usize),
        ];
        for (role, required) in quotas {
            roles_checked += 1;
            let actual = squad.count_role(role);
            if actual >= required {
                roles_met += 1;
            } else {
                errors.push(ValidationIssue::RoleShortfall { squad: squad_index, role, actual, required });
            }
        }
    }

    let total_slots: usize = squads.iter().map(|s| s.size()).sum();
    let prestige_compliance = ratio(meeting_prestige, total_slots);
    let role_compliance = ratio(roles_met, roles_checked);

    let report = ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        compatibility: (prestige_compliance + role_compliance) / 2.0,
        composition: squads.iter().map(|s| CompositionSummary::of(s)).collect(),
    };

    tracing::debug!(
        activity = %requirement.key,
        is_valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validated squads"
    );
    report
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Slot, SquadScore, Strategy};
    use crate::test_fixtures::{buffer, dealer, requirement};

    fn squad(slots: Vec<Slot>) -> Squad {
        Squad {
            strategy: Strategy::Efficiency,
            activity: requirement(63_000, 3, 1),
            slots,
            score: SquadScore::Efficiency(0.0),
        }
    }

    fn full_squad(prefix: &str, prestige: u64) -> Squad {
        squad(vec![
            Slot::occupied(0, dealer(&format!("{}1", prefix), prestige), RoleClass::Dealer),
            Slot::occupied(1, dealer(&format!("{}2", prefix), prestige), RoleClass::Dealer),
            Slot::occupied(2, dealer(&format!("{}3", prefix), prestige), RoleClass::Dealer),
            Slot::occupied(3, buffer(&format!("{}4", prefix), prestige), RoleClass::Buffer),
        ])
    }

    #[test]
    fn test_valid_squad() {
        let report = validate_squad(&full_squad("a", 70_000), &requirement(63_000, 3, 1));
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert!((report.compatibility - 1.0).abs() < 1e-9);
        assert_eq!(report.composition[0].dealers, 3);
    }

    #[test]
    fn test_prestige_warning_does_not_invalidate() {
        let report = validate_squad(&full_squad("a", 60_000), &requirement(63_000, 3, 1));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 4);
        assert!((report.compatibility - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_role_shortfall_is_error() {
        let mut s = full_squad("a", 70_000);
        s.slots[3] = Slot::occupied(3, dealer("a4", 70_000), RoleClass::Dealer);
        let report = validate_squad(&s, &requirement(63_000, 3, 1));
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![ValidationIssue::RoleShortfall {
                squad: 0,
                role: RoleClass::Buffer,
                actual: 0,
                required: 1
            }]
        );
        assert_eq!(report.error_messages()[0], "squad 1: 0 buffer(s), at least 1 required");
    }

    #[test]
    fn test_pair_with_empty_slot_and_duplicate() {
        let req = requirement(63_000, 3, 1);
        let first = full_squad("a", 70_000);
        let mut second = full_squad("b", 70_000);
        second.slots[1] = Slot::empty(1);
        second.slots[2] = Slot::occupied(2, dealer("a1", 70_000), RoleClass::Dealer);

        let report = validate_squads(&[&first, &second], &req);
        assert!(!report.is_valid);
        assert_eq!(report.errors[0], ValidationIssue::EmptySlots { count: 1 });
        assert_eq!(report.errors[1], ValidationIssue::DuplicateCharacters { ids: vec!["a1".to_string()] });
        assert!(report.errors.iter().any(|e| matches!(e, ValidationIssue::RoleShortfall { squad: 1, .. })));
    }

    #[test]
    fn test_idempotent() {
        let req = requirement(63_000, 3, 1);
        let mut s = full_squad("a", 62_000);
        s.slots[0] = Slot::empty(0);
        assert_eq!(validate_squad(&s, &req), validate_squad(&s, &req));
    }
}
