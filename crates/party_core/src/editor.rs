//! Squad Editor
//!
//! 완성된 스쿼드에 대한 교체/이동/추가/제거. 모든 연산은 새 스쿼드를 돌려주며
//! 슬롯 번호를 다시 매기고 기존 전략 태그로 점수를 다시 계산한다.
//!
//! 슬롯 수는 절대 바뀌지 않는다 (제거 = 빈 슬롯). 범위를 벗어난 인덱스만 오류이고,
//! 마지막 버퍼를 빼는 식의 "이상한" 편집은 검증기가 판단한다.

use crate::builder::rescore;
use crate::classifier::RoleClassifier;
use crate::error::{EngineError, Result};
use crate::models::{CharacterRecord, Party, RoleClass, Slot, Squad, SquadPair};
use crate::tables::ReferenceTables;
use serde::{Deserialize, Serialize};

/// 편집 연산. `squad`는 파티 안의 스쿼드 번호 (단일 파티는 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    Swap {
        #[serde(default)]
        squad: usize,
        first: usize,
        second: usize,
    },
    Move {
        #[serde(default)]
        from_squad: usize,
        from_slot: usize,
        #[serde(default)]
        to_squad: usize,
        to_slot: usize,
    },
    Add {
        #[serde(default)]
        squad: usize,
        slot: usize,
        character: CharacterRecord,
    },
    Remove {
        #[serde(default)]
        squad: usize,
        slot: usize,
    },
}

impl EditOperation {
    pub fn name(&self) -> &'static str {
        match self {
            EditOperation::Swap { .. } => "swap",
            EditOperation::Move { .. } => "move",
            EditOperation::Add { .. } => "add",
            EditOperation::Remove { .. } => "remove",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SquadEditor<'a> {
    tables: &'a ReferenceTables,
}

impl<'a> SquadEditor<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self { tables }
    }

    /// 두 슬롯의 점유자를 맞바꾼다. 같은 인자로 두 번 적용하면 원래대로 돌아온다.
    pub fn swap(&self, squad: &Squad, first: usize, second: usize) -> Result<Squad> {
        check_index(squad, first)?;
        check_index(squad, second)?;

        let mut edited = squad.clone();
        let a = take_contents(&mut edited.slots[first]);
        let b = take_contents(&mut edited.slots[second]);
        put_contents(&mut edited.slots[first], b);
        put_contents(&mut edited.slots[second], a);

        tracing::debug!(first, second, "Swapped slots");
        Ok(self.finish(edited))
    }

    /// `from`의 슬롯 점유자를 `to`의 슬롯으로 옮긴다.
    /// 대상 슬롯에 있던 캐릭터는 대체되어 빠지고, 원래 슬롯은 빈 슬롯이 된다.
    /// 한 스쿼드 안에서의 이동은 [`SquadEditor::move_within`]을 쓴다.
    pub fn move_between(
        &self,
        from: &Squad,
        from_slot: usize,
        to: &Squad,
        to_slot: usize,
    ) -> Result<(Squad, Squad)> {
        check_index(from, from_slot)?;
        check_index(to, to_slot)?;

        let mut source = from.clone();
        let mut target = to.clone();
        let moving = take_contents(&mut source.slots[from_slot]);
        if let Some(displaced) = target.slots[to_slot].occupant_id() {
            tracing::debug!(displaced, "Move replaced occupant");
        }
        put_contents(&mut target.slots[to_slot], moving);

        tracing::debug!(from_slot, to_slot, "Moved member between squads");
        Ok((self.finish(source), self.finish(target)))
    }

    /// 한 스쿼드 안에서 점유자를 옮긴다. 대상 슬롯의 캐릭터는 빠지고 원래 슬롯은 빈다.
    pub fn move_within(&self, squad: &Squad, from_slot: usize, to_slot: usize) -> Result<Squad> {
        check_index(squad, from_slot)?;
        check_index(squad, to_slot)?;

        let mut edited = squad.clone();
        if from_slot != to_slot {
            let moving = take_contents(&mut edited.slots[from_slot]);
            put_contents(&mut edited.slots[to_slot], moving);
        }

        tracing::debug!(from_slot, to_slot, "Moved member within squad");
        Ok(self.finish(edited))
    }

    /// 슬롯에 캐릭터를 넣는다 (기존 점유자는 대체). 역할은 분류기로 다시 판별한다.
    pub fn add(&self, squad: &Squad, character: CharacterRecord, slot: usize) -> Result<Squad> {
        check_index(squad, slot)?;

        let role = RoleClassifier::new(&self.tables.jobs).role_of(&character);
        let mut edited = squad.clone();
        tracing::debug!(slot, character = %character.id, role = role.label(), "Added member");
        edited.slots[slot] = Slot::occupied(slot, character, role);
        Ok(self.finish(edited))
    }

    /// 슬롯을 비운다.
    pub fn remove(&self, squad: &Squad, slot: usize) -> Result<Squad> {
        check_index(squad, slot)?;

        let mut edited = squad.clone();
        edited.slots[slot] = Slot::empty(slot);
        tracing::debug!(slot, "Removed member");
        Ok(self.finish(edited))
    }

    /// 파티에 연산을 적용한다. 8인 파티는 쌍 지표를 다시 계산한다.
    pub fn apply(&self, party: &Party, operation: EditOperation) -> Result<Party> {
        let mut squads: Vec<Squad> = party.squads().into_iter().cloned().collect();
        let count = squads.len();
        let check_squad = |index: usize| -> Result<()> {
            if index >= count {
                return Err(EngineError::InvalidSquad { index, count });
            }
            Ok(())
        };

        tracing::info!(op = operation.name(), squads = count, "Applying edit");
        match operation {
            EditOperation::Swap { squad, first, second } => {
                check_squad(squad)?;
                squads[squad] = self.swap(&squads[squad], first, second)?;
            }
            EditOperation::Move { from_squad, from_slot, to_squad, to_slot } => {
                check_squad(from_squad)?;
                check_squad(to_squad)?;
                if from_squad == to_squad {
                    squads[from_squad] = self.move_within(&squads[from_squad], from_slot, to_slot)?;
                } else {
                    let (source, target) =
                        self.move_between(&squads[from_squad], from_slot, &squads[to_squad], to_slot)?;
                    squads[from_squad] = source;
                    squads[to_squad] = target;
                }
            }
            EditOperation::Add { squad, slot, character } => {
                check_squad(squad)?;
                squads[squad] = self.add(&squads[squad], character, slot)?;
            }
            EditOperation::Remove { squad, slot } => {
                check_squad(squad)?;
                squads[squad] = self.remove(&squads[squad], slot)?;
            }
        }

        let mut squads = squads.into_iter();
        match (squads.next(), squads.next()) {
            (Some(first), Some(second)) => {
                Ok(Party::Pair(SquadPair::assemble(first, second, &self.tables.config)))
            }
            (Some(single), None) => Ok(Party::Single(single)),
            _ => Err(EngineError::InvalidSquad { index: 0, count: 0 }),
        }
    }

    fn finish(&self, mut squad: Squad) -> Squad {
        squad.renumber();
        rescore(&mut squad, self.tables);
        squad
    }
}

fn check_index(squad: &Squad, index: usize) -> Result<()> {
    if index >= squad.size() {
        return Err(EngineError::InvalidSlot { index, size: squad.size() });
    }
    Ok(())
}

type SlotContents = (Option<CharacterRecord>, Option<RoleClass>);

fn take_contents(slot: &mut Slot) -> SlotContents {
    (slot.occupant.take(), slot.assigned_role.take())
}

fn put_contents(slot: &mut Slot, (occupant, role): SlotContents) {
    slot.occupant = occupant;
    slot.assigned_role = role;
}
