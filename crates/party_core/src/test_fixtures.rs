//! 테스트용 캐릭터/조건 생성 헬퍼

use crate::models::{ActivityRequirement, CharacterRecord, DifficultyTier, RoleClass};
use crate::tables::ReferenceTables;

pub fn tables() -> ReferenceTables {
    ReferenceTables::embedded()
}

pub fn dealer(id: &str, prestige: u64) -> CharacterRecord {
    CharacterRecord::new(id, id, prestige).with_role(RoleClass::Dealer)
}

pub fn buffer(id: &str, prestige: u64) -> CharacterRecord {
    CharacterRecord::new(id, id, prestige).with_role(RoleClass::Buffer)
}

pub fn other(id: &str, prestige: u64) -> CharacterRecord {
    CharacterRecord::new(id, id, prestige).with_role(RoleClass::Other)
}

pub fn requirement(min_prestige: u64, min_dealers: u8, min_buffers: u8) -> ActivityRequirement {
    ActivityRequirement {
        key: "test".to_string(),
        aliases: vec![],
        min_prestige,
        min_dealers,
        min_buffers,
        difficulty_tier: DifficultyTier::Normal,
        is_fallback: false,
    }
}
