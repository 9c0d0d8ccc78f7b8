//! Data model: characters, activity requirements, squads and strategies.

pub mod activity;
pub mod character;
pub mod squad;
pub mod strategy;

pub use activity::{ActivityRequirement, DifficultyTier};
pub use character::{CharacterRecord, CombatStat, RoleClass};
pub use squad::{PairAnalysis, Party, PartySize, Slot, Squad, SquadPair, SquadScore, SquadStats, SQUAD_SIZE};
pub use strategy::Strategy;
