//! # party_core - Deterministic Party Allocation Engine
//!
//! Assigns a pool of characters to 4-person squads (or paired squads for
//! 8-person raids) under per-activity eligibility rules, scores them with one
//! of several strategies, and validates, edits and compares the results.
//!
//! ## Features
//! - Role classification from job labels with a keyword safety net
//! - Activity requirement lookup with alias matching and permissive fallback
//! - Efficiency / Balance / Synergy / Safety / Hybrid fill strategies
//! - Invariant-preserving squad edits (swap, move, add, remove)
//! - JSON API for easy integration with service hosts
//!
//! ## Usage
//!
//! ```rust
//! use party_core::{CharacterRecord, PartyEngine, RoleClass, Strategy};
//!
//! let pool = vec![
//!     CharacterRecord::new("d1", "Slayer", 80_000).with_role(RoleClass::Dealer),
//!     CharacterRecord::new("d2", "Gunner", 75_000).with_role(RoleClass::Dealer),
//!     CharacterRecord::new("d3", "Mage", 70_000).with_role(RoleClass::Dealer),
//!     CharacterRecord::new("b1", "Crusader", 65_000).with_role(RoleClass::Buffer),
//! ];
//!
//! let engine = PartyEngine::from_global();
//! let party = engine.build(&pool, "nabel", 4, Strategy::Efficiency, true).unwrap();
//! assert!(engine.validate(&party, "nabel").is_valid);
//! ```

// Engine entry points take pool + requirement + size + strategy + flags
#![allow(clippy::too_many_arguments)]
// Party variants differ in size (single squad vs pair)
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod builder;
pub mod classifier;
pub mod comparator;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod models;
pub mod requirements;
pub mod tables;
pub mod validator;

#[cfg(test)]
pub mod test_fixtures;


/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export main API functions
pub use api::{
    build_party_json, compare_strategies_json, edit_party_json, strategy_catalog_json,
    validate_party_json, ApiError, ApiResponse,
};
pub use error::{EngineError, Result};

// Re-export engine types
pub use builder::SquadBuilder;
pub use classifier::RoleClassifier;
pub use comparator::{RankedStrategy, StrategyComparison};
pub use config::EngineConfig;
pub use editor::{EditOperation, SquadEditor};
pub use engine::{PartyEngine, StrategyCatalog, StrategyInfo};
pub use models::{
    ActivityRequirement, CharacterRecord, CombatStat, DifficultyTier, PairAnalysis, Party,
    PartySize, RoleClass, Slot, Squad, SquadPair, SquadScore, SquadStats, Strategy, SQUAD_SIZE,
};
pub use tables::ReferenceTables;
pub use validator::{CompositionSummary, ValidationIssue, ValidationReport};
