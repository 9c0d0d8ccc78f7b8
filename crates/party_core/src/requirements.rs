//! Activity Requirement Resolver
//!
//! 활동 이름 → 참가 조건. 모르는 이름이어도 실패하지 않고 기본 조건으로 대체한다.
//! 명성 미달은 검증기가 경고로 알려준다.

use crate::models::ActivityRequirement;
use crate::tables::{normalize_activity_name, ActivityTable};

pub fn resolve(activities: &ActivityTable, activity_name: &str) -> ActivityRequirement {
    let normalized = normalize_activity_name(activity_name);

    match activities.lookup(&normalized) {
        Some(entry) => ActivityRequirement {
            key: entry.key.clone(),
            aliases: entry.aliases.clone(),
            min_prestige: entry.min_prestige,
            min_dealers: entry.min_dealers,
            min_buffers: entry.min_buffers,
            difficulty_tier: entry.difficulty_tier,
            is_fallback: false,
        },
        None => {
            tracing::debug!(activity = %normalized, "Unknown activity, using fallback requirement");
            let fallback = activities.fallback();
            ActivityRequirement {
                key: normalized,
                aliases: Vec::new(),
                min_prestige: fallback.min_prestige,
                min_dealers: fallback.min_dealers,
                min_buffers: fallback.min_buffers,
                difficulty_tier: fallback.difficulty_tier,
                is_fallback: true,
            }
        }
    }
}
