use crate::error::{EngineError, Result};
use crate::models::DifficultyTier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub key: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub min_prestige: u64,
    pub min_dealers: u8,
    pub min_buffers: u8,
    #[serde(default)]
    pub difficulty_tier: DifficultyTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRequirement {
    pub min_prestige: u64,
    pub min_dealers: u8,
    pub min_buffers: u8,
    #[serde(default)]
    pub difficulty_tier: DifficultyTier,
}

impl Default for FallbackRequirement {
    fn default() -> Self {
        Self { min_prestige: 30_000, min_dealers: 3, min_buffers: 1, difficulty_tier: DifficultyTier::Normal }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActivityTableFile {
    pub version: u8,
    pub activities: Vec<ActivityEntry>,
    #[serde(default)]
    pub fallback: FallbackRequirement,
}

/// 활동 이름(별칭 포함) → 참가 조건
#[derive(Debug, Clone, Default)]
pub struct ActivityTable {
    entries: Vec<ActivityEntry>,
    index: HashMap<String, usize>,
    fallback: FallbackRequirement,
}

impl ActivityTable {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: ActivityTableFile = serde_yaml::from_str(yaml)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ActivityTableFile) -> Result<Self> {
        let mut table = ActivityTable { fallback: file.fallback, ..Default::default() };

        for mut entry in file.activities {
            entry.key = normalize_activity_name(&entry.key);
            entry.aliases = entry.aliases.iter().map(|a| normalize_activity_name(a)).collect();
            if entry.key.is_empty() {
                return Err(EngineError::TableLoad("activity with empty key".to_string()));
            }

            let position = table.entries.len();
            for name in std::iter::once(&entry.key).chain(entry.aliases.iter()) {
                if let Some(existing) = table.index.insert(name.clone(), position) {
                    if existing != position {
                        return Err(EngineError::TableLoad(format!(
                            "activity name '{}' registered twice",
                            name
                        )));
                    }
                }
            }
            table.entries.push(entry);
        }

        Ok(table)
    }

    /// 정규화된 이름으로 조회
    pub fn lookup(&self, normalized: &str) -> Option<&ActivityEntry> {
        self.index.get(normalized).map(|&i| &self.entries[i])
    }

    pub fn fallback(&self) -> &FallbackRequirement {
        &self.fallback
    }

    pub fn entries(&self) -> &[ActivityEntry] {
        &self.entries
    }

    /// 테이블에 활동을 추가한 사본 (재구성용)
    pub fn with_entry(&self, entry: ActivityEntry) -> Result<Self> {
        let mut activities = self.entries.clone();
        activities.push(entry);
        Self::from_file(ActivityTableFile { version: 1, activities, fallback: self.fallback.clone() })
    }
}

/// 대소문자/앞뒤 공백을 무시한 활동 이름
pub fn normalize_activity_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
version: 1
activities:
  - key: Nabel
    aliases: ["나벨", "NAVEL"]
    min_prestige: 63000
    min_dealers: 3
    min_buffers: 1
    difficulty_tier: hard
"#;

    #[test]
    fn test_aliases_share_entry() {
        let table = ActivityTable::from_yaml(YAML).unwrap();
        let a = table.lookup("nabel").unwrap();
        let b = table.lookup("navel").unwrap();
        let c = table.lookup("나벨").unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(b.key, c.key);
        assert_eq!(a.difficulty_tier, DifficultyTier::Hard);
        assert_eq!(table.fallback().min_prestige, 30_000);
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let table = ActivityTable::from_yaml(YAML).unwrap();
        let dup = ActivityEntry {
            key: "other".to_string(),
            aliases: vec!["나벨".to_string()],
            min_prestige: 1,
            min_dealers: 1,
            min_buffers: 1,
            difficulty_tier: DifficultyTier::Normal,
        };
        assert!(table.with_entry(dup).is_err());
    }
}
