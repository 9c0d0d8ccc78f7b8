use crate::error::{EngineError, Result};
use crate::models::RoleClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    pub job_name: String,
    #[serde(default)]
    pub job_grow_name: Option<String>,
    pub role: RoleClass,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTableFile {
    pub version: u8,
    pub entries: Vec<JobEntry>,
    #[serde(default)]
    pub buffer_keywords: Vec<String>,
}

/// 직업 → 역할 분류표
#[derive(Debug, Clone, Default)]
pub struct JobTable {
    exact: HashMap<(String, String), RoleClass>,
    by_job: HashMap<String, RoleClass>,
    buffer_keywords: Vec<String>,
}

impl JobTable {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: JobTableFile = serde_yaml::from_str(yaml)?;
        Self::from_file(file)
    }

    pub fn from_file(file: JobTableFile) -> Result<Self> {
        let mut table = JobTable {
            buffer_keywords: file
                .buffer_keywords
                .iter()
                .map(|k| normalize_job_label(k))
                .filter(|k| !k.is_empty())
                .collect(),
            ..Default::default()
        };

        for entry in file.entries {
            let job = entry.job_name.trim().to_string();
            if job.is_empty() {
                return Err(EngineError::TableLoad("job entry with empty job_name".to_string()));
            }
            let previous = match entry.job_grow_name {
                Some(grow) => table.exact.insert((job.clone(), grow.trim().to_string()), entry.role),
                None => table.by_job.insert(job.clone(), entry.role),
            };
            if let Some(prev) = previous {
                if prev != entry.role {
                    return Err(EngineError::TableLoad(format!(
                        "conflicting roles for job {}: {:?} vs {:?}",
                        job, prev, entry.role
                    )));
                }
            }
        }

        Ok(table)
    }

    pub fn exact(&self, job_name: &str, job_grow_name: &str) -> Option<RoleClass> {
        self.exact
            .get(&(job_name.trim().to_string(), job_grow_name.trim().to_string()))
            .copied()
    }

    pub fn by_job(&self, job_name: &str) -> Option<RoleClass> {
        self.by_job.get(job_name.trim()).copied()
    }

    pub fn buffer_keywords(&self) -> &[String] {
        &self.buffer_keywords
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.by_job.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 각성 표기(眞)와 공백을 제거하고 소문자로 맞춘다.
pub fn normalize_job_label(label: &str) -> String {
    label.replace('眞', " ").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_annotation() {
        assert_eq!(normalize_job_label("眞 크루세이더"), "크루세이더");
        assert_eq!(normalize_job_label("  Crusader "), "crusader");
    }

    #[test]
    fn test_conflicting_entries_rejected() {
        let yaml = r#"
version: 1
entries:
  - { job_name: "아처", role: dealer }
  - { job_name: "아처", role: buffer }
"#;
        assert!(matches!(JobTable::from_yaml(yaml), Err(EngineError::TableLoad(_))));
    }

    #[test]
    fn test_lookup_split_by_grow_name() {
        let yaml = r#"
version: 1
entries:
  - { job_name: "아처", job_grow_name: "眞 뮤즈", role: buffer }
  - { job_name: "도적", role: dealer }
buffer_keywords: ["뮤즈"]
"#;
        let table = JobTable::from_yaml(yaml).unwrap();
        assert_eq!(table.exact("아처", "眞 뮤즈"), Some(RoleClass::Buffer));
        assert_eq!(table.by_job("아처"), None);
        assert_eq!(table.by_job("도적"), Some(RoleClass::Dealer));
        assert_eq!(table.len(), 2);
    }
}
