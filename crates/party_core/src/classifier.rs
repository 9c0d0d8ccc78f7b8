//! Role Classifier
//!
//! 직업명 → 역할. 조회 순서는 고정이다:
//! 1. (직업, 전직) 정확 매칭
//! 2. 직업 단독 매칭
//! 3. 버퍼 직업 키워드 부분 문자열 매칭 (眞 표기 제거 후)
//! 4. Dealer
//!
//! 직업표가 불완전하므로 3단계는 안전망이고, 앞 단계가 결과를 내면 실행되지 않는다.

use crate::models::{CharacterRecord, RoleClass};
use crate::tables::{normalize_job_label, JobTable};

/// 직업표를 빌려 쓰는 분류기
#[derive(Debug, Clone, Copy)]
pub struct RoleClassifier<'a> {
    jobs: &'a JobTable,
}

impl<'a> RoleClassifier<'a> {
    pub fn new(jobs: &'a JobTable) -> Self {
        Self { jobs }
    }

    /// 항상 역할을 돌려준다 (실패 없음).
    pub fn classify(&self, job_name: &str, job_grow_name: Option<&str>) -> RoleClass {
        if let Some(grow) = job_grow_name {
            if let Some(role) = self.jobs.exact(job_name, grow) {
                return role;
            }
        }

        if let Some(role) = self.jobs.by_job(job_name) {
            return role;
        }

        if self.matches_buffer_keyword(job_name, job_grow_name) {
            return RoleClass::Buffer;
        }

        RoleClass::Dealer
    }

    /// 수집 단계에서 지정된 역할이 있으면 그것을, 없으면 직업명으로 판별
    pub fn role_of(&self, character: &CharacterRecord) -> RoleClass {
        character.role_class.unwrap_or_else(|| {
            self.classify(&character.job_name, character.job_grow_name.as_deref())
        })
    }

    fn matches_buffer_keyword(&self, job_name: &str, job_grow_name: Option<&str>) -> bool {
        let labels = std::iter::once(job_name)
            .chain(job_grow_name)
            .map(normalize_job_label)
            .filter(|label| !label.is_empty());

        for label in labels {
            if self.jobs.buffer_keywords().iter().any(|k| label.contains(k.as_str())) {
                return true;
            }
        }
        false
    }
}
