use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 캐릭터 역할 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleClass {
    /// 딜러 (공격 중심)
    Dealer,
    /// 버퍼 (지원 중심)
    Buffer,
    /// 기타
    Other,
}

impl RoleClass {
    pub fn label(&self) -> &'static str {
        match self {
            RoleClass::Dealer => "dealer",
            RoleClass::Buffer => "buffer",
            RoleClass::Other => "other",
        }
    }
}

/// 전투 수치 (버프력 / 딜량)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStat {
    pub support_power: u64,
    pub offensive_power: u64,
}

/// 파티 편성 대상 캐릭터
///
/// 외부 수집기가 생성/갱신하며 엔진 입장에서는 불변 값이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub server: String,
    /// 직업명 (예: "프리스트(남)")
    #[serde(default)]
    pub job_name: String,
    /// 전직명 (예: "眞 크루세이더")
    #[serde(default)]
    pub job_grow_name: Option<String>,
    /// 수집 단계에서 이미 판별된 역할. 없으면 분류기가 직업명으로 판별한다.
    #[serde(default)]
    pub role_class: Option<RoleClass>,
    /// 명성
    pub prestige: u64,
    #[serde(default)]
    pub combat_stat: CombatStat,
    /// 업둥이 (우선 배치)
    #[serde(default)]
    pub pinned: bool,
    /// 절대 배정하지 않을 활동 목록
    #[serde(default)]
    pub excluded_activities: BTreeSet<String>,
    /// 이번 주기에 이미 클리어한 활동 목록
    #[serde(default)]
    pub cleared_activities: BTreeSet<String>,
}

impl CharacterRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, prestige: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            server: String::new(),
            job_name: String::new(),
            job_grow_name: None,
            role_class: None,
            prestige,
            combat_stat: CombatStat::default(),
            pinned: false,
            excluded_activities: BTreeSet::new(),
            cleared_activities: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: RoleClass) -> Self {
        self.role_class = Some(role);
        self
    }

    pub fn with_job(mut self, job_name: impl Into<String>, job_grow_name: Option<&str>) -> Self {
        self.job_name = job_name.into();
        self.job_grow_name = job_grow_name.map(str::to_string);
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_combat(mut self, support_power: u64, offensive_power: u64) -> Self {
        self.combat_stat = CombatStat { support_power, offensive_power };
        self
    }

    pub fn as_pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn excluding(mut self, activity: impl Into<String>) -> Self {
        self.excluded_activities.insert(activity.into());
        self
    }

    pub fn cleared(mut self, activity: impl Into<String>) -> Self {
        self.cleared_activities.insert(activity.into());
        self
    }

    /// 해당 활동 키 중 하나라도 제외/클리어 목록에 있으면 true
    pub fn is_barred_from(&self, keys: &[&str]) -> bool {
        let hit = |set: &BTreeSet<String>| {
            set.iter().any(|entry| {
                let entry = entry.trim().to_lowercase();
                keys.iter().any(|key| *key == entry)
            })
        };
        hit(&self.excluded_activities) || hit(&self.cleared_activities)
    }
}
