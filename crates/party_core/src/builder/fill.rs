//! 전략별 슬롯 채우기
//!
//! 모든 함수는 후보 목록을 받아 배치 순서대로 고른 후보를 돌려준다.
//! 고른 인원이 슬롯 수보다 적으면 나머지는 빈 슬롯이 된다.

use crate::config::EngineConfig;
use crate::models::{CharacterRecord, RoleClass, Slot, SQUAD_SIZE};
use crate::tables::SynergyWeights;
use std::cmp::Ordering;
use std::collections::HashSet;

/// 역할이 판별된 편성 후보
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'p> {
    pub character: &'p CharacterRecord,
    pub role: RoleClass,
}

impl<'p> Candidate<'p> {
    pub fn id(&self) -> &'p str {
        self.character.id.as_str()
    }

    pub fn prestige(&self) -> u64 {
        self.character.prestige
    }

    pub fn pinned(&self) -> bool {
        self.character.pinned
    }

    /// 역할에 맞는 전투 수치 (딜러: 딜량, 버퍼: 버프력, 기타: 둘 중 큰 값)
    pub fn role_power(&self) -> u64 {
        let stat = &self.character.combat_stat;
        match self.role {
            RoleClass::Dealer => stat.offensive_power,
            RoleClass::Buffer => stat.support_power,
            RoleClass::Other => stat.offensive_power.max(stat.support_power),
        }
    }
}

/// 명성 내림차순, 동점은 id 오름차순
pub fn by_prestige(a: &Candidate, b: &Candidate) -> Ordering {
    b.prestige().cmp(&a.prestige()).then_with(|| a.id().cmp(b.id()))
}

/// 역할 전투 수치 내림차순, 동점은 명성 순
fn by_role_power(a: &Candidate, b: &Candidate) -> Ordering {
    b.role_power().cmp(&a.role_power()).then_with(|| by_prestige(a, b))
}

/// 중복 없이 최대 SQUAD_SIZE명까지 고르는 누적기
struct Picker<'p> {
    picked: Vec<Candidate<'p>>,
    used: HashSet<&'p str>,
}

impl<'p> Picker<'p> {
    fn new() -> Self {
        Self { picked: Vec::with_capacity(SQUAD_SIZE), used: HashSet::new() }
    }

    fn is_full(&self) -> bool {
        self.picked.len() >= SQUAD_SIZE
    }

    fn is_used(&self, c: &Candidate<'p>) -> bool {
        self.used.contains(c.id())
    }

    fn try_pick(&mut self, c: Candidate<'p>) -> bool {
        if self.is_full() || !self.used.insert(c.id()) {
            return false;
        }
        self.picked.push(c);
        true
    }

    fn count_role(&self, role: RoleClass) -> usize {
        self.picked.iter().filter(|c| c.role == role).count()
    }

    /// 조건에 맞는 후보를 순서대로 `limit`명까지 추가
    fn take_while_room(
        &mut self,
        ordered: &[Candidate<'p>],
        limit: usize,
        mut accept: impl FnMut(&Candidate<'p>) -> bool,
    ) {
        let mut taken = 0;
        for c in ordered {
            if taken >= limit || self.is_full() {
                break;
            }
            if !self.is_used(c) && accept(c) && self.try_pick(*c) {
                taken += 1;
            }
        }
    }

    fn finish(self) -> Vec<Candidate<'p>> {
        self.picked
    }
}

/// 업둥이 선배치 한도. 딜러/버퍼는 역할 쿼터, 기타 역할은 남은 빈자리 전부.
fn pinned_quota(config: &EngineConfig, role: RoleClass, picked: usize) -> usize {
    match role {
        RoleClass::Dealer => config.dealer_quota,
        RoleClass::Buffer => config.buffer_quota,
        RoleClass::Other => SQUAD_SIZE.saturating_sub(picked),
    }
}

/// Efficiency: 업둥이(역할 무관, 딜러/버퍼는 쿼터 내) → 딜러 쿼터 → 버퍼 쿼터 → 남은 인원 명성 순
pub fn efficiency<'p>(
    candidates: &[Candidate<'p>],
    config: &EngineConfig,
    pinned_first: bool,
) -> Vec<Candidate<'p>> {
    let mut ordered = candidates.to_vec();
    ordered.sort_by(by_prestige);

    let mut picker = Picker::new();

    if pinned_first {
        for c in ordered.iter().filter(|c| c.pinned()) {
            if picker.is_full() {
                break;
            }
            if picker.count_role(c.role) < pinned_quota(config, c.role, picker.picked.len()) {
                picker.try_pick(*c);
            }
        }
    }

    let dealer_room = config.dealer_quota.saturating_sub(picker.count_role(RoleClass::Dealer));
    picker.take_while_room(&ordered, dealer_room, |c| c.role == RoleClass::Dealer);

    let buffer_room = config.buffer_quota.saturating_sub(picker.count_role(RoleClass::Buffer));
    picker.take_while_room(&ordered, buffer_room, |c| c.role == RoleClass::Buffer);

    picker.take_while_room(&ordered, SQUAD_SIZE, |_| true);
    picker.finish()
}

/// Balance: 업둥이 1 → 딜러 2 → 버퍼 1 → 업둥이 또는 남은 최고 명성
///
/// 역할 버킷 안에서는 역할 전투 수치(딜량/버프력) 순으로 고른다.
/// 딜러/버퍼 목표는 업둥이가 아닌 인원으로 채운다.
pub fn balance<'p>(
    candidates: &[Candidate<'p>],
    config: &EngineConfig,
    pinned_first: bool,
) -> Vec<Candidate<'p>> {
    let mut by_power = candidates.to_vec();
    by_power.sort_by(by_role_power);
    let mut by_fame = candidates.to_vec();
    by_fame.sort_by(by_prestige);

    let mut picker = Picker::new();

    if pinned_first {
        picker.take_while_room(&by_fame, config.balance_pinned_target, |c| c.pinned());
    }

    picker.take_while_room(&by_power, config.balance_dealer_target, |c| {
        c.role == RoleClass::Dealer && !c.pinned()
    });
    picker.take_while_room(&by_power, config.balance_buffer_target, |c| {
        c.role == RoleClass::Buffer && !c.pinned()
    });

    let pinned_now = picker.picked.iter().filter(|c| c.pinned()).count();
    let pinned_room = config.balance_pinned_target.saturating_sub(pinned_now);
    picker.take_while_room(&by_fame, pinned_room, |c| c.pinned());

    picker.take_while_room(&by_fame, SQUAD_SIZE, |_| true);
    picker.finish()
}

/// Synergy (근사 휴리스틱)
///
/// 가장 가중치가 높은 역할 쌍을 찾고, 그 쌍의 각 역할에서 최고 명성 1명씩을 먼저 넣은 뒤
/// 해당 역할 후보들의 명성 순 앞부분으로 채운다. 모자라면 나머지 역할에서 명성 순.
/// 모든 조합을 탐색하지 않으므로 최대 시너지 합을 보장하지 않는다.
pub fn synergy<'p>(
    candidates: &[Candidate<'p>],
    weights: &SynergyWeights,
    pinned_first: bool,
) -> Vec<Candidate<'p>> {
    let mut ordered = candidates.to_vec();
    if pinned_first {
        ordered.sort_by(|a, b| b.pinned().cmp(&a.pinned()).then_with(|| by_prestige(a, b)));
    } else {
        ordered.sort_by(by_prestige);
    }

    let available: HashSet<RoleClass> = ordered.iter().map(|c| c.role).collect();
    let top_pair = weights
        .ranked_pairs()
        .into_iter()
        .map(|(pair, _)| pair)
        .find(|(a, b)| {
            available.contains(a)
                && available.contains(b)
                && (a != b || ordered.iter().filter(|c| c.role == *a).count() >= 2)
        });

    let mut picker = Picker::new();

    if let Some((a, b)) = top_pair {
        picker.take_while_room(&ordered, 1, |c| c.role == a);
        picker.take_while_room(&ordered, 1, |c| c.role == b);
        picker.take_while_room(&ordered, SQUAD_SIZE, |c| c.role == a || c.role == b);
    }

    picker.take_while_room(&ordered, SQUAD_SIZE, |_| true);
    picker.finish()
}

/// Safety 사전 필터: 명성이 최소 명성 * (1 + margin) 이상인 후보만 남긴다.
pub fn safety_pool<'p>(candidates: &[Candidate<'p>], floor: f64) -> Vec<Candidate<'p>> {
    candidates
        .iter()
        .filter(|c| c.prestige() as f64 >= floor)
        .copied()
        .collect()
}

/// 고른 후보를 슬롯으로 바꾸고 빈 슬롯을 채워 SQUAD_SIZE개로 맞춘다.
pub fn into_slots(picked: Vec<Candidate<'_>>) -> Vec<Slot> {
    let mut slots: Vec<Slot> = picked
        .into_iter()
        .take(SQUAD_SIZE)
        .enumerate()
        .map(|(i, c)| Slot::occupied(i, c.character.clone(), c.role))
        .collect();
    while slots.len() < SQUAD_SIZE {
        slots.push(Slot::empty(slots.len()));
    }
    slots
}
