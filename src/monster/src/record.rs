// src/monster/src/record.rs
use combat::Combatant;
use error::{CapabilityViolation, ConstructionError, HitpointsError};
use items::{ItemId, Weight};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::name::is_valid_name;

pub const MIN_DAMAGE: u32 = 1;
pub const MAX_DAMAGE: u32 = 20;
pub const MIN_PROTECTION: u32 = 1;
pub const MAX_PROTECTION: u32 = 40;
pub const MIN_ANCHORS: usize = 3;

/// 怪物句柄（由 `World` 顺序分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u64);

impl fmt::Display for MonsterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Monster#{}", self.0)
    }
}

/// 构造怪物所需的全部属性（随机部分已由调用方掷出）
#[derive(Debug, Clone)]
pub struct MonsterStats {
    pub name: String,
    pub protection: u32,
    pub hitpoints: i64,
    pub damage: i64,
    pub strength: i32,
    pub anchor_count: usize,
    pub capacity_multiplier: u32,
}

/// 怪物核心数据结构
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Monster {
    id: MonsterId,
    name: String,
    hitpoints: u32,
    max_hitpoints: u32,
    protection: u32,
    damage: u32,
    strength: i32,
    carrying_capacity: Weight,
    anchors: Vec<Option<ItemId>>, // 锚点索引，权威关系在 World 中
}

impl Monster {
    /// 创建怪物（锚点全部为空）
    ///
    /// 调用约定：`protection` 为 [1, 40] 内的质数，构造时不做运行期校验。
    pub fn new(id: MonsterId, stats: MonsterStats) -> Result<Self, ConstructionError> {
        if !is_valid_name(&stats.name) {
            return Err(ConstructionError::InvalidName(stats.name));
        }
        if stats.hitpoints < 0 || stats.hitpoints > u32::MAX as i64 {
            return Err(ConstructionError::InvalidHitpoints(stats.hitpoints));
        }
        if stats.anchor_count < MIN_ANCHORS {
            return Err(ConstructionError::InvalidAnchorCount(stats.anchor_count));
        }
        debug_assert!(
            Self::is_valid_protection(stats.protection),
            "protection {} must be a prime in [{MIN_PROTECTION}, {MAX_PROTECTION}]",
            stats.protection
        );

        let max_hitpoints = stats.hitpoints as u32;
        Ok(Self {
            id,
            name: stats.name,
            hitpoints: max_hitpoints,
            max_hitpoints,
            protection: stats.protection,
            damage: Self::clamp_damage(stats.damage),
            strength: stats.strength,
            carrying_capacity: Weight::from_kg(stats.strength.unsigned_abs())
                .times(stats.capacity_multiplier),
            anchors: vec![None; stats.anchor_count],
        })
    }

    /// 掷基础伤害 [0, 20]（构造时再夹到 [1, 20]）
    pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R) -> i64 {
        rng.random_range(0..=MAX_DAMAGE as i64)
    }

    /// 在给定范围内掷力量
    pub fn roll_strength<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<i32>) -> i32 {
        rng.random_range(range)
    }

    pub fn is_valid_protection(protection: u32) -> bool {
        (MIN_PROTECTION..=MAX_PROTECTION).contains(&protection) && is_prime(protection)
    }

    fn clamp_damage(damage: i64) -> u32 {
        damage.clamp(MIN_DAMAGE as i64, MAX_DAMAGE as i64) as u32
    }

    /* ================== 基础属性 ================== */
    pub fn id(&self) -> MonsterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hitpoints(&self) -> u32 {
        self.hitpoints
    }

    pub fn max_hitpoints(&self) -> u32 {
        self.max_hitpoints
    }

    pub fn is_valid_hitpoints(&self, hitpoints: i64) -> bool {
        (0..=self.max_hitpoints as i64).contains(&hitpoints)
    }

    pub fn set_hitpoints(&mut self, hitpoints: i64) -> Result<(), HitpointsError> {
        if !self.is_valid_hitpoints(hitpoints) {
            return Err(HitpointsError {
                value: hitpoints,
                max: self.max_hitpoints,
            });
        }
        self.hitpoints = hitpoints as u32;
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.hitpoints > 0
    }

    pub fn protection(&self) -> u32 {
        self.protection
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    /// 设置伤害，超出 [1, 20] 时夹到边界
    pub fn set_damage(&mut self, damage: i64) {
        self.damage = Self::clamp_damage(damage);
    }

    pub fn strength(&self) -> i32 {
        self.strength
    }

    pub fn carrying_capacity(&self) -> Weight {
        self.carrying_capacity
    }

    /* ================== 锚点索引 ================== */
    pub fn anchors(&self) -> &[Option<ItemId>] {
        &self.anchors
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn anchor(&self, index: usize) -> Option<ItemId> {
        self.anchors.get(index).copied().flatten()
    }

    pub fn first_free_anchor(&self) -> Option<usize> {
        self.anchors.iter().position(Option::is_none)
    }

    pub fn anchor_of(&self, item: ItemId) -> Option<usize> {
        self.anchors.iter().position(|slot| *slot == Some(item))
    }

    pub fn check_index(&self, index: usize) -> Result<(), CapabilityViolation> {
        if index >= self.anchors.len() {
            return Err(CapabilityViolation::AnchorOutOfRange {
                index,
                len: self.anchors.len(),
            });
        }
        Ok(())
    }

    /// 解析目标锚点：指定时必须在范围内且空闲，未指定时取最小空闲锚点
    pub fn resolve_free_anchor(&self, slot: Option<usize>) -> Result<usize, CapabilityViolation> {
        match slot {
            Some(index) => {
                self.check_index(index)?;
                if self.anchors[index].is_some() {
                    return Err(CapabilityViolation::SlotOccupied(index));
                }
                Ok(index)
            }
            None => self.first_free_anchor().ok_or(CapabilityViolation::NoFreeAnchor),
        }
    }

    /// 低层写入：只更新索引，由 `World` 在校验后调用
    pub fn occupy_anchor(&mut self, index: usize, item: ItemId) {
        self.anchors[index] = Some(item);
    }

    /// 低层清除：返回原来的物品
    pub fn vacate_anchor(&mut self, index: usize) -> Option<ItemId> {
        self.anchors.get_mut(index).and_then(Option::take)
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn hitpoints(&self) -> u32 {
        self.hitpoints
    }

    fn max_hitpoints(&self) -> u32 {
        self.max_hitpoints
    }

    fn protection(&self) -> u32 {
        self.protection
    }

    fn damage(&self) -> u32 {
        self.damage
    }

    fn strength(&self) -> i32 {
        self.strength
    }

    fn set_hitpoints(&mut self, hitpoints: i64) -> Result<(), HitpointsError> {
        Monster::set_hitpoints(self, hitpoints)
    }

    fn knock_out(&mut self) {
        self.hitpoints = 0;
    }
}

/// 质数判断
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}
