//src/items/src/weapon.rs
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 武器伤害下限
pub const MIN_DAMAGE: u32 = 1;
/// 武器伤害上限
pub const MAX_DAMAGE: u32 = 20;

/// 武器数据（伤害 + 一次性的摧毁状态）
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    damage: u32,     // 伤害值 [1, 20]
    destroyed: bool, // 摧毁后永远无法再被持有
}

impl Weapon {
    /// 以给定伤害创建武器
    ///
    /// 调用约定：`damage` 必须位于 [MIN_DAMAGE, MAX_DAMAGE]。
    pub fn new(damage: u32) -> Self {
        debug_assert!(Self::is_valid_damage(damage), "weapon damage {damage} out of range");
        Self {
            damage,
            destroyed: false,
        }
    }

    /// 随机伤害的新武器
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random_range(MIN_DAMAGE..=MAX_DAMAGE))
    }

    pub fn damage(&self) -> u32 {
        self.damage
    }

    pub fn is_valid_damage(damage: u32) -> bool {
        (MIN_DAMAGE..=MAX_DAMAGE).contains(&damage)
    }

    /// 调用约定同 [`Weapon::new`]
    pub fn set_damage(&mut self, damage: u32) {
        debug_assert!(Self::is_valid_damage(damage), "weapon damage {damage} out of range");
        self.damage = damage;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// 标记为已摧毁（不可逆）
    ///
    /// 只改变武器自身；持有关系由 `World` 负责清除。
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}
