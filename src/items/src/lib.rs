//src/items/src/lib.rs
use error::{CapabilityViolation, ConstructionError};
use serde::{Deserialize, Serialize};

pub use crate::backpack::Backpack;
pub use crate::id::{IdGenerator, ItemClass, ItemId};
pub use crate::purse::{DepositOutcome, Purse};
pub use crate::weapon::Weapon;
pub use crate::weight::Weight;

pub mod backpack;
pub mod id;
pub mod purse;
pub mod weapon;
pub mod weight;

/// 基础物品结构（编号、重量、价值 + 具体类型）
///
/// 物品本身不记录持有者，持有关系由 `World` 统一维护。
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    weight: Weight,
    value: u32,
    kind: ItemKind,
}

/// 物品类型枚举
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon(Weapon),     // 武器
    Purse(Purse),       // 钱袋（储物类）
    Backpack(Backpack), // 背包（储物类）
}

impl Item {
    pub fn weapon(id: ItemId, weight: Weight, value: u32, weapon: Weapon) -> Self {
        debug_assert_eq!(id.class, ItemClass::Weapon);
        Self {
            id,
            weight,
            value,
            kind: ItemKind::Weapon(weapon),
        }
    }

    /// 创建空钱袋（容量必须为正）
    pub fn purse(
        id: ItemId,
        weight: Weight,
        value: u32,
        capacity: u32,
    ) -> Result<Self, ConstructionError> {
        debug_assert_eq!(id.class, ItemClass::Purse);
        Self::check_capacity(capacity)?;
        Ok(Self {
            id,
            weight,
            value,
            kind: ItemKind::Purse(Purse::new(capacity)),
        })
    }

    /// 创建空背包（容量必须为正，承重上限等于容量千克数）
    pub fn backpack(
        id: ItemId,
        weight: Weight,
        value: u32,
        capacity: u32,
    ) -> Result<Self, ConstructionError> {
        debug_assert_eq!(id.class, ItemClass::Backpack);
        Self::check_capacity(capacity)?;
        Ok(Self {
            id,
            weight,
            value,
            kind: ItemKind::Backpack(Backpack::new(capacity)),
        })
    }

    fn check_capacity(capacity: u32) -> Result<(), ConstructionError> {
        if capacity == 0 {
            return Err(ConstructionError::InvalidCapacity(capacity));
        }
        Ok(())
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// 修改价值；破裂的钱袋价值永远为零
    pub fn set_value(&mut self, value: u32) {
        if self.is_torn_purse() {
            return;
        }
        self.value = value;
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// 不含背包内容的总重量：武器为自身重量，钱袋加上金币重量
    pub fn intrinsic_weight(&self) -> Weight {
        match &self.kind {
            ItemKind::Weapon(_) | ItemKind::Backpack(_) => self.weight,
            ItemKind::Purse(p) => self.weight + p.coin_weight(),
        }
    }

    /// 不含背包内容的总价值：钱袋加上金币数
    pub fn intrinsic_value(&self) -> u32 {
        match &self.kind {
            ItemKind::Weapon(_) | ItemKind::Backpack(_) => self.value,
            ItemKind::Purse(p) => self.value.saturating_add(p.content()),
        }
    }

    /// 储物类物品的容量（武器没有容量）
    pub fn capacity(&self) -> Option<u32> {
        match &self.kind {
            ItemKind::Weapon(_) => None,
            ItemKind::Purse(p) => Some(p.capacity()),
            ItemKind::Backpack(b) => Some(b.capacity()),
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(&self.kind, ItemKind::Weapon(w) if w.is_destroyed())
    }

    pub fn is_torn_purse(&self) -> bool {
        matches!(&self.kind, ItemKind::Purse(p) if p.is_torn())
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match &self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match &mut self.kind {
            ItemKind::Weapon(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_purse(&self) -> Option<&Purse> {
        match &self.kind {
            ItemKind::Purse(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_backpack(&self) -> Option<&Backpack> {
        match &self.kind {
            ItemKind::Backpack(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_backpack_mut(&mut self) -> Option<&mut Backpack> {
        match &mut self.kind {
            ItemKind::Backpack(b) => Some(b),
            _ => None,
        }
    }

    /* ================== 钱袋操作 ================== */

    /// 向钱袋存入金币；破裂时价值一并清零
    ///
    /// 调用约定：钱袋未破裂。
    pub fn deposit(&mut self, amount: u32) -> Result<DepositOutcome, CapabilityViolation> {
        let purse = self.purse_mut()?;
        let outcome = purse.deposit(amount);
        if outcome == DepositOutcome::Torn {
            self.value = 0;
        }
        Ok(outcome)
    }

    /// 从钱袋取出金币
    ///
    /// 调用约定：`amount` 不超过当前金币数。
    pub fn withdraw(&mut self, amount: u32) -> Result<(), CapabilityViolation> {
        self.purse_mut()?.withdraw(amount);
        Ok(())
    }

    fn purse_mut(&mut self) -> Result<&mut Purse, CapabilityViolation> {
        match &mut self.kind {
            ItemKind::Purse(p) => Ok(p),
            _ => Err(CapabilityViolation::WrongVariant { expected: "钱袋" }),
        }
    }

    /// 摧毁武器（只改变武器状态）
    pub fn destroy(&mut self) -> Result<(), CapabilityViolation> {
        self.as_weapon_mut()
            .ok_or(CapabilityViolation::WrongVariant { expected: "武器" })?
            .destroy();
        Ok(())
    }
}
