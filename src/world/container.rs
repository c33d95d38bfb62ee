// src/world/container.rs
//! 背包的放入、取出、查询与整包转移。

use error::CapabilityViolation;
use items::ItemId;
use tracing::debug;

use super::{Holder, World, check_load};

impl World {
    /// 把物品放进背包
    ///
    /// 物品可以没有持有者，也可以由怪物直接持有（会先从锚点取下）；
    /// 已在背包中的物品必须先取出。外层背包与最终持有的怪物同样要满足负重。
    pub fn add_to_container(
        &mut self,
        item: ItemId,
        backpack: ItemId,
    ) -> Result<(), CapabilityViolation> {
        let incoming = self.get_item(item)?;
        let target = self.get_backpack(backpack)?;
        if item == backpack {
            return Err(CapabilityViolation::SelfContainment);
        }
        if incoming.is_destroyed() {
            return Err(CapabilityViolation::DestroyedWeapon);
        }
        let current = self.holders.get(&item).copied();
        if matches!(current, Some(Holder::Backpack(_))) {
            return Err(CapabilityViolation::HeldByContainer);
        }
        let outer = self.enclosing_backpacks(backpack);
        if outer.contains(&item) {
            return Err(CapabilityViolation::ContainmentCycle);
        }

        let weight = self.weight_of(item);
        check_load(self.weight_of(backpack) + weight, target.carrying_capacity())?;
        for &ancestor in &outer {
            let bag = self.get_backpack(ancestor)?;
            check_load(self.weight_of(ancestor) + weight, bag.carrying_capacity())?;
        }
        if let Some(root) = self.find_root_holder(backpack) {
            let already_carried = matches!(
                current,
                Some(Holder::Monster { monster, .. }) if monster == root
            );
            if !already_carried {
                let monster = self.get_monster(root)?;
                check_load(self.load_of(monster) + weight, monster.carrying_capacity())?;
            }
        }

        if let Some(Holder::Monster { monster, anchor }) = current {
            if let Some(m) = self.monsters.get_mut(&monster) {
                m.vacate_anchor(anchor);
            }
        }
        self.link_backpack(item, backpack);
        debug!(item = %item, backpack = %backpack, %weight, "item added to backpack");
        Ok(())
    }

    /// 从所在背包取出物品（之后没有持有者）
    pub fn remove_from_container(&mut self, item: ItemId) -> Result<(), CapabilityViolation> {
        self.get_item(item)?;
        let Some(Holder::Backpack(backpack)) = self.holders.get(&item).copied() else {
            return Err(CapabilityViolation::NotInContainer);
        };
        self.unlink_backpack(item, backpack);
        debug!(item = %item, backpack = %backpack, "item removed from backpack");
        Ok(())
    }

    /// 依次放入多个物品，遇到第一个失败即停止（之前的物品保持放入）
    pub fn add_items(&mut self, backpack: ItemId, items: &[ItemId]) -> Result<(), CapabilityViolation> {
        for &item in items {
            self.add_to_container(item, backpack)?;
        }
        Ok(())
    }

    /// 依次取出多个物品，遇到第一个失败即停止
    pub fn remove_items(&mut self, items: &[ItemId]) -> Result<(), CapabilityViolation> {
        for &item in items {
            self.remove_from_container(item)?;
        }
        Ok(())
    }

    /// 最轻的物品（读取有序内容的首端）
    pub fn lightest(&self, backpack: ItemId) -> Result<ItemId, CapabilityViolation> {
        self.get_backpack(backpack)?
            .lightest()
            .ok_or(CapabilityViolation::EmptyContainer)
    }

    /// 最重的物品（读取有序内容的末端）
    pub fn heaviest(&self, backpack: ItemId) -> Result<ItemId, CapabilityViolation> {
        self.get_backpack(backpack)?
            .heaviest()
            .ok_or(CapabilityViolation::EmptyContainer)
    }

    /// 最轻的物品（线性扫描，不依赖排序）
    pub fn lightest_by_scan(&self, backpack: ItemId) -> Result<ItemId, CapabilityViolation> {
        self.get_backpack(backpack)?
            .lightest_by_scan(|id| self.weight_of(id))
            .ok_or(CapabilityViolation::EmptyContainer)
    }

    pub fn heaviest_by_scan(&self, backpack: ItemId) -> Result<ItemId, CapabilityViolation> {
        self.get_backpack(backpack)?
            .heaviest_by_scan(|id| self.weight_of(id))
            .ok_or(CapabilityViolation::EmptyContainer)
    }

    /// 把 `from` 中的物品逐个移到 `to`
    ///
    /// 每个物品单独校验；某个物品失败时它留在原背包并返回错误，
    /// 之前已移动的物品不会退回。
    pub fn bulk_transfer(&mut self, from: ItemId, to: ItemId) -> Result<usize, CapabilityViolation> {
        let snapshot = self.get_backpack(from)?.contents().to_vec();
        self.get_backpack(to)?;
        if from == to {
            return Err(CapabilityViolation::SameContainer);
        }

        let mut moved = 0;
        for item in snapshot {
            self.unlink_backpack(item, from);
            if let Err(e) = self.add_to_container(item, to) {
                // 取出只会减轻重量，原样放回一定合法
                self.link_backpack(item, from);
                debug!(item = %item, from = %from, to = %to, error = %e, "bulk transfer stopped");
                return Err(e);
            }
            moved += 1;
        }
        debug!(from = %from, to = %to, moved, "bulk transfer finished");
        Ok(moved)
    }

    fn link_backpack(&mut self, item: ItemId, backpack: ItemId) {
        if let Some(bag) = self.items.get_mut(&backpack).and_then(|i| i.as_backpack_mut()) {
            bag.insert(item);
        }
        self.holders.insert(item, Holder::Backpack(backpack));
        self.resort_from(backpack);
    }

    fn unlink_backpack(&mut self, item: ItemId, backpack: ItemId) {
        if let Some(bag) = self.items.get_mut(&backpack).and_then(|i| i.as_backpack_mut()) {
            bag.remove(item);
        }
        self.holders.remove(&item);
        self.resort_from(backpack);
    }
}
