// src/world/possession.rs
//! 物品与怪物锚点之间的持有关系：挂上、取下、转交、替换、丢弃、摧毁。

use error::CapabilityViolation;
use items::ItemId;
use monster::{AnchorSlot, MonsterId};
use tracing::{debug, info};

use super::{Holder, World, check_load};

impl World {
    /// 把没有持有者的物品挂到怪物身上
    ///
    /// `slot` 为 `None` 时使用最小的空闲锚点，返回实际使用的锚点。
    pub fn attach_to_monster(
        &mut self,
        item: ItemId,
        monster: MonsterId,
        slot: Option<usize>,
    ) -> Result<usize, CapabilityViolation> {
        let incoming = self.get_item(item)?;
        if self.holders.contains_key(&item) {
            return Err(CapabilityViolation::AlreadyHeld);
        }
        if incoming.is_destroyed() {
            return Err(CapabilityViolation::DestroyedWeapon);
        }
        let target = self.get_monster(monster)?;
        let anchor = target.resolve_free_anchor(slot)?;
        check_load(
            self.load_of(target) + self.weight_of(item),
            target.carrying_capacity(),
        )?;

        self.link_anchor(item, monster, anchor);
        debug!(item = %item, monster = %monster, anchor = %AnchorSlot::label(anchor), "item attached");
        Ok(anchor)
    }

    /// 从怪物一侧挂上物品，与 [`World::attach_to_monster`] 相同
    pub fn attach_at(
        &mut self,
        monster: MonsterId,
        item: ItemId,
        slot: Option<usize>,
    ) -> Result<usize, CapabilityViolation> {
        self.attach_to_monster(item, monster, slot)
    }

    /// 取下由怪物直接持有的物品
    pub fn detach_from_holder(&mut self, item: ItemId) -> Result<(), CapabilityViolation> {
        self.get_item(item)?;
        let Some(Holder::Monster { monster, anchor }) = self.holders.get(&item).copied() else {
            return Err(CapabilityViolation::NotHeldByMonster);
        };
        self.unlink_anchor(item, monster, anchor);
        debug!(item = %item, monster = %monster, anchor = %AnchorSlot::label(anchor), "item detached");
        Ok(())
    }

    /// 把怪物直接持有的物品转交给另一个（或同一个）怪物的空闲锚点
    pub fn transfer_to_monster(
        &mut self,
        item: ItemId,
        monster: MonsterId,
        slot: Option<usize>,
    ) -> Result<usize, CapabilityViolation> {
        self.get_item(item)?;
        let Some(Holder::Monster {
            monster: from,
            anchor: old_anchor,
        }) = self.holders.get(&item).copied()
        else {
            return Err(CapabilityViolation::NotHeldByMonster);
        };
        let target = self.get_monster(monster)?;
        let anchor = target.resolve_free_anchor(slot)?;
        if from != monster {
            check_load(
                self.load_of(target) + self.weight_of(item),
                target.carrying_capacity(),
            )?;
        }

        self.unlink_anchor(item, from, old_anchor);
        self.link_anchor(item, monster, anchor);
        debug!(item = %item, from = %from, to = %monster, anchor = %AnchorSlot::label(anchor), "item transferred");
        Ok(anchor)
    }

    /// 用新物品替换锚点上的物品
    ///
    /// 原来的武器被摧毁，其他物品只是被丢下。
    pub fn replace_at(
        &mut self,
        monster: MonsterId,
        index: usize,
        item: ItemId,
    ) -> Result<(), CapabilityViolation> {
        let incoming = self.get_item(item)?;
        let target = self.get_monster(monster)?;
        target.check_index(index)?;
        if self.holders.contains_key(&item) {
            return Err(CapabilityViolation::AlreadyHeld);
        }
        if incoming.is_destroyed() {
            return Err(CapabilityViolation::DestroyedWeapon);
        }
        let outgoing = target.anchor(index);
        let outgoing_weight = outgoing.map(|id| self.weight_of(id)).unwrap_or_default();
        check_load(
            self.load_of(target).saturating_sub(outgoing_weight) + self.weight_of(item),
            target.carrying_capacity(),
        )?;

        if let Some(old) = outgoing {
            self.unlink_anchor(old, monster, index);
            if let Some(weapon) = self.items.get_mut(&old).and_then(|i| i.as_weapon_mut()) {
                weapon.destroy();
                info!(item = %old, monster = %monster, "weapon destroyed by replacement");
            } else {
                debug!(item = %old, monster = %monster, "item dropped by replacement");
            }
        }
        self.link_anchor(item, monster, index);
        debug!(item = %item, monster = %monster, anchor = %AnchorSlot::label(index), "item replaced");
        Ok(())
    }

    /// 丢下锚点上的非武器物品（物品保持完好，不再有持有者）
    pub fn drop_item(&mut self, monster: MonsterId, item: ItemId) -> Result<(), CapabilityViolation> {
        let dropped = self.get_item(item)?;
        if dropped.as_weapon().is_some() {
            return Err(CapabilityViolation::WrongVariant {
                expected: "非武器物品",
            });
        }
        match self.holders.get(&item).copied() {
            Some(Holder::Monster { monster: holder, anchor }) if holder == monster => {
                self.unlink_anchor(item, monster, anchor);
                debug!(item = %item, monster = %monster, "item dropped");
                Ok(())
            }
            _ => Err(CapabilityViolation::NotHeldByMonster),
        }
    }

    /// 摧毁怪物直接持有的武器：清空锚点并永久标记为已摧毁
    pub fn destroy_weapon(&mut self, item: ItemId) -> Result<(), CapabilityViolation> {
        if self.get_item(item)?.as_weapon().is_none() {
            return Err(CapabilityViolation::WrongVariant { expected: "武器" });
        }
        let Some(Holder::Monster { monster, anchor }) = self.holders.get(&item).copied() else {
            return Err(CapabilityViolation::NotHeldByMonster);
        };
        self.unlink_anchor(item, monster, anchor);
        self.get_item_mut(item)?.destroy()?;
        info!(item = %item, monster = %monster, "weapon destroyed");
        Ok(())
    }

    fn link_anchor(&mut self, item: ItemId, monster: MonsterId, anchor: usize) {
        if let Some(m) = self.monsters.get_mut(&monster) {
            m.occupy_anchor(anchor, item);
        }
        self.holders.insert(item, Holder::Monster { monster, anchor });
    }

    fn unlink_anchor(&mut self, item: ItemId, monster: MonsterId, anchor: usize) {
        if let Some(m) = self.monsters.get_mut(&monster) {
            m.vacate_anchor(anchor);
        }
        self.holders.remove(&item);
    }
}
