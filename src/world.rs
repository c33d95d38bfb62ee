// src/world.rs
use combat::{GameRng, HitRules};
use error::{CapabilityViolation, ConstructionError, GameError};
use items::{IdGenerator, Item, ItemClass, ItemId, Weapon, Weight};
use monster::{AnchorSlot, Monster, MonsterId, MonsterStats};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use crate::config::GameRules;

mod container;
mod currency;
mod fight;
mod invariants;
mod possession;

/// 物品的直接持有者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Holder {
    /// 挂在怪物的某个锚点上
    Monster { monster: MonsterId, anchor: usize },
    /// 放在背包里
    Backpack(ItemId),
}

/// 生成怪物所需的参数
///
/// `strength`/`damage` 为 `None` 时由世界的随机数生成器掷出。
#[derive(Debug, Clone)]
pub struct MonsterBlueprint {
    pub name: String,
    pub protection: u32,
    pub hitpoints: i64,
    pub anchor_count: usize,
    pub weapon: ItemId,
    pub backpack: ItemId,
    pub strength: Option<i32>,
    pub damage: Option<i64>,
}

impl MonsterBlueprint {
    pub fn new(name: impl Into<String>, protection: u32, hitpoints: i64, weapon: ItemId, backpack: ItemId) -> Self {
        Self {
            name: name.into(),
            protection,
            hitpoints,
            anchor_count: monster::MIN_ANCHORS,
            weapon,
            backpack,
            strength: None,
            damage: None,
        }
    }

    pub fn with_anchor_count(mut self, anchor_count: usize) -> Self {
        self.anchor_count = anchor_count;
        self
    }

    pub fn with_strength(mut self, strength: i32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = Some(damage);
        self
    }
}

/// 物品与怪物的存放区，同时是持有关系的唯一权威
///
/// 怪物的锚点数组与背包的内容列表只是索引，全部由这里的操作同步更新。
/// 每个公开操作先校验、后提交：返回错误时不会留下任何部分修改。
#[derive(Debug)]
pub struct World {
    rules: GameRules,
    hit_rules: HitRules,
    ids: IdGenerator,
    rng: GameRng,
    items: BTreeMap<ItemId, Item>,
    monsters: BTreeMap<MonsterId, Monster>,
    holders: HashMap<ItemId, Holder>,
    next_monster: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}

impl World {
    pub fn new(rules: GameRules) -> Self {
        Self {
            hit_rules: rules.hit_rules(),
            rng: GameRng::new(rules.seed),
            rules,
            ids: IdGenerator::new(),
            items: BTreeMap::new(),
            monsters: BTreeMap::new(),
            holders: HashMap::new(),
            next_monster: 0,
        }
    }

    /// 校验规则后创建
    pub fn with_rules(rules: GameRules) -> Result<Self, GameError> {
        rules.validate()?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /* ================== 生成 ================== */

    /// 随机伤害的武器
    pub fn spawn_weapon(&mut self, weight: Weight, value: u32) -> ItemId {
        let weapon = Weapon::random(&mut self.rng);
        self.spawn_weapon_with(weight, value, weapon)
    }

    /// 指定伤害的武器（调用约定：伤害在 [1, 20] 内）
    pub fn spawn_weapon_with_damage(&mut self, weight: Weight, value: u32, damage: u32) -> ItemId {
        self.spawn_weapon_with(weight, value, Weapon::new(damage))
    }

    fn spawn_weapon_with(&mut self, weight: Weight, value: u32, weapon: Weapon) -> ItemId {
        let id = self.ids.next(ItemClass::Weapon);
        debug!(item = %id, damage = weapon.damage(), %weight, "weapon spawned");
        self.items.insert(id, Item::weapon(id, weight, value, weapon));
        id
    }

    /// 创建钱袋，初始金币走正常存入流程（超出容量则直接破裂）
    pub fn spawn_purse(
        &mut self,
        weight: Weight,
        value: u32,
        capacity: u32,
        content: u32,
    ) -> Result<ItemId, ConstructionError> {
        let id = self.ids.next(ItemClass::Purse);
        let mut item = Item::purse(id, weight, value, capacity)?;
        if content > 0 {
            // 新钱袋一定是钱袋，deposit 不会返回类型错误
            let _ = item.deposit(content);
        }
        debug!(item = %id, capacity, content, torn = item.is_torn_purse(), "purse spawned");
        self.items.insert(id, item);
        Ok(id)
    }

    pub fn spawn_backpack(
        &mut self,
        weight: Weight,
        value: u32,
        capacity: u32,
    ) -> Result<ItemId, ConstructionError> {
        let id = self.ids.next(ItemClass::Backpack);
        let item = Item::backpack(id, weight, value, capacity)?;
        debug!(item = %id, capacity, "backpack spawned");
        self.items.insert(id, item);
        Ok(id)
    }

    /// 创建怪物：武器放到最小空闲锚点，背包放到背部锚点
    ///
    /// 任一步失败时怪物不会登记，武器与背包保持原样。
    pub fn spawn_monster(&mut self, blueprint: MonsterBlueprint) -> Result<MonsterId, GameError> {
        self.expect_class(blueprint.weapon, ItemClass::Weapon, "武器")?;
        self.expect_class(blueprint.backpack, ItemClass::Backpack, "背包")?;

        let damage = match blueprint.damage {
            Some(damage) => damage,
            None => Monster::roll_damage(&mut self.rng),
        };
        let strength = match blueprint.strength {
            Some(strength) => strength,
            None => Monster::roll_strength(&mut self.rng, self.rules.strength_range()),
        };

        let id = MonsterId(self.next_monster);
        let monster = Monster::new(
            id,
            MonsterStats {
                name: blueprint.name,
                protection: blueprint.protection,
                hitpoints: blueprint.hitpoints,
                damage,
                strength,
                anchor_count: blueprint.anchor_count,
                capacity_multiplier: self.rules.capacity_multiplier,
            },
        )?;
        self.monsters.insert(id, monster);

        if let Err(e) = self.attach_to_monster(blueprint.weapon, id, None) {
            self.monsters.remove(&id);
            return Err(e.into());
        }
        if let Err(e) =
            self.attach_to_monster(blueprint.backpack, id, Some(AnchorSlot::Back.index()))
        {
            let _ = self.detach_from_holder(blueprint.weapon);
            self.monsters.remove(&id);
            return Err(e.into());
        }

        self.next_monster += 1;
        if let Some(monster) = self.monsters.get(&id) {
            info!(
                monster = %id,
                name = monster.name(),
                strength = monster.strength(),
                damage = monster.damage(),
                "monster spawned"
            );
        }
        Ok(id)
    }

    fn expect_class(
        &self,
        id: ItemId,
        class: ItemClass,
        expected: &'static str,
    ) -> Result<(), CapabilityViolation> {
        self.get_item(id)?;
        if id.class != class {
            return Err(CapabilityViolation::WrongVariant { expected });
        }
        Ok(())
    }

    /* ================== 查询 ================== */

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn direct_holder(&self, id: ItemId) -> Option<Holder> {
        self.holders.get(&id).copied()
    }

    pub fn anchors(&self, monster: MonsterId) -> Result<&[Option<ItemId>], CapabilityViolation> {
        Ok(self.get_monster(monster)?.anchors())
    }

    /// 背包内容（按总重量升序）
    pub fn contents(&self, backpack: ItemId) -> Result<&[ItemId], CapabilityViolation> {
        Ok(self.get_backpack(backpack)?.contents())
    }

    /// 物品总重量：钱袋含金币，背包含全部内容（递归）
    pub fn total_weight(&self, id: ItemId) -> Result<Weight, CapabilityViolation> {
        self.get_item(id)?;
        Ok(self.weight_of(id))
    }

    /// 物品总价值：钱袋含金币，背包含全部内容（递归）
    pub fn total_value(&self, id: ItemId) -> Result<u32, CapabilityViolation> {
        self.get_item(id)?;
        Ok(self.value_of(id))
    }

    /// 怪物所有锚点上物品的总重量
    pub fn monster_total_weight(&self, monster: MonsterId) -> Result<Weight, CapabilityViolation> {
        Ok(self.load_of(self.get_monster(monster)?))
    }

    pub fn monster_total_value(&self, monster: MonsterId) -> Result<u32, CapabilityViolation> {
        Ok(self
            .get_monster(monster)?
            .anchors()
            .iter()
            .flatten()
            .fold(0u32, |sum, &id| sum.saturating_add(self.value_of(id))))
    }

    /// 沿持有链向上找到最终持有的怪物
    pub fn find_root_holder(&self, id: ItemId) -> Option<MonsterId> {
        let mut current = id;
        // 链长不会超过物品数量
        for _ in 0..=self.items.len() {
            match self.holders.get(&current)? {
                Holder::Monster { monster, .. } => return Some(*monster),
                Holder::Backpack(backpack) => current = *backpack,
            }
        }
        None
    }

    /// 从直接所在的背包开始，向外列出持有链上的所有背包
    pub(crate) fn enclosing_backpacks(&self, id: ItemId) -> Vec<ItemId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(Holder::Backpack(backpack)) = self.holders.get(&current) {
            if chain.len() > self.items.len() {
                break;
            }
            chain.push(*backpack);
            current = *backpack;
        }
        chain
    }

    /* ================== 属性修改 ================== */

    pub fn set_hitpoints(&mut self, monster: MonsterId, hitpoints: i64) -> Result<(), GameError> {
        self.get_monster_mut(monster)?.set_hitpoints(hitpoints)?;
        Ok(())
    }

    pub fn set_damage(&mut self, monster: MonsterId, damage: i64) -> Result<(), CapabilityViolation> {
        self.get_monster_mut(monster)?.set_damage(damage);
        Ok(())
    }

    /// 调用约定：伤害在 [1, 20] 内
    pub fn set_weapon_damage(&mut self, weapon: ItemId, damage: u32) -> Result<(), CapabilityViolation> {
        self.get_item_mut(weapon)?
            .as_weapon_mut()
            .ok_or(CapabilityViolation::WrongVariant { expected: "武器" })?
            .set_damage(damage);
        Ok(())
    }

    /// 修改价值（不影响重量，因此不需要重新排序）
    pub fn set_value(&mut self, id: ItemId, value: u32) -> Result<(), CapabilityViolation> {
        self.get_item_mut(id)?.set_value(value);
        Ok(())
    }

    /* ================== 内部工具 ================== */

    pub(crate) fn get_item(&self, id: ItemId) -> Result<&Item, CapabilityViolation> {
        self.items
            .get(&id)
            .ok_or_else(|| CapabilityViolation::UnknownItem(id.to_string()))
    }

    pub(crate) fn get_item_mut(&mut self, id: ItemId) -> Result<&mut Item, CapabilityViolation> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| CapabilityViolation::UnknownItem(id.to_string()))
    }

    pub(crate) fn get_monster(&self, id: MonsterId) -> Result<&Monster, CapabilityViolation> {
        self.monsters
            .get(&id)
            .ok_or_else(|| CapabilityViolation::UnknownMonster(id.to_string()))
    }

    pub(crate) fn get_monster_mut(
        &mut self,
        id: MonsterId,
    ) -> Result<&mut Monster, CapabilityViolation> {
        self.monsters
            .get_mut(&id)
            .ok_or_else(|| CapabilityViolation::UnknownMonster(id.to_string()))
    }

    pub(crate) fn get_backpack(&self, id: ItemId) -> Result<&items::Backpack, CapabilityViolation> {
        self.get_item(id)?
            .as_backpack()
            .ok_or(CapabilityViolation::WrongVariant { expected: "背包" })
    }

    /// 未知物品按零重量计
    pub(crate) fn weight_of(&self, id: ItemId) -> Weight {
        let Some(item) = self.items.get(&id) else {
            return Weight::ZERO;
        };
        match item.as_backpack() {
            Some(backpack) => {
                item.intrinsic_weight()
                    + backpack
                        .contents()
                        .iter()
                        .map(|&inner| self.weight_of(inner))
                        .sum::<Weight>()
            }
            None => item.intrinsic_weight(),
        }
    }

    pub(crate) fn value_of(&self, id: ItemId) -> u32 {
        let Some(item) = self.items.get(&id) else {
            return 0;
        };
        match item.as_backpack() {
            Some(backpack) => backpack
                .contents()
                .iter()
                .fold(item.intrinsic_value(), |sum, &inner| {
                    sum.saturating_add(self.value_of(inner))
                }),
            None => item.intrinsic_value(),
        }
    }

    pub(crate) fn load_of(&self, monster: &Monster) -> Weight {
        monster
            .anchors()
            .iter()
            .flatten()
            .map(|&id| self.weight_of(id))
            .sum()
    }

    /// 重新排序 `backpack` 及其外层所有背包
    pub(crate) fn resort_from(&mut self, backpack: ItemId) {
        let mut chain = vec![backpack];
        chain.extend(self.enclosing_backpacks(backpack));
        for id in chain {
            let Some(contents) = self.items.get(&id).and_then(Item::as_backpack) else {
                continue;
            };
            let weights: HashMap<ItemId, Weight> = contents
                .contents()
                .iter()
                .map(|&inner| (inner, self.weight_of(inner)))
                .collect();
            if let Some(bag) = self.items.get_mut(&id).and_then(Item::as_backpack_mut) {
                bag.sort_by_weight(|inner| weights.get(&inner).copied().unwrap_or(Weight::ZERO));
            }
        }
    }

    /// 物品所在的背包链（含直接背包）全部重新排序
    pub(crate) fn resort_around(&mut self, id: ItemId) {
        if let Some(Holder::Backpack(backpack)) = self.holders.get(&id).copied() {
            self.resort_from(backpack);
        }
    }
}

pub(crate) fn check_load(load: Weight, capacity: Weight) -> Result<(), CapabilityViolation> {
    if load > capacity {
        return Err(CapabilityViolation::CapacityExceeded {
            load: load.as_decimal(),
            capacity: capacity.as_decimal(),
        });
    }
    Ok(())
}
