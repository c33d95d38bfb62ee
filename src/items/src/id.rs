// src/items/src/id.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

/// 物品大类（决定编号策略）
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemClass {
    Weapon,
    Purse,
    Backpack,
}

/// 物品编号：大类 + 序号，大类不同的序号可以重复
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId {
    pub class: ItemClass,
    pub serial: u64,
}

impl ItemId {
    pub fn new(class: ItemClass, serial: u64) -> Self {
        Self { class, serial }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class, self.serial)
    }
}

/// 编号生成器
///
/// - 武器、背包：各自独立的奇数序列 1, 3, 5, …
/// - 钱袋：斐波那契序列 1, 2, 3, 5, 8, …
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    next_weapon: u64,
    next_backpack: u64,
    purse_prev: u64,
    purse_curr: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            next_weapon: 1,
            next_backpack: 1,
            purse_prev: 0,
            purse_curr: 1,
        }
    }

    pub fn next(&mut self, class: ItemClass) -> ItemId {
        let serial = match class {
            ItemClass::Weapon => Self::next_odd(&mut self.next_weapon),
            ItemClass::Backpack => Self::next_odd(&mut self.next_backpack),
            ItemClass::Purse => {
                let serial = self.purse_prev + self.purse_curr;
                self.purse_prev = self.purse_curr;
                self.purse_curr = serial;
                serial
            }
        };
        ItemId::new(class, serial)
    }

    fn next_odd(counter: &mut u64) -> u64 {
        let serial = *counter;
        *counter += 2;
        serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapons_and_backpacks_get_odd_serials() {
        let mut ids = IdGenerator::new();
        let weapons: Vec<u64> = (0..3).map(|_| ids.next(ItemClass::Weapon).serial).collect();
        let backpacks: Vec<u64> = (0..2).map(|_| ids.next(ItemClass::Backpack).serial).collect();
        assert_eq!(weapons, vec![1, 3, 5]);
        assert_eq!(backpacks, vec![1, 3]);
    }

    #[test]
    fn purses_follow_fibonacci() {
        let mut ids = IdGenerator::new();
        let purses: Vec<u64> = (0..6).map(|_| ids.next(ItemClass::Purse).serial).collect();
        assert_eq!(purses, vec![1, 2, 3, 5, 8, 13]);
    }

    #[test]
    fn class_keeps_ids_distinct() {
        let mut ids = IdGenerator::new();
        let w = ids.next(ItemClass::Weapon);
        let b = ids.next(ItemClass::Backpack);
        assert_eq!(w.serial, b.serial);
        assert_ne!(w, b);
        assert_eq!(w.to_string(), "Weapon#1");
    }
}
