// src/items/src/backpack.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{ItemId, Weight};

/// 背包：按总重量升序保存内部物品的编号
///
/// 背包只保存持有关系在容器一侧的索引，权威的持有关系由 `World` 维护，
/// 因此 `insert`/`remove` 不做任何校验。
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Backpack {
    capacity: u32,
    carrying_capacity: Weight,
    contents: Vec<ItemId>,        // 按总重量升序
    unordered: HashSet<ItemId>,   // 线性扫描用的无序集合
}

impl Backpack {
    /// `capacity` 由 `Item::backpack` 校验为正数
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            capacity,
            carrying_capacity: Weight::from_kg(capacity),
            contents: Vec::new(),
            unordered: HashSet::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// 最大承重（自身重量 + 内容总重不得超过此值）
    pub fn carrying_capacity(&self) -> Weight {
        self.carrying_capacity
    }

    pub fn contents(&self) -> &[ItemId] {
        &self.contents
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.unordered.contains(&id)
    }

    /// 追加物品编号（调用方随后必须重新排序）
    pub fn insert(&mut self, id: ItemId) {
        if self.unordered.insert(id) {
            self.contents.push(id);
        }
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        if !self.unordered.remove(&id) {
            return false;
        }
        self.contents.retain(|&other| other != id);
        true
    }

    /// 按总重量升序排列（稳定排序，重量相同保持放入顺序）
    pub fn sort_by_weight<F>(&mut self, mut weight_of: F)
    where
        F: FnMut(ItemId) -> Weight,
    {
        self.contents.sort_by_key(|&id| weight_of(id));
    }

    /* ================== 方式一：读取有序序列的两端 ================== */
    pub fn lightest(&self) -> Option<ItemId> {
        self.contents.first().copied()
    }

    pub fn heaviest(&self) -> Option<ItemId> {
        self.contents.last().copied()
    }

    /* ================== 方式二：扫描无序集合 ================== */
    pub fn lightest_by_scan<F>(&self, mut weight_of: F) -> Option<ItemId>
    where
        F: FnMut(ItemId) -> Weight,
    {
        self.unordered
            .iter()
            .map(|&id| (weight_of(id), id))
            .min()
            .map(|(_, id)| id)
    }

    pub fn heaviest_by_scan<F>(&self, mut weight_of: F) -> Option<ItemId>
    where
        F: FnMut(ItemId) -> Weight,
    {
        // 重量相同时取编号最小的，与 lightest_by_scan 对称
        self.unordered
            .iter()
            .map(|&id| (weight_of(id), std::cmp::Reverse(id)))
            .max()
            .map(|(_, std::cmp::Reverse(id))| id)
    }
}
