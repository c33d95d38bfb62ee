// src/items/src/purse.rs
use serde::{Deserialize, Serialize};

use crate::Weight;

/// 每枚金币的重量（百分之一千克）
pub const COIN_HUNDREDTHS: u32 = 5;

/// 存入金币后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// 金币已放入
    Stored,
    /// 超出容量，钱袋破裂（内容清零）
    Torn,
}

/// 钱袋：存放金币，超载即破裂
#[derive(PartialEq, Eq, Debug, Clone, Serialize, Deserialize)]
pub struct Purse {
    capacity: u32,
    content: u32,
    torn: bool,
}

impl Purse {
    /// 空钱袋；`capacity` 由 `Item::purse` 校验为正数
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            capacity,
            content: 0,
            torn: false,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn content(&self) -> u32 {
        self.content
    }

    pub fn is_torn(&self) -> bool {
        self.torn
    }

    /// 金币本身的重量
    pub fn coin_weight(&self) -> Weight {
        Self::coin_weight_of(self.content)
    }

    pub fn coin_weight_of(coins: u32) -> Weight {
        Weight::from_hundredths(COIN_HUNDREDTHS).times(coins)
    }

    /// 存入后是否会破裂
    pub fn would_tear(&self, amount: u32) -> bool {
        self.content as u64 + amount as u64 > self.capacity as u64
    }

    /// 存入金币
    ///
    /// 调用约定：钱袋未破裂。超出容量时钱袋破裂而不是报错，
    /// 价值清零由 [`crate::Item::deposit`] 完成。
    pub(crate) fn deposit(&mut self, amount: u32) -> DepositOutcome {
        debug_assert!(!self.torn, "deposit into a torn purse");
        if self.would_tear(amount) {
            self.tear();
            DepositOutcome::Torn
        } else {
            self.content += amount;
            DepositOutcome::Stored
        }
    }

    pub fn is_valid_withdrawal(&self, amount: u32) -> bool {
        amount <= self.content
    }

    /// 取出金币
    ///
    /// 调用约定：`amount <= content`。
    pub(crate) fn withdraw(&mut self, amount: u32) {
        debug_assert!(
            self.is_valid_withdrawal(amount),
            "withdraw {amount} from purse holding {}",
            self.content
        );
        self.content = self.content.saturating_sub(amount);
    }

    pub(crate) fn tear(&mut self) {
        self.torn = true;
        self.content = 0;
    }
}
