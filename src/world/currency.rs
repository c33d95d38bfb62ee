// src/world/currency.rs
//! 钱袋的存取与转账。金币有重量，存入前要检查外层背包和怪物的负重。

use error::CapabilityViolation;
use items::{DepositOutcome, ItemId, Purse};
use tracing::{debug, info};

use super::{World, check_load};

impl World {
    /// 向钱袋存入金币
    ///
    /// 超出钱袋容量时钱袋破裂（返回 [`DepositOutcome::Torn`]），这不是错误。
    /// 未破裂时新增的金币重量不能让任何外层背包或最终持有的怪物超重。
    ///
    /// 调用约定：钱袋未破裂。
    pub fn deposit(&mut self, purse: ItemId, amount: u32) -> Result<DepositOutcome, CapabilityViolation> {
        let target = self.get_purse(purse)?;
        debug_assert!(!target.is_torn(), "deposit into torn purse {purse}");
        if target.is_torn() {
            return Ok(DepositOutcome::Torn);
        }
        if !target.would_tear(amount) {
            self.check_extra_weight(purse, amount)?;
        }

        let outcome = self.get_item_mut(purse)?.deposit(amount)?;
        match outcome {
            DepositOutcome::Stored => debug!(purse = %purse, amount, "coins deposited"),
            DepositOutcome::Torn => info!(purse = %purse, amount, "purse torn"),
        }
        self.resort_around(purse);
        Ok(outcome)
    }

    /// 从钱袋取出金币
    ///
    /// 调用约定：`amount` 不超过钱袋中的金币数。
    pub fn withdraw(&mut self, purse: ItemId, amount: u32) -> Result<(), CapabilityViolation> {
        let source = self.get_purse(purse)?;
        debug_assert!(
            source.is_valid_withdrawal(amount),
            "withdraw {amount} from {purse} holding {}",
            source.content()
        );
        self.get_item_mut(purse)?.withdraw(amount)?;
        debug!(purse = %purse, amount, "coins withdrawn");
        self.resort_around(purse);
        Ok(())
    }

    /// 从 `from` 取出金币存入 `to`，目标钱袋可能因此破裂
    ///
    /// 调用约定：两个钱袋不同，目标未破裂，`amount` 是源钱袋的合法取款数。
    /// 目标一侧超重时源钱袋恢复原状并返回错误。
    pub fn transfer_currency(
        &mut self,
        from: ItemId,
        to: ItemId,
        amount: u32,
    ) -> Result<DepositOutcome, CapabilityViolation> {
        let source = self.get_purse(from)?;
        let target = self.get_purse(to)?;
        debug_assert_ne!(from, to, "transfer into the same purse");
        debug_assert!(!target.is_torn(), "transfer into torn purse {to}");
        debug_assert!(source.is_valid_withdrawal(amount));

        self.withdraw(from, amount)?;
        match self.deposit(to, amount) {
            Ok(outcome) => {
                debug!(from = %from, to = %to, amount, ?outcome, "coins transferred");
                Ok(outcome)
            }
            Err(e) => {
                // 取出的金币原样放回，不可能超出原容量
                self.get_item_mut(from)?.deposit(amount)?;
                self.resort_around(from);
                Err(e)
            }
        }
    }

    fn get_purse(&self, id: ItemId) -> Result<&Purse, CapabilityViolation> {
        self.get_item(id)?
            .as_purse()
            .ok_or(CapabilityViolation::WrongVariant { expected: "钱袋" })
    }

    /// 钱袋增加 `coins` 枚金币后，持有链上每一层都不能超重
    fn check_extra_weight(&self, purse: ItemId, coins: u32) -> Result<(), CapabilityViolation> {
        let extra = Purse::coin_weight_of(coins);
        for backpack in self.enclosing_backpacks(purse) {
            let bag = self.get_backpack(backpack)?;
            check_load(self.weight_of(backpack) + extra, bag.carrying_capacity())?;
        }
        if let Some(root) = self.find_root_holder(purse) {
            let monster = self.get_monster(root)?;
            check_load(self.load_of(monster) + extra, monster.carrying_capacity())?;
        }
        Ok(())
    }
}
