// src/world/fight.rs
use combat::{Combat, CombatResult};
use error::CapabilityViolation;
use monster::{AnchorSlot, MonsterId};

use super::World;

impl World {
    /// 右手锚点上武器的伤害，没有武器时为 0
    pub fn right_hand_damage(&self, monster: MonsterId) -> Result<u32, CapabilityViolation> {
        let holder = self.get_monster(monster)?;
        Ok(holder
            .anchor(AnchorSlot::RightHand.index())
            .and_then(|id| self.items.get(&id))
            .and_then(|item| item.as_weapon())
            .map(|weapon| weapon.damage())
            .unwrap_or(0))
    }

    /// `attacker` 攻击 `defender` 一次，只改变防守方的生命值
    pub fn hit(
        &mut self,
        attacker: MonsterId,
        defender: MonsterId,
    ) -> Result<CombatResult, CapabilityViolation> {
        let weapon_damage = self.right_hand_damage(attacker)?;
        let striker = self.get_monster(attacker)?.clone();
        let rules = self.hit_rules;
        let target = self
            .monsters
            .get_mut(&defender)
            .ok_or_else(|| CapabilityViolation::UnknownMonster(defender.to_string()))?;
        Ok(Combat::hit(&striker, weapon_damage, target, &rules, &mut self.rng))
    }
}
