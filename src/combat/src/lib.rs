// src/combat/src/lib.rs
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

pub mod combatant;
pub mod rng;

pub use crate::combatant::Combatant;
pub use crate::rng::GameRng;

/// Handles combat interactions between entities
pub struct Combat;

/// Tunable numbers used by a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRules {
    pub roll_max: u32,        // hit roll is drawn from [0, roll_max]
    pub strength_offset: i32, // subtracted from the attacker's strength
    pub damage_divisor: i32,  // truncating division of the damage sum
}

impl Default for HitRules {
    fn default() -> Self {
        Self {
            roll_max: 30,
            strength_offset: 5,
            damage_divisor: 3,
        }
    }
}

impl Combat {
    /// Resolve one hit from `attacker` on `defender`.
    ///
    /// A dead attacker does nothing. The roll is capped by the attacker's own
    /// hitpoints and must exceed the defender's protection to land. Damage is
    /// `(damage + weapon_damage + (strength - offset)) / divisor` and may be
    /// negative. A new hitpoints value outside `[0, max]` knocks the defender
    /// out; one inside the range but above the current value is ignored.
    pub fn hit<A, D>(
        attacker: &A,
        weapon_damage: u32,
        defender: &mut D,
        rules: &HitRules,
        rng: &mut GameRng,
    ) -> CombatResult
    where
        A: Combatant + ?Sized,
        D: Combatant + ?Sized,
    {
        let mut result = CombatResult::new();

        if !attacker.is_alive() {
            result.log(format!("{} is dead and cannot attack", attacker.name()));
            return result;
        }
        result.acted = true;

        let roll = rng.hit_roll(rules.roll_max).min(attacker.hitpoints());
        result.roll = roll;
        trace!(
            attacker = attacker.name(),
            defender = defender.name(),
            roll,
            protection = defender.protection(),
            "hit roll"
        );

        if roll <= defender.protection() {
            result.log(format!("{} attack missed.", attacker.name()));
            return result;
        }

        let damage = Self::calculate_damage(attacker, weapon_damage, rules);
        let current = defender.hitpoints() as i64;
        let target = current - damage;
        let max = defender.max_hitpoints() as i64;
        if !(0..=max).contains(&target) {
            defender.knock_out();
        } else if target < current && defender.set_hitpoints(target).is_err() {
            defender.knock_out();
        }

        result.hit = true;
        result.damage = damage;
        result.log(format!("{} hits for {} damage", attacker.name(), damage));

        if !defender.is_alive() {
            info!(
                attacker = attacker.name(),
                defender = defender.name(),
                "monster slain"
            );
            result.log(format!("{} defeated {}!", attacker.name(), defender.name()));
            result.defeated = true;
        }

        result
    }

    /// Damage of a landed hit (truncating division, sign kept)
    pub fn calculate_damage<A: Combatant + ?Sized>(
        attacker: &A,
        weapon_damage: u32,
        rules: &HitRules,
    ) -> i64 {
        let divisor = rules.damage_divisor.max(1) as i64;
        let sum = attacker.damage() as i64
            + weapon_damage as i64
            + (attacker.strength() as i64 - rules.strength_offset as i64);
        sum / divisor
    }
}

/// Combat result with detailed logs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatResult {
    pub logs: Vec<String>, // Combat messages
    pub acted: bool,       // Whether the attacker was alive to swing
    pub roll: u32,         // Hit roll after capping by attacker hitpoints
    pub hit: bool,         // Whether the roll beat the protection
    pub damage: i64,       // Formula damage of a landed hit
    pub defeated: bool,    // Whether the defender died from this hit
}

impl CombatResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, message: String) {
        self.logs.push(message);
    }

    pub fn combine(&mut self, other: CombatResult) {
        self.logs.extend(other.logs);
        self.acted = self.acted || other.acted;
        self.hit = self.hit || other.hit;
        self.damage += other.damage;
        self.defeated = self.defeated || other.defeated;
    }
}
