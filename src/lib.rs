//! 怪物物品经济：武器、钱袋、背包与怪物之间的持有关系以及战斗结算。

pub mod config;
pub mod world;

pub use combat::{Combat, CombatResult, Combatant, GameRng, HitRules};
pub use config::GameRules;
pub use error::{CapabilityViolation, ConstructionError, GameError, HitpointsError, handle_error};
pub use items::{
    Backpack, DepositOutcome, IdGenerator, Item, ItemClass, ItemId, ItemKind, Purse, Weapon,
    Weight,
};
pub use monster::{AnchorSlot, Monster, MonsterId, is_prime, is_valid_name};
pub use world::{Holder, MonsterBlueprint, World};
