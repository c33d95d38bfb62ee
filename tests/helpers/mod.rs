#![allow(dead_code)]

//! Builders shared by the integration tests.
//!
//! Every world is seeded, so random weapon damage and hit rolls repeat
//! between runs.

use monster_economy::{GameRules, ItemId, MonsterBlueprint, MonsterId, Weight, World};

pub fn kg(value: f64) -> Weight {
    Weight::from_f64(value).expect("valid test weight")
}

pub fn seeded_world(seed: u64) -> World {
    World::new(GameRules {
        seed,
        ..GameRules::default()
    })
}

/// A monster with a fixed strength, a 1 kg starting weapon and a light backpack
pub struct TestMonster {
    pub id: MonsterId,
    pub weapon: ItemId,
    pub backpack: ItemId,
}

pub struct MonsterBuilder {
    name: String,
    protection: u32,
    hitpoints: i64,
    strength: i32,
    damage: i64,
    anchors: usize,
    weapon_damage: u32,
    backpack_capacity: u32,
}

impl MonsterBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            protection: 13,
            hitpoints: 100,
            strength: 10,
            damage: 10,
            anchors: 3,
            weapon_damage: 5,
            backpack_capacity: 20,
        }
    }

    pub fn protection(mut self, protection: u32) -> Self {
        self.protection = protection;
        self
    }

    pub fn hitpoints(mut self, hitpoints: i64) -> Self {
        self.hitpoints = hitpoints;
        self
    }

    pub fn strength(mut self, strength: i32) -> Self {
        self.strength = strength;
        self
    }

    pub fn damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    pub fn anchors(mut self, anchors: usize) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn backpack_capacity(mut self, capacity: u32) -> Self {
        self.backpack_capacity = capacity;
        self
    }

    pub fn spawn(self, world: &mut World) -> TestMonster {
        let weapon = world.spawn_weapon_with_damage(kg(1.0), 10, self.weapon_damage);
        let backpack = world
            .spawn_backpack(kg(2.0), 20, self.backpack_capacity)
            .expect("valid backpack");
        let id = world
            .spawn_monster(
                MonsterBlueprint::new(self.name, self.protection, self.hitpoints, weapon, backpack)
                    .with_anchor_count(self.anchors)
                    .with_strength(self.strength)
                    .with_damage(self.damage),
            )
            .expect("valid monster");
        TestMonster {
            id,
            weapon,
            backpack,
        }
    }
}

pub fn assert_consistent(world: &World) {
    if let Err(problem) = world.check_invariants() {
        panic!("invariant broken: {problem}");
    }
}
