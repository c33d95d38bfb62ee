//! Monster anchors and the item/holder relation.

mod helpers;

use helpers::{MonsterBuilder, assert_consistent, kg, seeded_world};
use monster_economy::{CapabilityViolation, Holder, ItemId, World};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn attaching_a_held_item_elsewhere_fails() {
    let mut world = seeded_world(1);
    let first = MonsterBuilder::new("First").spawn(&mut world);
    let second = MonsterBuilder::new("Second").spawn(&mut world);

    assert_eq!(
        world.attach_to_monster(first.weapon, second.id, None),
        Err(CapabilityViolation::AlreadyHeld)
    );
    assert_eq!(
        world.direct_holder(first.weapon),
        Some(Holder::Monster {
            monster: first.id,
            anchor: 0
        })
    );
    assert_eq!(world.anchors(second.id).unwrap()[1], None);
    assert_consistent(&world);
}

#[test]
fn detach_requires_a_monster_holder() {
    let mut world = seeded_world(2);
    let orc = MonsterBuilder::new("Orc").spawn(&mut world);
    let dagger = world.spawn_weapon(kg(0.5), 3);
    world.add_to_container(dagger, orc.backpack).unwrap();

    assert_eq!(
        world.detach_from_holder(dagger),
        Err(CapabilityViolation::NotHeldByMonster)
    );
    world.detach_from_holder(orc.weapon).unwrap();
    assert_eq!(world.direct_holder(orc.weapon), None);
    assert_eq!(world.anchors(orc.id).unwrap()[0], None);
}

#[test]
fn transfer_between_monsters_checks_capacity() {
    let mut world = seeded_world(3);
    let strong = MonsterBuilder::new("Strong").strength(10).anchors(4).spawn(&mut world);
    let weak = MonsterBuilder::new("Weak").strength(1).spawn(&mut world);
    let hammer = world.spawn_weapon(kg(10.0), 50);
    world.attach_to_monster(hammer, strong.id, Some(1)).unwrap();

    assert!(matches!(
        world.transfer_to_monster(hammer, weak.id, None),
        Err(CapabilityViolation::CapacityExceeded { .. })
    ));
    assert_eq!(world.find_root_holder(hammer), Some(strong.id));

    world.detach_from_holder(weak.weapon).unwrap();
    let light = world.spawn_weapon(kg(2.0), 5);
    world.attach_to_monster(light, strong.id, None).unwrap();
    assert_eq!(world.transfer_to_monster(light, weak.id, None), Ok(0));
    assert_eq!(world.find_root_holder(light), Some(weak.id));
    assert_consistent(&world);
}

#[test]
fn slot_errors_are_reported() {
    let mut world = seeded_world(4);
    let orc = MonsterBuilder::new("Orc").spawn(&mut world);
    let a = world.spawn_weapon(kg(1.0), 0);
    let b = world.spawn_weapon(kg(1.0), 0);

    assert_eq!(
        world.attach_to_monster(a, orc.id, Some(0)),
        Err(CapabilityViolation::SlotOccupied(0))
    );
    assert_eq!(
        world.attach_to_monster(a, orc.id, Some(7)),
        Err(CapabilityViolation::AnchorOutOfRange { index: 7, len: 3 })
    );
    assert_eq!(world.attach_at(orc.id, a, None), Ok(1));
    assert_eq!(
        world.attach_to_monster(b, orc.id, None),
        Err(CapabilityViolation::NoFreeAnchor)
    );
}

#[test]
fn replacing_a_weapon_destroys_it() {
    let mut world = seeded_world(5);
    let orc = MonsterBuilder::new("Orc").spawn(&mut world);
    let new_sword = world.spawn_weapon_with_damage(kg(1.5), 40, 12);

    world.replace_at(orc.id, 0, new_sword).unwrap();

    let old = world.item(orc.weapon).unwrap();
    assert!(old.is_destroyed());
    assert_eq!(world.direct_holder(orc.weapon), None);
    assert_eq!(world.anchors(orc.id).unwrap()[0], Some(new_sword));
    assert_consistent(&world);
}

#[test]
fn replacing_a_backpack_only_drops_it() {
    let mut world = seeded_world(6);
    let orc = MonsterBuilder::new("Orc").spawn(&mut world);
    let rucksack = world.spawn_backpack(kg(2.0), 20, 20).unwrap();
    let dagger = world.spawn_weapon(kg(1.0), 30);
    world.add_to_container(dagger, rucksack).unwrap();

    world.replace_at(orc.id, 2, rucksack).unwrap();

    assert_eq!(world.direct_holder(orc.backpack), None);
    assert!(!world.item(orc.backpack).unwrap().is_destroyed());
    assert_eq!(world.find_root_holder(dagger), Some(orc.id));
    assert_consistent(&world);
}

#[test]
fn replacement_checks_net_weight_and_bounds() {
    let mut world = seeded_world(7);
    // 上限 12 kg，当前 3 kg
    let imp = MonsterBuilder::new("Imp").strength(1).spawn(&mut world);
    let boulder = world.spawn_weapon(kg(11.0), 0);
    let rock = world.spawn_weapon(kg(10.0), 0);

    assert!(matches!(
        world.replace_at(imp.id, 0, boulder),
        Err(CapabilityViolation::CapacityExceeded { .. })
    ));
    assert!(!world.item(imp.weapon).unwrap().is_destroyed());
    assert_eq!(
        world.replace_at(imp.id, 3, rock),
        Err(CapabilityViolation::AnchorOutOfRange { index: 3, len: 3 })
    );
    // 3 - 1 + 10 = 12
    world.replace_at(imp.id, 0, rock).unwrap();
    assert_eq!(world.monster_total_weight(imp.id).unwrap(), kg(12.0));
}

#[test]
fn destroyed_weapons_never_find_a_holder() {
    let mut world = seeded_world(8);
    let titan = MonsterBuilder::new("Titan").strength(35).anchors(5).spawn(&mut world);
    let bag = world.spawn_backpack(kg(0.1), 0, 1000).unwrap();
    world.destroy_weapon(titan.weapon).unwrap();

    assert_eq!(
        world.attach_to_monster(titan.weapon, titan.id, None),
        Err(CapabilityViolation::DestroyedWeapon)
    );
    assert_eq!(
        world.add_to_container(titan.weapon, bag),
        Err(CapabilityViolation::DestroyedWeapon)
    );
    let spare = world.spawn_weapon(kg(1.0), 0);
    world.attach_to_monster(spare, titan.id, None).unwrap();
    assert_eq!(
        world.replace_at(titan.id, 0, titan.weapon),
        Err(CapabilityViolation::DestroyedWeapon)
    );
}

#[test]
fn root_holder_walks_nested_backpacks() {
    let mut world = seeded_world(9);
    let orc = MonsterBuilder::new("Orc").spawn(&mut world);
    let pouch = world.spawn_backpack(kg(0.5), 0, 10).unwrap();
    let coin_purse = world.spawn_purse(kg(0.2), 0, 10, 3).unwrap();
    world.add_to_container(coin_purse, pouch).unwrap();
    assert_eq!(world.find_root_holder(coin_purse), None);

    world.add_to_container(pouch, orc.backpack).unwrap();
    assert_eq!(world.find_root_holder(coin_purse), Some(orc.id));
    assert_eq!(world.direct_holder(coin_purse), Some(Holder::Backpack(pouch)));
    assert_eq!(
        world.monster_total_value(orc.id).unwrap(),
        10 + 20 + 3
    );
}

#[derive(Debug, Clone)]
enum Op {
    Attach(usize, usize, Option<usize>),
    Detach(usize),
    Transfer(usize, usize),
    Add(usize, usize),
    Remove(usize),
    Replace(usize, usize, usize),
    Destroy(usize),
    Deposit(usize, u32),
    Withdraw(usize, u32),
    Bulk(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..12usize, 0..2usize, proptest::option::of(0..4usize))
            .prop_map(|(i, m, s)| Op::Attach(i, m, s)),
        (0..12usize).prop_map(Op::Detach),
        (0..12usize, 0..2usize).prop_map(|(i, m)| Op::Transfer(i, m)),
        (0..12usize, 0..3usize).prop_map(|(i, b)| Op::Add(i, b)),
        (0..12usize).prop_map(Op::Remove),
        (0..2usize, 0..4usize, 0..12usize).prop_map(|(m, a, i)| Op::Replace(m, a, i)),
        (0..12usize).prop_map(Op::Destroy),
        (0..3usize, 0..40u32).prop_map(|(p, n)| Op::Deposit(p, n)),
        (0..3usize, 0..40u32).prop_map(|(p, n)| Op::Withdraw(p, n)),
        (0..3usize, 0..3usize).prop_map(|(a, b)| Op::Bulk(a, b)),
    ]
}

struct Fixture {
    world: World,
    monsters: Vec<monster_economy::MonsterId>,
    items: Vec<ItemId>,
    backpacks: Vec<ItemId>,
    purses: Vec<ItemId>,
}

fn fixture(seed: u64) -> Fixture {
    let mut world = seeded_world(seed);
    let monsters = vec![
        MonsterBuilder::new("Left").strength(2).anchors(4).spawn(&mut world).id,
        MonsterBuilder::new("Right").strength(3).anchors(4).spawn(&mut world).id,
    ];
    let mut items = Vec::new();
    for tenths in [5, 15, 30, 60] {
        items.push(world.spawn_weapon(kg(tenths as f64 / 10.0), 1));
    }
    let backpacks: Vec<ItemId> = [(0.5, 4), (1.0, 8), (1.5, 15)]
        .into_iter()
        .map(|(w, cap)| world.spawn_backpack(kg(w), 2, cap).unwrap())
        .collect();
    let purses: Vec<ItemId> = [(0.2, 20), (0.4, 50), (0.1, 10)]
        .into_iter()
        .map(|(w, cap)| world.spawn_purse(kg(w), 3, cap, cap / 2).unwrap())
        .collect();
    items.extend(&backpacks);
    items.extend(&purses);
    items.extend(world.anchors(monsters[0]).unwrap().iter().flatten().take(2));
    Fixture {
        world,
        monsters,
        items,
        backpacks,
        purses,
    }
}

fn apply(f: &mut Fixture, op: &Op) -> Result<(), CapabilityViolation> {
    let world = &mut f.world;
    match *op {
        Op::Attach(i, m, slot) => world.attach_to_monster(f.items[i], f.monsters[m], slot).map(drop),
        Op::Detach(i) => world.detach_from_holder(f.items[i]),
        Op::Transfer(i, m) => world.transfer_to_monster(f.items[i], f.monsters[m], None).map(drop),
        Op::Add(i, b) => world.add_to_container(f.items[i], f.backpacks[b]),
        Op::Remove(i) => world.remove_from_container(f.items[i]),
        Op::Replace(m, a, i) => world.replace_at(f.monsters[m], a, f.items[i]),
        Op::Destroy(i) => world.destroy_weapon(f.items[i]),
        Op::Deposit(p, n) => {
            let purse = f.purses[p];
            // 向破裂的钱袋存钱违反调用约定
            if world.item(purse).is_some_and(|i| i.is_torn_purse()) {
                return Ok(());
            }
            world.deposit(purse, n).map(drop)
        }
        Op::Withdraw(p, n) => {
            let purse = f.purses[p];
            let content = world
                .item(purse)
                .and_then(|i| i.as_purse())
                .map(|p| p.content())
                .unwrap_or(0);
            world.withdraw(purse, n.min(content))
        }
        Op::Bulk(a, b) => world.bulk_transfer(f.backpacks[a], f.backpacks[b]).map(drop),
    }
}

type Snapshot = (Vec<Option<Holder>>, Vec<monster_economy::Weight>);

fn snapshot(f: &Fixture) -> Snapshot {
    (
        f.items.iter().map(|&i| f.world.direct_holder(i)).collect(),
        f.items
            .iter()
            .map(|&i| f.world.total_weight(i).unwrap())
            .collect(),
    )
}

proptest! {
    #[test]
    fn random_operations_preserve_invariants(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op_strategy(), 1..60),
    ) {
        let mut f = fixture(seed);
        prop_assert!(f.world.check_invariants().is_ok());
        for op in &ops {
            let _ = apply(&mut f, op);
            if let Err(problem) = f.world.check_invariants() {
                prop_assert!(false, "after {:?}: {}", op, problem);
            }
        }
    }

    #[test]
    fn failed_operations_change_nothing(
        ops in proptest::collection::vec(op_strategy(), 1..40),
    ) {
        let mut f = fixture(7);
        for op in &ops {
            let before = snapshot(&f);
            let failed = apply(&mut f, op).is_err();
            // 整包转移失败时已移动的物品不会退回
            if failed && !matches!(op, Op::Bulk(..)) {
                prop_assert_eq!(before, snapshot(&f));
            }
        }
    }
}
