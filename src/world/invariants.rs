// src/world/invariants.rs
use super::{Holder, World};

impl World {
    /// 检查整个持有关系图，返回发现的第一个问题
    pub fn check_invariants(&self) -> Result<(), String> {
        // 持有关系与两侧索引一致
        for (&item, &holder) in &self.holders {
            if !self.items.contains_key(&item) {
                return Err(format!("{item} has a holder but is not registered"));
            }
            match holder {
                Holder::Monster { monster, anchor } => {
                    let m = self
                        .monsters
                        .get(&monster)
                        .ok_or_else(|| format!("{item} held by missing {monster}"))?;
                    if m.anchor(anchor) != Some(item) {
                        return Err(format!("{monster} anchor {anchor} does not hold {item}"));
                    }
                }
                Holder::Backpack(backpack) => {
                    let bag = self
                        .items
                        .get(&backpack)
                        .and_then(|i| i.as_backpack())
                        .ok_or_else(|| format!("{item} held by missing backpack {backpack}"))?;
                    if !bag.contains(item) {
                        return Err(format!("{backpack} does not list {item}"));
                    }
                }
            }
        }
        for (&id, monster) in &self.monsters {
            for (anchor, slot) in monster.anchors().iter().enumerate() {
                if let Some(item) = slot {
                    let expected = Holder::Monster { monster: id, anchor };
                    if self.holders.get(item) != Some(&expected) {
                        return Err(format!("{id} anchor {anchor} lists {item} one-sidedly"));
                    }
                }
            }
            let load = self.load_of(monster);
            if load > monster.carrying_capacity() {
                return Err(format!(
                    "{id} carries {load} over capacity {}",
                    monster.carrying_capacity()
                ));
            }
        }

        for (&id, item) in &self.items {
            if item.is_destroyed() && self.holders.contains_key(&id) {
                return Err(format!("destroyed {id} still has a holder"));
            }
            if let Some(purse) = item.as_purse() {
                if purse.is_torn() && (purse.content() != 0 || item.value() != 0) {
                    return Err(format!("torn {id} still holds value"));
                }
            }
            if let Some(bag) = item.as_backpack() {
                for &inner in bag.contents() {
                    if self.holders.get(&inner) != Some(&Holder::Backpack(id)) {
                        return Err(format!("{id} lists {inner} one-sidedly"));
                    }
                }
                let total = self.weight_of(id);
                if total > bag.carrying_capacity() {
                    return Err(format!(
                        "{id} weighs {total} over capacity {}",
                        bag.carrying_capacity()
                    ));
                }
                let weights: Vec<_> = bag.contents().iter().map(|&i| self.weight_of(i)).collect();
                if weights.windows(2).any(|w| w[0] > w[1]) {
                    return Err(format!("{id} contents are not sorted by weight"));
                }
            }
            let mut current = id;
            let mut steps = 0;
            while let Some(Holder::Backpack(outer)) = self.holders.get(&current) {
                steps += 1;
                if steps > self.items.len() {
                    return Err(format!("{id} sits in a holder cycle"));
                }
                current = *outer;
            }
        }
        Ok(())
    }
}
