// src/config.rs
use combat::HitRules;
use error::GameError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// 平衡参数（可从 TOML 文件读取，缺省字段使用默认值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub hit_roll_max: u32,
    pub strength_min: i32,
    pub strength_max: i32,
    pub capacity_multiplier: u32, // 负重 = 倍数 × |力量| 千克
    pub strength_offset: i32,
    pub damage_divisor: i32,
    pub seed: u64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            hit_roll_max: 30,
            strength_min: -15,
            strength_max: 35,
            capacity_multiplier: 12,
            strength_offset: 5,
            damage_divisor: 3,
            seed: 0x5EED,
        }
    }
}

impl GameRules {
    pub fn from_toml_str(source: &str) -> Result<Self, GameError> {
        let rules: GameRules =
            toml::from_str(source).map_err(|e| GameError::Config(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> Result<String, GameError> {
        toml::to_string(self).map_err(|e| GameError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.damage_divisor <= 0 {
            return Err(GameError::Config(format!(
                "damage_divisor must be positive, got {}",
                self.damage_divisor
            )));
        }
        if self.strength_min > self.strength_max {
            return Err(GameError::Config(format!(
                "empty strength range {}..={}",
                self.strength_min, self.strength_max
            )));
        }
        if self.hit_roll_max == 0 {
            return Err(GameError::Config("hit_roll_max must be positive".into()));
        }
        Ok(())
    }

    pub fn strength_range(&self) -> RangeInclusive<i32> {
        self.strength_min..=self.strength_max
    }

    pub fn hit_rules(&self) -> HitRules {
        HitRules {
            roll_max: self.hit_roll_max,
            strength_offset: self.strength_offset,
            damage_divisor: self.damage_divisor,
        }
    }
}
