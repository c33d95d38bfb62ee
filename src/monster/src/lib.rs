// src/monster/src/lib.rs
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub mod record;
pub mod name;

pub use crate::record::{
    MAX_DAMAGE, MAX_PROTECTION, MIN_ANCHORS, MIN_DAMAGE, MIN_PROTECTION, Monster, MonsterId,
    MonsterStats, is_prime,
};
pub use crate::name::is_valid_name;

/// 前三个锚点的固定用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum AnchorSlot {
    #[strum(to_string = "左手")]
    LeftHand,
    #[strum(to_string = "右手")]
    RightHand,
    #[strum(to_string = "背部")]
    Back,
}

impl AnchorSlot {
    pub fn index(self) -> usize {
        match self {
            AnchorSlot::LeftHand => 0,
            AnchorSlot::RightHand => 1,
            AnchorSlot::Back => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(AnchorSlot::LeftHand),
            1 => Some(AnchorSlot::RightHand),
            2 => Some(AnchorSlot::Back),
            _ => None,
        }
    }

    /// 用于日志的锚点标签，超出固定用途的锚点按序号显示
    pub fn label(index: usize) -> String {
        match Self::from_index(index) {
            Some(slot) => slot.to_string(),
            None => format!("锚点{index}"),
        }
    }
}
