//! 游戏错误处理模块
//!
//! 处理物品归属图与战斗过程中可能出现的各种错误：构造校验失败、能力违规、
//! 生命值越界以及配置加载错误。

use rust_decimal::Decimal;
use thiserror::Error;

/// 构造对象时的校验错误（调用方必须提供修正后的参数）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("无效的重量: {0}")]
    InvalidWeight(String),
    #[error("无效的容量: {0}")]
    InvalidCapacity(u32),
    #[error("无效的名字: {0:?}")]
    InvalidName(String),
    #[error("无效的初始生命值: {0}")]
    InvalidHitpoints(i64),
    #[error("锚点数量不足: {0} (至少需要3个)")]
    InvalidAnchorCount(usize),
}

/// 生命值设置越界（携带被拒绝的值）
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("生命值 {value} 不在 [0, {max}] 范围内")]
pub struct HitpointsError {
    pub value: i64,
    pub max: u32,
}

/// 归属操作的前置条件未满足（不会留下任何部分修改）
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CapabilityViolation {
    #[error("物品已有持有者")]
    AlreadyHeld,
    #[error("物品不是由怪物直接持有")]
    NotHeldByMonster,
    #[error("物品不在任何背包中")]
    NotInContainer,
    #[error("物品已在背包中，需要先取出")]
    HeldByContainer,
    #[error("武器已被摧毁")]
    DestroyedWeapon,
    #[error("锚点 {0} 已被占用")]
    SlotOccupied(usize),
    #[error("没有空闲锚点")]
    NoFreeAnchor,
    #[error("锚点索引 {index} 越界 (共 {len} 个)")]
    AnchorOutOfRange { index: usize, len: usize },
    #[error("超出负重: {load} > {capacity}")]
    CapacityExceeded { load: Decimal, capacity: Decimal },
    #[error("背包不能装入自身")]
    SelfContainment,
    #[error("背包不能装入其内部的物品中")]
    ContainmentCycle,
    #[error("物品类型不符: 需要{expected}")]
    WrongVariant { expected: &'static str },
    #[error("未知物品: {0}")]
    UnknownItem(String),
    #[error("未知怪物: {0}")]
    UnknownMonster(String),
    #[error("背包是空的")]
    EmptyContainer,
    #[error("源背包与目标背包相同")]
    SameContainer,
}

/// 游戏运行过程中可能出现的错误类型
#[derive(Debug, Error)]
pub enum GameError {
    /// 构造校验错误
    #[error("Construction error: {0}")]
    Construction(#[from] ConstructionError),

    /// 能力违规
    #[error("Capability violation: {0}")]
    Capability(#[from] CapabilityViolation),

    /// 生命值越界
    #[error("Hitpoints error: {0}")]
    Hitpoints(#[from] HitpointsError),

    /// 规则配置错误
    #[error("Config error: {0}")]
    Config(String),

    /// IO操作错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 处理游戏错误并转换为用户友好的消息
pub fn handle_error(error: &GameError) -> String {
    match error {
        GameError::Capability(CapabilityViolation::CapacityExceeded { load, capacity }) => {
            format!("太重了: 需要承载 {}，上限 {}", load, capacity)
        }
        GameError::Capability(CapabilityViolation::DestroyedWeapon) => {
            "这把武器已经毁坏，无法再使用".to_string()
        }
        GameError::Construction(e) => format!("无法创建: {}", e),
        GameError::Config(msg) => format!("规则文件无效: {}", msg),
        GameError::Io(e) => match e.kind() {
            std::io::ErrorKind::NotFound => "规则文件不存在".to_string(),
            std::io::ErrorKind::PermissionDenied => "没有权限读取规则文件".to_string(),
            _ => format!("IO错误: {}", e),
        },
        _ => error.to_string(),
    }
}
