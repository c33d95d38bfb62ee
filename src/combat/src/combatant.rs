// src/combat/src/combatant.rs
use error::HitpointsError;

/// 表示可以参加战斗的活体
pub trait Combatant {
    /// 获取名称
    fn name(&self) -> &str;

    /// 获取当前生命值
    fn hitpoints(&self) -> u32;

    /// 获取最大生命值
    fn max_hitpoints(&self) -> u32;

    /// 获取防御值（命中骰必须严格大于它）
    fn protection(&self) -> u32;

    /// 获取基础伤害
    fn damage(&self) -> u32;

    /// 获取力量（可以为负）
    fn strength(&self) -> i32;

    /// 设置生命值，超出 [0, max] 时返回错误且不修改
    fn set_hitpoints(&mut self, hitpoints: i64) -> Result<(), HitpointsError>;

    /// 生命值直接归零
    fn knock_out(&mut self);

    /// 是否存活
    fn is_alive(&self) -> bool {
        self.hitpoints() > 0
    }
}
