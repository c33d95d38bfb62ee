// src/items/src/weight.rs
use error::ConstructionError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// 定点重量（千克，固定两位小数）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Weight(Decimal);

impl Weight {
    pub const ZERO: Weight = Weight(Decimal::ZERO);

    /// 单件物品重量上限（千克），远超任何可表示的负重上限
    pub const MAX_KG: f64 = 1.0e20;

    /// 从浮点数创建重量（负数、NaN、无穷大以及超过上限均无效）
    pub fn from_f64(kg: f64) -> Result<Self, ConstructionError> {
        if !kg.is_finite() || !(0.0..=Self::MAX_KG).contains(&kg) {
            return Err(ConstructionError::InvalidWeight(kg.to_string()));
        }
        // 经由最短十进制表示转换，避免二进制误差（1.9 不会变成 1.8999…）
        let decimal = Decimal::from_str(&kg.to_string())
            .map_err(|_| ConstructionError::InvalidWeight(kg.to_string()))?;
        Ok(Self::from_decimal(decimal))
    }

    /// 以百分之一千克为单位创建
    pub fn from_hundredths(hundredths: u32) -> Self {
        Self::from_decimal(Decimal::new(i64::from(hundredths), 2))
    }

    /// 整数千克
    pub fn from_kg(kg: u32) -> Self {
        Self::from_decimal(Decimal::from(kg))
    }

    fn from_decimal(value: Decimal) -> Self {
        let mut value = value.round_dp(2);
        value.rescale(2);
        Self(value)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// 按整数倍放大（用于负重上限 = 倍数 × |力量|），溢出时取最大值
    pub fn times(self, factor: u32) -> Self {
        match self.0.checked_mul(Decimal::from(factor)) {
            Some(value) => Self::from_decimal(value),
            None => Self(Decimal::MAX),
        }
    }

    /// 减法，结果不低于零
    pub fn saturating_sub(self, other: Weight) -> Self {
        if other.0 >= self.0 {
            Self::ZERO
        } else {
            Self::from_decimal(self.0 - other.0)
        }
    }
}

impl Add for Weight {
    type Output = Weight;

    /// 饱和加法：溢出时取最大值，超重检查照常拒绝
    fn add(self, rhs: Weight) -> Weight {
        match self.0.checked_add(rhs.0) {
            Some(value) => Weight::from_decimal(value),
            None => Weight(Decimal::MAX),
        }
    }
}

impl Sub for Weight {
    type Output = Weight;

    fn sub(self, rhs: Weight) -> Weight {
        self.saturating_sub(rhs)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Weight {
        iter.fold(Weight::ZERO, Add::add)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_two_decimals() {
        assert_eq!(Weight::from_f64(1.9).unwrap().to_string(), "1.90");
        assert_eq!(Weight::from_kg(2).to_string(), "2.00");
        assert_eq!(Weight::from_f64(0.125).unwrap(), Weight::from_hundredths(12));
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert!(Weight::from_f64(-0.01).is_err());
        assert!(Weight::from_f64(f64::NAN).is_err());
        assert!(Weight::from_f64(f64::INFINITY).is_err());
        assert!(Weight::from_f64(0.0).unwrap().is_zero());
    }

    #[test]
    fn arithmetic_is_exact() {
        let sum: Weight = [1.0, 1.9, 2.0, 3.0]
            .iter()
            .map(|w| Weight::from_f64(*w).unwrap())
            .sum();
        assert_eq!(sum + Weight::from_kg(2), Weight::from_hundredths(990));
        assert_eq!(Weight::from_kg(1) - Weight::from_kg(3), Weight::ZERO);
        assert_eq!(Weight::from_kg(1).times(12), Weight::from_kg(12));
    }

    #[test]
    fn huge_values_are_bounded() {
        assert!(Weight::from_f64(4.0e28).is_err());
        assert!(Weight::from_f64(Weight::MAX_KG).is_ok());
        assert_eq!(Weight::from_hundredths(u32::MAX).to_string(), "42949672.95");

        let top = Weight(Decimal::MAX);
        assert_eq!(top + Weight::from_kg(1), top);
        assert_eq!(top.times(2), top);
        let sum: Weight = [top, top, Weight::from_kg(3)].into_iter().sum();
        assert_eq!(sum, top);
    }
}
