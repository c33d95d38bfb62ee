//src/combat/src/rng.rs
use rand::{
    distr::uniform,
    {Rng, RngCore, SeedableRng},
};
use rand_pcg::Pcg32;

/// 可复现的随机数源（同一种子 + 同一调用顺序 = 同一结果）
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: Pcg32,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// 获取当前种子值
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 重置RNG状态（使用当前种子）
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
    }

    /// 使用新种子重置RNG
    pub fn reseed(&mut self, new_seed: u64) {
        self.seed = new_seed;
        self.reset();
    }

    /// 生成指定范围内的随机值
    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: uniform::SampleUniform,
        R: uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// 攻击判定骰 [0, max]
    pub fn hit_roll(&mut self, max: u32) -> u32 {
        self.random_range(0..=max)
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}
