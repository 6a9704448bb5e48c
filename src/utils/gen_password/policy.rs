//! 密码策略常量

use super::charset::ALPHABET;

/// 密码生成策略
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// 密码固定长度
    pub const LENGTH: usize = 16;

    /// 保证覆盖的字符类数量（大写、小写、数字各一个）
    pub const SEED_COUNT: usize = 3;

    /// 批量生成时每个密码默认允许的尝试次数
    pub const DEFAULT_ATTEMPTS_PER_PASSWORD: u32 = 4;

    /// 单次批量生成的数量上限
    pub const MAX_BATCH: usize = 1_000_000;

    /// 批量生成时结果集合的最大预分配容量
    pub const MAX_PREALLOC: usize = 4096;

    /// 密钥空间大小：字母表长度的 LENGTH 次方
    pub fn keyspace() -> u128 {
        (ALPHABET.len() as u128).pow(Self::LENGTH as u32)
    }

    /// 批量生成的尝试上限，溢出时饱和
    pub fn attempt_budget(count: usize, attempts_per_password: u32) -> u64 {
        (count as u64).saturating_mul(attempts_per_password as u64)
    }
}
