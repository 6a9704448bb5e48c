//! 安全密码生成算法
//!
//! 生成16位字母数字密码：
//! 1. 从大写、小写、数字三类中各抽取一个字符，保证字符类覆盖
//! 2. 剩余13个字符从完整字母表中均匀抽取
//! 3. 用 Fisher-Yates 洗牌打乱顺序，避免保证字符固定在前三位
//!
//! 所有随机抽取都来自密码学安全的随机源（`R: Rng + CryptoRng`），默认为操作系统熵源 `OsRng`。

use super::charset::{in_alphabet, ALPHABET};
use super::policy::PasswordPolicy;
use crate::error::{AppError, Result};
use crate::types::{CharClass, Password};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng};
use std::collections::HashSet;

/// 安全密码生成器
///
/// 无共享状态，调用方按需创建即可。
pub struct SecurePasswordGenerator<R = OsRng> {
    rng: R,
    attempts_per_password: u32,
}

impl SecurePasswordGenerator<OsRng> {
    /// 创建使用操作系统熵源的生成器
    pub fn new() -> Self {
        Self::with_rng(OsRng)
    }
}

impl Default for SecurePasswordGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> SecurePasswordGenerator<R>
where
    R: Rng + CryptoRng,
{
    /// 使用指定的密码学安全随机源创建生成器
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            attempts_per_password: PasswordPolicy::DEFAULT_ATTEMPTS_PER_PASSWORD,
        }
    }

    /// 设置批量生成时每个密码允许的尝试次数（最少为1）
    pub fn with_attempts_per_password(mut self, attempts: u32) -> Self {
        self.attempts_per_password = attempts.max(1);
        self
    }

    /// 生成一个16位密码
    pub fn generate(&mut self) -> Password {
        let mut chars = Vec::with_capacity(PasswordPolicy::LENGTH);

        for class in CharClass::ALL {
            let ch = self.pick(class.symbols());
            chars.push(ch);
        }

        while chars.len() < PasswordPolicy::LENGTH {
            let ch = self.pick(ALPHABET);
            chars.push(ch);
        }

        self.shuffle(&mut chars);
        Password::from_ascii(&chars)
    }

    /// 生成 `count` 个互不相同的密码
    ///
    /// 尝试次数上限为 `count * attempts_per_password`，超出时返回
    /// [`AppError::InfeasibleCount`]；`count` 超过单批上限或密钥空间时直接失败。
    pub fn generate_many(&mut self, count: usize) -> Result<HashSet<Password>> {
        if count > PasswordPolicy::MAX_BATCH || count as u128 > PasswordPolicy::keyspace() {
            log::warn!("批量生成数量 {} 超过上限 {}", count, PasswordPolicy::MAX_BATCH);
            return Err(AppError::InfeasibleCount {
                requested: count,
                attempts: 0,
                produced: 0,
            });
        }

        let budget = PasswordPolicy::attempt_budget(count, self.attempts_per_password);
        let mut passwords = HashSet::with_capacity(count.min(PasswordPolicy::MAX_PREALLOC));
        let mut attempts: u64 = 0;

        while passwords.len() < count {
            if attempts >= budget {
                log::warn!(
                    "批量生成在 {} 次尝试后放弃，已生成 {}/{} 个",
                    attempts,
                    passwords.len(),
                    count
                );
                return Err(AppError::InfeasibleCount {
                    requested: count,
                    attempts,
                    produced: passwords.len(),
                });
            }
            attempts += 1;
            let password = self.generate();
            passwords.insert(password);
        }

        log::debug!("批量生成 {} 个密码，共尝试 {} 次", count, attempts);
        Ok(passwords)
    }

    /// 从给定字符集中均匀抽取一个字符
    fn pick(&mut self, symbols: &[u8]) -> u8 {
        symbols[self.rng.gen_range(0..symbols.len())]
    }

    /// Fisher-Yates 洗牌
    fn shuffle(&mut self, items: &mut [u8]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            items.swap(i, j);
        }
    }
}

/// 校验密码格式：长度16、仅含 ASCII 字母数字、大写/小写/数字至少各一个
///
/// 注意：不拒绝生成字母表之外的易混淆字符（如 `0`、`1`），需要时使用 [`validate_strict`]。
pub fn validate(candidate: &str) -> bool {
    if candidate.len() != PasswordPolicy::LENGTH {
        return false;
    }

    if !candidate.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    CharClass::ALL
        .iter()
        .all(|class| candidate.chars().any(|c| CharClass::of(c) == Some(*class)))
}

/// 严格校验：在 [`validate`] 的基础上要求每个字符都属于生成字母表
pub fn validate_strict(candidate: &str) -> bool {
    validate(candidate) && candidate.chars().all(in_alphabet)
}
