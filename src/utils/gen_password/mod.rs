//! 密码生成算法库
//!
//! 生成16位、高熵、无易混淆字符的字母数字密码，用于开户和重置密码：
//! - 大写、小写、数字各至少一个
//! - 所有随机抽取都来自密码学安全随机源
//! - 批量生成保证互不重复，且尝试次数有上限

pub mod charset;
pub mod policy;
pub mod secure_password;

pub use charset::{ALPHABET, AMBIGUOUS, DIGITS, LOWERCASE, UPPERCASE};
pub use policy::PasswordPolicy;
pub use secure_password::{validate, validate_strict, SecurePasswordGenerator};

use crate::error::Result;
use crate::types::Password;
use std::collections::HashSet;

/// 便捷函数：生成一个密码
pub fn generate_password() -> Password {
    SecurePasswordGenerator::new().generate()
}

/// 便捷函数：生成 `count` 个互不相同的密码
pub fn generate_passwords(count: usize) -> Result<HashSet<Password>> {
    SecurePasswordGenerator::new().generate_many(count)
}

/// 便捷函数：校验密码格式
pub fn validate_password(candidate: &str) -> bool {
    validate(candidate)
}
