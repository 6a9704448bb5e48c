//! Pyebwa 账户凭据服务
//!
//! 为家谱应用的账户开通与密码重置提供凭据：
//! - 16位、无易混淆字符的安全密码生成（密码学安全随机源 + Fisher-Yates 洗牌）
//! - 密码格式校验与不重复的批量生成
//! - 注册开户、重置令牌的签发、校验与完成

pub mod auth;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

// 重新导出常用类型
pub use auth::{PasswordService, UserService};
pub use config::{AppConfig, ConfigManager};
pub use error::{AppError, Result};
pub use types::{Account, CharClass, IssuedCredential, Password, ResetGrant, ResetTicket, SignupRequest};
pub use utils::gen_password::{
    generate_password, generate_passwords, validate, validate_password, validate_strict,
    PasswordPolicy, SecurePasswordGenerator,
};
