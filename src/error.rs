//! 错误处理模块

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("请求参数错误: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("密码生成错误: {0}")]
    PasswordGeneration(String),

    #[error("无法生成 {requested} 个不重复的密码：尝试 {attempts} 次后仅得到 {produced} 个")]
    InfeasibleCount {
        requested: usize,
        attempts: u64,
        produced: usize,
    },

    #[error("账户已存在: {0}")]
    AccountExists(String),

    #[error("账户不存在: {0}")]
    AccountNotFound(String),

    #[error("重置令牌无效")]
    ResetTokenNotFound,

    #[error("重置令牌已过期")]
    ResetTokenExpired,

    #[error("重置令牌已被使用")]
    ResetTokenUsed,
}

impl AppError {
    /// 创建验证错误
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// 创建密码生成错误
    pub fn password_generation<T: Into<String>>(msg: T) -> Self {
        Self::PasswordGeneration(msg.into())
    }

    /// 是否为重置令牌相关错误
    pub fn is_reset_token_error(&self) -> bool {
        matches!(
            self,
            Self::ResetTokenNotFound | Self::ResetTokenExpired | Self::ResetTokenUsed
        )
    }
}

/// 应用程序Result类型
pub type Result<T> = std::result::Result<T, AppError>;
