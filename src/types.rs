//! 系统类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// 字符类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharClass {
    /// 大写字母
    Uppercase,
    /// 小写字母
    Lowercase,
    /// 数字
    Digit,
}

impl CharClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharClass::Uppercase => "uppercase",
            CharClass::Lowercase => "lowercase",
            CharClass::Digit => "digit",
        }
    }
}

/// 生成的密码
///
/// 只作为返回值交给调用方，`Debug` 输出不包含明文。
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    /// 由生成器产出的 ASCII 字节构造
    pub(crate) fn from_ascii(bytes: &[u8]) -> Self {
        Self(bytes.iter().map(|&b| char::from(b)).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password(****)")
    }
}

/// 注册请求
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// 邮箱
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    /// 姓名
    #[validate(length(min = 1, max = 100, message = "姓名长度必须在1-100之间"))]
    pub full_name: String,
}

impl SignupRequest {
    pub fn new<E: Into<String>, N: Into<String>>(email: E, full_name: N) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
        }
    }
}

/// 账户
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// 用户ID
    pub uid: Uuid,
    /// 规范化后的邮箱
    pub email: String,
    /// 姓名
    pub full_name: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 密码是否由系统生成
    pub password_generated: bool,
    /// 最近一次重置密码的时间
    pub password_rotated_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(email: String, full_name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            uid: Uuid::new_v4(),
            email,
            full_name,
            created_at,
            password_generated: true,
            password_rotated_at: None,
        }
    }
}

/// 发放给调用方的凭据
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    /// 账户
    pub account: Account,
    /// 明文密码，仅此一次返回
    pub password: Password,
    /// 登录地址
    pub login_url: String,
}

/// 密码重置记录，以令牌的 SHA-256 摘要为键保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRecord {
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

impl ResetRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// 重置申请结果，令牌明文只在这里出现
#[derive(Debug, Clone, Serialize)]
pub struct ResetTicket {
    pub token: String,
    pub reset_url: String,
    pub expires_at: DateTime<Utc>,
}

/// 令牌校验通过后返回的信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetGrant {
    pub user_id: Uuid,
    pub email: String,
}
