//! 用户服务模块 - 内存中的账户目录

use crate::error::{AppError, Result};
use crate::types::Account;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// 用户服务
///
/// 只记录账户资料，不保存任何密码或摘要。
#[derive(Debug, Default)]
pub struct UserService {
    accounts: HashMap<Uuid, Account>,
    by_email: HashMap<String, Uuid>,
}

impl UserService {
    /// 创建新的用户服务实例
    pub fn new() -> Self {
        Self::default()
    }

    /// 规范化邮箱：去除首尾空白并转小写
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }

    /// 注册账户
    pub fn register(&mut self, email: &str, full_name: &str) -> Result<Account> {
        self.register_at(email, full_name, Utc::now())
    }

    pub fn register_at(&mut self, email: &str, full_name: &str, now: DateTime<Utc>) -> Result<Account> {
        let email = Self::normalize_email(email);
        if self.by_email.contains_key(&email) {
            log::warn!("重复注册: {}", email);
            return Err(AppError::AccountExists(email));
        }

        let account = Account::new(email.clone(), full_name.trim().to_string(), now);
        self.by_email.insert(email, account.uid);
        self.accounts.insert(account.uid, account.clone());

        log::info!("创建账户 {} ({})", account.email, account.uid);
        Ok(account)
    }

    /// 通过邮箱查找账户
    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.by_email
            .get(&Self::normalize_email(email))
            .and_then(|uid| self.accounts.get(uid))
    }

    /// 通过用户ID获取账户
    pub fn get(&self, uid: &Uuid) -> Option<&Account> {
        self.accounts.get(uid)
    }

    /// 删除账户及其邮箱索引
    pub fn remove(&mut self, uid: &Uuid) -> Option<Account> {
        let account = self.accounts.remove(uid)?;
        self.by_email.remove(&account.email);
        log::info!("删除账户 {} ({})", account.email, account.uid);
        Some(account)
    }

    /// 记录密码已重置
    pub fn mark_password_rotated(&mut self, uid: &Uuid, at: DateTime<Utc>) -> Result<()> {
        let account = self
            .accounts
            .get_mut(uid)
            .ok_or_else(|| AppError::AccountNotFound(uid.to_string()))?;
        account.password_rotated_at = Some(at);
        account.password_generated = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
