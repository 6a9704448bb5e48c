//! 密码服务模块 - 开户发放密码与密码重置流程

use crate::auth::user_service::UserService;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::types::{IssuedCredential, Password, ResetGrant, ResetRecord, ResetTicket, SignupRequest};
use crate::utils::gen_password::{validate, SecurePasswordGenerator};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use validator::Validate;

/// 过期或已使用的重置记录保留时长（小时）
const RESET_RETENTION_HOURS: i64 = 24;

/// 密码服务
pub struct PasswordService {
    config: AppConfig,
    generator: SecurePasswordGenerator,
    /// 以令牌 SHA-256 摘要为键的重置记录
    resets: HashMap<String, ResetRecord>,
}

impl PasswordService {
    /// 创建新的密码服务实例
    pub fn new(config: AppConfig) -> Self {
        let generator = SecurePasswordGenerator::new()
            .with_attempts_per_password(config.generator.max_attempts_per_password);
        Self {
            config,
            generator,
            resets: HashMap::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 计算令牌摘要
    pub fn hash_token(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// 批量生成不重复的密码
    pub fn generate_batch(&mut self, count: usize) -> Result<HashSet<Password>> {
        self.generator.generate_many(count)
    }

    /// 注册账户并发放系统生成的密码
    pub fn provision_account(
        &mut self,
        users: &mut UserService,
        request: &SignupRequest,
    ) -> Result<IssuedCredential> {
        self.provision_account_at(users, request, Utc::now())
    }

    pub fn provision_account_at(
        &mut self,
        users: &mut UserService,
        request: &SignupRequest,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential> {
        request.validate()?;
        if request.full_name.trim().is_empty() {
            return Err(AppError::validation("姓名不能为空"));
        }

        if users.find_by_email(&request.email).is_some() {
            return Err(AppError::AccountExists(UserService::normalize_email(&request.email)));
        }

        let password = self.issue_password()?;
        let account = users.register_at(&request.email, &request.full_name, now)?;

        log::info!("✅ 账户 {} 已开通，密码已生成", account.email);
        Ok(IssuedCredential {
            account,
            password,
            login_url: self.config.login_url(),
        })
    }

    /// 申请重置密码
    ///
    /// 邮箱未注册时返回 `Ok(None)`，调用方应给出与成功时相同的响应。
    pub fn request_reset(&mut self, users: &UserService, email: &str) -> Result<Option<ResetTicket>> {
        self.request_reset_at(users, email, Utc::now())
    }

    pub fn request_reset_at(
        &mut self,
        users: &UserService,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetTicket>> {
        if email.trim().is_empty() {
            return Err(AppError::validation("邮箱不能为空"));
        }

        let account = match users.find_by_email(email) {
            Some(account) => account,
            None => {
                log::info!("重置申请的邮箱未注册，忽略");
                return Ok(None);
            }
        };

        let mut bytes = vec![0u8; self.config.reset.token_bytes];
        OsRng.fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let expires_at = now + Duration::hours(self.config.reset.token_ttl_hours);
        self.resets.insert(
            Self::hash_token(&token),
            ResetRecord {
                user_id: account.uid,
                email: account.email.clone(),
                created_at: now,
                expires_at,
                used: false,
                used_at: None,
            },
        );

        log::info!("📧 已为 {} 生成重置令牌，有效期至 {}", account.email, expires_at);
        Ok(Some(ResetTicket {
            reset_url: self.config.reset_url(&token),
            token,
            expires_at,
        }))
    }

    /// 校验重置令牌
    pub fn verify_reset(&self, token: &str) -> Result<ResetGrant> {
        self.verify_reset_at(token, Utc::now())
    }

    pub fn verify_reset_at(&self, token: &str, now: DateTime<Utc>) -> Result<ResetGrant> {
        let record = self.usable_record(token, now)?;
        Ok(ResetGrant {
            user_id: record.user_id,
            email: record.email.clone(),
        })
    }

    /// 完成重置：生成新密码并作废令牌
    pub fn complete_reset(&mut self, users: &mut UserService, token: &str) -> Result<IssuedCredential> {
        self.complete_reset_at(users, token, Utc::now())
    }

    pub fn complete_reset_at(
        &mut self,
        users: &mut UserService,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedCredential> {
        let user_id = self.usable_record(token, now)?.user_id;

        if users.get(&user_id).is_none() {
            return Err(AppError::AccountNotFound(user_id.to_string()));
        }

        let password = self.issue_password()?;
        users.mark_password_rotated(&user_id, now)?;

        if let Some(record) = self.resets.get_mut(&Self::hash_token(token)) {
            record.used = true;
            record.used_at = Some(now);
        }

        let account = users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| AppError::AccountNotFound(user_id.to_string()))?;

        log::info!("🔑 {} 的密码已重置", account.email);
        Ok(IssuedCredential {
            account,
            password,
            login_url: self.config.login_url(),
        })
    }

    /// 清理过期或已使用的重置记录，返回清理数量
    pub fn cleanup_expired_resets(&mut self) -> usize {
        self.cleanup_expired_resets_at(Utc::now())
    }

    pub fn cleanup_expired_resets_at(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.resets.len();
        let retention = Duration::hours(RESET_RETENTION_HOURS);
        self.resets.retain(|_, record| {
            let finished = record.used || record.is_expired(now);
            !(finished && record.expires_at + retention < now)
        });

        let removed = before - self.resets.len();
        if removed > 0 {
            log::debug!("清理了 {} 条重置记录", removed);
        }
        removed
    }

    /// 当前保存的重置记录数
    pub fn pending_resets(&self) -> usize {
        self.resets.len()
    }

    /// 查找可用的重置记录，依次检查：令牌为空、不存在、已过期、已使用
    fn usable_record(&self, token: &str, now: DateTime<Utc>) -> Result<&ResetRecord> {
        if token.trim().is_empty() {
            return Err(AppError::validation("重置令牌不能为空"));
        }

        let record = self
            .resets
            .get(&Self::hash_token(token))
            .ok_or(AppError::ResetTokenNotFound)?;

        if record.is_expired(now) {
            log::warn!("{} 的重置令牌已过期", record.email);
            return Err(AppError::ResetTokenExpired);
        }

        if record.used {
            log::warn!("{} 的重置令牌被重复使用", record.email);
            return Err(AppError::ResetTokenUsed);
        }

        Ok(record)
    }

    /// 生成一个新密码并确认其符合格式要求
    fn issue_password(&mut self) -> Result<Password> {
        let password = self.generator.generate();
        if !validate(password.as_str()) {
            return Err(AppError::password_generation("生成的密码未通过格式校验"));
        }
        Ok(password)
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::gen_password::validate_strict;

    fn setup() -> (PasswordService, UserService) {
        (PasswordService::default(), UserService::new())
    }

    #[test]
    fn test_provision_account() {
        let (mut service, mut users) = setup();
        let request = SignupRequest::new("Rose@Pyebwa.com", "Rose Pierre");

        let credential = service.provision_account(&mut users, &request).unwrap();

        assert_eq!(credential.account.email, "rose@pyebwa.com");
        assert!(validate_strict(credential.password.as_str()));
        assert_eq!(credential.login_url, "https://rasin.pyebwa.com/login.html");
        assert!(users.find_by_email("rose@pyebwa.com").is_some());
    }

    #[test]
    fn test_provision_rejects_invalid_and_duplicate() {
        let (mut service, mut users) = setup();

        let bad_email = SignupRequest::new("rose-at-pyebwa", "Rose");
        assert!(matches!(
            service.provision_account(&mut users, &bad_email),
            Err(AppError::InvalidRequest(_))
        ));

        let blank_name = SignupRequest::new("rose@pyebwa.com", "   ");
        assert!(matches!(
            service.provision_account(&mut users, &blank_name),
            Err(AppError::Validation(_))
        ));

        let request = SignupRequest::new("rose@pyebwa.com", "Rose");
        service.provision_account(&mut users, &request).unwrap();
        assert!(matches!(
            service.provision_account(&mut users, &request),
            Err(AppError::AccountExists(_))
        ));
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_reset_unknown_email_is_silent() {
        let (mut service, users) = setup();
        assert!(service.request_reset(&users, "ghost@pyebwa.com").unwrap().is_none());
        assert_eq!(service.pending_resets(), 0);
        assert!(service.request_reset(&users, "  ").is_err());
    }

    #[test]
    fn test_reset_lifecycle() {
        let (mut service, mut users) = setup();
        let account = users.register("luc@pyebwa.com", "Luc").unwrap();
        let now = Utc::now();

        let ticket = service
            .request_reset_at(&users, "LUC@pyebwa.com", now)
            .unwrap()
            .unwrap();

        assert_eq!(ticket.token.len(), 64);
        assert!(ticket.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(ticket.expires_at, now + Duration::hours(2));
        assert!(ticket.reset_url.ends_with(&format!("reset-password.html?token={}", ticket.token)));

        let grant = service.verify_reset_at(&ticket.token, now).unwrap();
        assert_eq!(grant.user_id, account.uid);
        assert_eq!(grant.email, "luc@pyebwa.com");

        let later = now + Duration::minutes(30);
        let credential = service.complete_reset_at(&mut users, &ticket.token, later).unwrap();
        assert!(validate_strict(credential.password.as_str()));
        assert_eq!(credential.account.password_rotated_at, Some(later));

        // 令牌只能使用一次
        assert!(matches!(
            service.verify_reset_at(&ticket.token, later),
            Err(AppError::ResetTokenUsed)
        ));
        assert!(matches!(
            service.complete_reset_at(&mut users, &ticket.token, later),
            Err(AppError::ResetTokenUsed)
        ));
    }

    #[test]
    fn test_reset_token_errors() {
        let (mut service, mut users) = setup();
        users.register("anne@pyebwa.com", "Anne").unwrap();
        let now = Utc::now();

        let ticket = service.request_reset_at(&users, "anne@pyebwa.com", now).unwrap().unwrap();

        assert!(matches!(service.verify_reset_at("", now), Err(AppError::Validation(_))));
        assert!(matches!(
            service.verify_reset_at("deadbeef", now),
            Err(AppError::ResetTokenNotFound)
        ));

        let expired = now + Duration::hours(2) + Duration::seconds(1);
        let err = service.complete_reset_at(&mut users, &ticket.token, expired).unwrap_err();
        assert!(matches!(err, AppError::ResetTokenExpired));
        assert!(err.is_reset_token_error());
    }

    #[test]
    fn test_tokens_stored_as_digest() {
        let (mut service, mut users) = setup();
        users.register("jo@pyebwa.com", "Jo").unwrap();

        let ticket = service.request_reset(&users, "jo@pyebwa.com").unwrap().unwrap();

        assert!(!service.resets.contains_key(&ticket.token));
        assert!(service.resets.contains_key(&PasswordService::hash_token(&ticket.token)));
        assert_eq!(
            PasswordService::hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_complete_reset_for_removed_account() {
        let (mut service, mut users) = setup();
        let account = users.register("gone@pyebwa.com", "Gone").unwrap();
        let ticket = service.request_reset(&users, "gone@pyebwa.com").unwrap().unwrap();

        users.remove(&account.uid);
        assert!(matches!(
            service.complete_reset(&mut users, &ticket.token),
            Err(AppError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_cleanup_expired_resets() {
        let (mut service, mut users) = setup();
        users.register("a@pyebwa.com", "A").unwrap();
        users.register("b@pyebwa.com", "B").unwrap();
        let now = Utc::now();

        service.request_reset_at(&users, "a@pyebwa.com", now).unwrap();
        service
            .request_reset_at(&users, "b@pyebwa.com", now + Duration::hours(30))
            .unwrap();
        assert_eq!(service.pending_resets(), 2);

        // 第一条在 now+2h 过期，保留24小时后清理
        assert_eq!(service.cleanup_expired_resets_at(now + Duration::hours(10)), 0);
        assert_eq!(service.cleanup_expired_resets_at(now + Duration::hours(27)), 1);
        assert_eq!(service.pending_resets(), 1);
    }

    #[test]
    fn test_generate_batch_uses_config_budget() {
        let mut config = AppConfig::default();
        config.generator.max_attempts_per_password = 1;
        let mut service = PasswordService::new(config);

        let batch = service.generate_batch(200).unwrap();
        assert_eq!(batch.len(), 200);
    }
}
