//! 配置管理模块

use crate::error::{AppError, Result};
use crate::utils::gen_password::PasswordPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 环境变量前缀，如 `PYEBWA_RESET__TOKEN_TTL_HOURS=1`
pub const ENV_PREFIX: &str = "PYEBWA";

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 站点地址，用于拼接登录和重置链接
    pub app_url: String,
    /// 密码生成配置
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// 密码重置配置
    #[serde(default)]
    pub reset: ResetConfig,
}

/// 密码生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// 批量生成时每个密码允许的尝试次数
    pub max_attempts_per_password: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_password: PasswordPolicy::DEFAULT_ATTEMPTS_PER_PASSWORD,
        }
    }
}

/// 密码重置配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    /// 令牌有效期（小时）
    pub token_ttl_hours: i64,
    /// 令牌随机字节数
    pub token_bytes: usize,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: 2,
            token_bytes: 32,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置，并应用环境变量覆盖
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Json))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.app_url.trim().is_empty() {
            return Err(AppError::validation("站点地址不能为空"));
        }

        if self.generator.max_attempts_per_password == 0 {
            return Err(AppError::validation("每个密码的尝试次数至少为1"));
        }

        if self.reset.token_ttl_hours <= 0 {
            return Err(AppError::validation("重置令牌有效期必须大于0小时"));
        }

        if self.reset.token_bytes < 16 {
            return Err(AppError::validation("重置令牌至少需要16字节"));
        }

        Ok(())
    }

    /// 登录页地址
    pub fn login_url(&self) -> String {
        format!("{}/login.html", self.app_url.trim_end_matches('/'))
    }

    /// 重置密码页地址
    pub fn reset_url(&self, token: &str) -> String {
        format!(
            "{}/app/reset-password.html?token={}",
            self.app_url.trim_end_matches('/'),
            token
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_url: "https://rasin.pyebwa.com".to_string(),
            generator: GeneratorConfig::default(),
            reset: ResetConfig::default(),
        }
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: String,
}

impl ConfigManager {
    /// 创建配置管理器，文件不存在时写入默认配置
    pub fn new(config_path: &str) -> Result<Self> {
        let config = if Path::new(config_path).exists() {
            AppConfig::from_file(config_path)?
        } else {
            log::warn!("配置文件 {} 不存在，创建默认配置", config_path);
            let default_config = AppConfig::default();

            if let Some(parent) = Path::new(config_path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            default_config.save_to_file(config_path)?;
            default_config
        };

        Ok(Self {
            config,
            config_path: config_path.to_string(),
        })
    }

    /// 获取配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 更新配置
    pub fn update_config<F>(&mut self, updater: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut updated = self.config.clone();
        updater(&mut updated);
        updated.validate()?;
        updated.save_to_file(&self.config_path)?;
        self.config = updated;
        Ok(())
    }

    /// 重新加载配置
    pub fn reload(&mut self) -> Result<()> {
        self.config = AppConfig::from_file(&self.config_path)?;
        Ok(())
    }
}
