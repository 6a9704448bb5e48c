//! Pyebwa 密码工具 - 命令行入口

use clap::{Parser, Subcommand};
use pyebwa_credentials::{
    config::{AppConfig, ConfigManager},
    error::{AppError, Result},
    utils::gen_password::{validate, validate_strict, PasswordPolicy, ALPHABET, DIGITS, LOWERCASE, UPPERCASE},
    PasswordService,
};
use std::env;
use std::path::Path;
use std::process::ExitCode;

/// Pyebwa 安全密码工具
#[derive(Parser, Debug)]
#[command(name = "pyebwa_pwgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    /// 配置文件路径
    #[arg(short, long, global = true, env = "CONFIG_PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 生成密码
    Generate {
        /// 生成数量（互不重复）
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// 以JSON数组输出
        #[arg(long)]
        json: bool,
    },

    /// 校验密码格式
    Validate {
        /// 待校验的密码
        candidate: String,

        /// 同时拒绝生成字母表之外的字符（如 0、1）
        #[arg(long)]
        strict: bool,
    },

    /// 显示字母表和密钥空间
    Info,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// 执行子命令，返回是否成功
fn run(cli: Cli) -> Result<bool> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { count, json } => {
            let mut service = PasswordService::new(config);
            let passwords: Vec<String> = service
                .generate_batch(count)?
                .into_iter()
                .map(|p| p.into_string())
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&passwords)?);
            } else {
                for password in &passwords {
                    println!("{}", password);
                }
            }
            log::debug!("已生成 {} 个密码", passwords.len());
            Ok(true)
        }
        Commands::Validate { candidate, strict } => {
            let valid = if strict {
                validate_strict(&candidate)
            } else {
                validate(&candidate)
            };

            println!("{}", if valid { "valid" } else { "invalid" });
            Ok(valid)
        }
        Commands::Info => {
            print!("{}", alphabet_info());
            Ok(true)
        }
    }
}

/// 初始化日志记录器
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log_level))
        .format_timestamp_secs()
        .init();

    log::debug!("📝 日志级别: {}", log_level);
}

/// 加载配置；未指定路径时使用默认配置
fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => path,
        None => return Ok(AppConfig::default()),
    };

    if !Path::new(path).exists() {
        log::error!("配置文件 {} 不存在！", path);
        print_config_example();
        return Err(AppError::validation(format!("配置文件 {} 不存在", path)));
    }

    log::info!("📖 加载配置文件: {}", path);
    let manager = ConfigManager::new(path)?;
    Ok(manager.get_config().clone())
}

/// 打印配置文件示例
fn print_config_example() {
    eprintln!(
        r#"
{{
  "app_url": "https://rasin.pyebwa.com",
  "generator": {{ "max_attempts_per_password": 4 }},
  "reset": {{ "token_ttl_hours": 2, "token_bytes": 32 }}
}}

配置说明：
- app_url: 站点地址，用于拼接登录和重置链接
- generator.max_attempts_per_password: 批量生成时每个密码允许的尝试次数
- reset.token_ttl_hours: 重置令牌有效期（小时）
- reset.token_bytes: 重置令牌随机字节数（至少16）

环境变量可覆盖任意项，例如 PYEBWA_RESET__TOKEN_TTL_HOURS=1
"#
    );
}

/// 字母表信息
fn alphabet_info() -> String {
    let as_str = |bytes: &[u8]| String::from_utf8_lossy(bytes).into_owned();

    [
        format!("长度:     {}", PasswordPolicy::LENGTH),
        format!("大写({:>2}): {}", UPPERCASE.len(), as_str(UPPERCASE)),
        format!("小写({:>2}): {}", LOWERCASE.len(), as_str(LOWERCASE)),
        format!("数字({:>2}): {}", DIGITS.len(), as_str(DIGITS)),
        format!("字母表:   {} 个字符", ALPHABET.len()),
        format!(
            "密钥空间: {}^{} = {}",
            ALPHABET.len(),
            PasswordPolicy::LENGTH,
            PasswordPolicy::keyspace()
        ),
    ]
    .iter()
    .map(|line| format!("{}\n", line))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from(["pyebwa_pwgen", "generate", "-n", "5", "--json"]);
        match cli.command {
            Commands::Generate { count, json } => {
                assert_eq!(count, 5);
                assert!(json);
            }
            other => panic!("解析错误: {:?}", other),
        }
    }

    #[test]
    fn test_validate_command() -> Result<()> {
        let ok = Cli::parse_from(["pyebwa_pwgen", "validate", "Ab3dEfGhJ2mNpQrS"]);
        assert!(run(ok)?);

        let strict = Cli::parse_from(["pyebwa_pwgen", "validate", "--strict", "Ab0dEfGhJ1mNpQrS"]);
        assert!(!run(strict)?);

        let short = Cli::parse_from(["pyebwa_pwgen", "validate", "AB3"]);
        assert!(!run(short)?);
        Ok(())
    }

    #[test]
    fn test_missing_config_is_error() {
        let temp_file = NamedTempFile::new().unwrap();
        let missing = temp_file.path().to_str().unwrap().to_string() + ".missing";
        assert!(load_config(Some(&missing)).is_err());
        assert!(load_config(None).is_ok());
    }

    #[test]
    fn test_alphabet_info() {
        let info = alphabet_info();

        assert_eq!(info.lines().count(), 6);
        assert!(info.contains("长度:     16"));
        assert!(info.contains("大写(23): ABCDEFGHJKMNPQRSTUVWXYZ"));
        assert!(info.contains("数字( 8): 23456789"));
        assert!(info.contains(&format!("密钥空间: 56^16 = {}", 56u128.pow(16))));
    }
}
