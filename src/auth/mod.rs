//! 账户与凭据模块

pub mod password_service;
pub mod user_service;

// 重新导出主要组件
pub use password_service::PasswordService;
pub use user_service::UserService;
