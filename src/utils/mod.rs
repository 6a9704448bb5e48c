//! 工具模块

pub mod gen_password;

// 重新导出gen_password的主要功能
pub use gen_password::{
    generate_password,
    generate_passwords,
    validate_password,
    PasswordPolicy,
    SecurePasswordGenerator,
};
