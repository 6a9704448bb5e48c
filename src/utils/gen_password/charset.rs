//! 字符集定义
//! 三个互不相交的字符类，均已剔除易混淆字符（0/O、1/l/I）

use crate::types::CharClass;

/// 大写字母（剔除 I、L、O）
pub const UPPERCASE: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ";

/// 小写字母（剔除 l）
pub const LOWERCASE: &[u8] = b"abcdefghijkmnopqrstuvwxyz";

/// 数字（剔除 0、1）
pub const DIGITS: &[u8] = b"23456789";

/// 被排除的易混淆字符
pub const AMBIGUOUS: &[u8] = b"0OI1lL";

/// 完整字母表 = 大写 + 小写 + 数字
pub const ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz23456789";

impl CharClass {
    /// 所有字符类，按生成时的种子顺序排列
    pub const ALL: [CharClass; 3] = [CharClass::Uppercase, CharClass::Lowercase, CharClass::Digit];

    /// 该字符类允许的字符
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            CharClass::Uppercase => UPPERCASE,
            CharClass::Lowercase => LOWERCASE,
            CharClass::Digit => DIGITS,
        }
    }

    /// 按 ASCII 范围归类（不考虑是否在生成字母表中）
    pub fn of(ch: char) -> Option<Self> {
        match ch {
            'A'..='Z' => Some(CharClass::Uppercase),
            'a'..='z' => Some(CharClass::Lowercase),
            '0'..='9' => Some(CharClass::Digit),
            _ => None,
        }
    }
}

/// 字符是否属于生成字母表
pub fn in_alphabet(ch: char) -> bool {
    ch.is_ascii() && ALPHABET.contains(&(ch as u8))
}
