//! # 位访问模块
//!
//! 读写单个字节中指定位置的位。位置 0 表示最高有效位，位置 7 表示最低有效位。

/// 读取 `byte` 中第 `index` 位 (0 为最高位)，返回 0 或 1。
///
/// # Panics
///
/// `index` 大于 7 时 panic。
pub fn get_bit(byte: u8, index: usize) -> u8 {
    assert!(index < 8, "bit index {index} out of range 0..8");
    (byte >> (7 - index)) & 1
}

/// 返回把 `byte` 第 `index` 位设置为 `bit` 之后的新字节，其余位不变。
///
/// `bit` 只看最低位，非 0/1 的值按 `bit & 1` 处理。
///
/// # Panics
///
/// `index` 大于 7 时 panic。
pub fn set_bit(byte: u8, index: usize, bit: u8) -> u8 {
    assert!(index < 8, "bit index {index} out of range 0..8");
    let mask = 0x80u8 >> index;
    if bit & 1 == 1 { byte | mask } else { byte & !mask }
}

pub fn get_lsb(byte: u8) -> u8 {
    byte % 2
}

/// 只替换最低有效位，其余 7 位保持不变。
pub fn set_lsb(byte: u8, bit: u8) -> u8 {
    (byte & 0xFE) | (bit & 1)
}
