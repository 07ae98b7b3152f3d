/// 长度头部占用的字节数。
/// 消息长度以 `u32` 大端序写入，共 4 字节 (32 bits)。
pub const HEADER_SIZE: usize = 4;

/// 长度头部占用的位数。
pub const HEADER_BITS: usize = HEADER_SIZE * BITS_PER_BYTE;

/// 每个字节的位数。
pub const BITS_PER_BYTE: usize = 8;

/// 每个像素可用于隐写的颜色通道数 (R, G, B)。
/// Alpha 通道永远不会被修改。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 隐写结果默认文件名的前缀，例如 `doctored_cat.png`。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 恢复文本默认文件名的前缀，例如 `recovered_doctored_cat.txt`。
pub const RECOVERED_PREFIX: &str = "recovered_";
