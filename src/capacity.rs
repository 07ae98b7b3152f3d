//! # 容量计算模块

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, HEADER_SIZE};

/// 计算 `width` x `height` 的图像最多能隐藏多少字节。
///
/// 每个像素提供 3 位 (R, G, B)，结果为 `floor(width * height * 3 / 8) - 4`。
/// 结果小于 4 时返回 0；超过 `u32::MAX` 时饱和。
pub fn max_encode_size(width: u32, height: u32) -> u32 {
    let bits = i128::from(width) * i128::from(height) * CHANNELS_PER_PIXEL as i128;
    let eval = bits / BITS_PER_BYTE as i128 - HEADER_SIZE as i128;
    if eval < HEADER_SIZE as i128 {
        return 0;
    }
    u32::try_from(eval).unwrap_or(u32::MAX)
}

/// 长度为 `message_len` 的消息 (含头部) 会写到的像素个数，即 `ceil((4 + L) * 8 / 3)`。
pub fn required_pixels(message_len: u64) -> u64 {
    let bits = (message_len + HEADER_SIZE as u64) * BITS_PER_BYTE as u64;
    bits.div_ceil(CHANNELS_PER_PIXEL as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_the_capacity_formula() {
        assert_eq!(max_encode_size(5, 5), 5);
        assert_eq!(max_encode_size(100, 100), 3746);
        assert_eq!(max_encode_size(24, 1), 5);
    }

    #[test]
    fn returns_zero_below_header_size() {
        assert_eq!(max_encode_size(0, 0), 0);
        assert_eq!(max_encode_size(1, 1), 0);
        // 21 * 3 / 8 = 7, 7 - 4 = 3 < 4
        assert_eq!(max_encode_size(21, 1), 0);
        // 22 * 3 / 8 = 8, 8 - 4 = 4
        assert_eq!(max_encode_size(22, 1), 4);
    }

    #[test]
    fn saturates_for_huge_images() {
        assert_eq!(max_encode_size(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn required_pixels_rounds_up() {
        // 32 bits of header -> 11 pixels
        assert_eq!(required_pixels(0), 11);
        // "Hi": 48 bits -> 16 pixels
        assert_eq!(required_pixels(2), 16);
        assert_eq!(required_pixels(1), 14);
    }
}
