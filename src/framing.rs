//! # 长度帧模块
//!
//! 消息在写入图像之前会加上 4 字节大端序的长度头部。

use crate::constants::HEADER_SIZE;
use crate::error::StegoError;

/// 把 `u32` 按大端序 (最高字节在前) 拆成 4 个字节。
pub fn split_to_bytes(length: u32) -> [u8; HEADER_SIZE] {
    [
        (length >> 24) as u8,
        (length >> 16) as u8,
        (length >> 8) as u8,
        length as u8,
    ]
}

/// [`split_to_bytes`] 的逆运算。
pub fn combine_to_int(b0: u8, b1: u8, b2: u8, b3: u8) -> u32 {
    (u32::from(b0) << 24) | (u32::from(b1) << 16) | (u32::from(b2) << 8) | u32::from(b3)
}

/// 构造实际嵌入图像的字节序列：长度头部 + 消息本体。
///
/// # Errors
///
/// 消息长度超过 `u32::MAX` 字节时返回 [`StegoError::CapacityExceeded`]。
pub fn frame(message: &[u8]) -> Result<Vec<u8>, StegoError> {
    let length = u32::try_from(message.len()).map_err(|_| StegoError::CapacityExceeded {
        required: message.len() as u64 + HEADER_SIZE as u64,
        available: u64::from(u32::MAX),
    })?;

    let mut framed = Vec::with_capacity(HEADER_SIZE + message.len());
    framed.extend_from_slice(&split_to_bytes(length));
    framed.extend_from_slice(message);
    Ok(framed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_is_big_endian() {
        assert_eq!(split_to_bytes(0x0102_0304), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(split_to_bytes(2), [0, 0, 0, 2]);
    }

    #[test]
    fn combine_inverts_split() {
        for n in [0, 1, 255, 256, 0x00FF_FF00, 0xDEAD_BEEF, u32::MAX - 1, u32::MAX] {
            let [b0, b1, b2, b3] = split_to_bytes(n);
            assert_eq!(combine_to_int(b0, b1, b2, b3), n);
        }
    }

    #[test]
    fn frame_prefixes_the_length_of_0x48_0x49() {
        let framed = frame(&[0x48, 0x49]).unwrap();
        assert_eq!(framed, vec![0, 0, 0, 2, 0x48, 0x49]);
        assert_eq!(frame(&[]).unwrap(), vec![0, 0, 0, 0]);
    }
}
