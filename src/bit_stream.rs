//! # 位流模块
//!
//! [`BitStream`] 按顺序逐位产出字节序列的内容 (每个字节最高位在前)，
//! 由编码器按需拉取。[`ByteAssembler`] 是解码端的逆过程：逐位拼回字节。

use crate::bits::{get_bit, set_bit};
use crate::constants::BITS_PER_BYTE;
use std::iter::FusedIterator;

/// 字节序列中的位置：第几个字节，以及字节内第几位 (0 为最高位)。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    pub byte_index: usize,
    pub bit_index: usize,
}

impl BitCursor {
    fn advance(&mut self) {
        self.bit_index += 1;
        if self.bit_index == BITS_PER_BYTE {
            self.bit_index = 0;
            self.byte_index += 1;
        }
    }

    /// 已经走过的位数。
    pub fn bits_consumed(&self) -> usize {
        self.byte_index * BITS_PER_BYTE + self.bit_index
    }
}

/// 对字节切片的惰性、有限、不可重启的位迭代器。
///
/// 每次 `next()` 返回 `Some(0)` 或 `Some(1)`；所有位产出后返回 `None`，
/// 且之后一直返回 `None`。
#[derive(Debug)]
pub struct BitStream<'a> {
    bytes: &'a [u8],
    cursor: BitCursor,
}

impl<'a> BitStream<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            cursor: BitCursor::default(),
        }
    }

    pub fn cursor(&self) -> BitCursor {
        self.cursor
    }
}

impl Iterator for BitStream<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.bytes.get(self.cursor.byte_index)?;
        let bit = get_bit(byte, self.cursor.bit_index);
        self.cursor.advance();
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len() * BITS_PER_BYTE - self.cursor.bits_consumed();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitStream<'_> {}

impl FusedIterator for BitStream<'_> {}

/// 把逐位到达的数据 (最高位在前) 拼装成固定数量的字节。
#[derive(Debug)]
pub struct ByteAssembler {
    bytes: Vec<u8>,
    cursor: BitCursor,
}

impl ByteAssembler {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
            cursor: BitCursor::default(),
        }
    }

    /// 写入下一位。缓冲区已满时返回 `false` 且不做任何修改。
    pub fn push(&mut self, bit: u8) -> bool {
        let Some(byte) = self.bytes.get_mut(self.cursor.byte_index) else {
            return false;
        };
        *byte = set_bit(*byte, self.cursor.bit_index, bit);
        self.cursor.advance();
        true
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.byte_index == self.bytes.len()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_the_bits_of_h_msb_first() {
        let b = [0b0100_1000];
        let bits: Vec<u8> = BitStream::new(&b).collect();
        assert_eq!(bits, vec![0, 1, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn should_end_after_the_last_bit_and_stay_ended() {
        let b = [0xFF, 0x00];
        let mut it = BitStream::new(&b);
        assert_eq!(it.len(), 16);
        for _ in 0..16 {
            assert!(it.next().is_some());
        }
        assert_eq!(it.len(), 0);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(BitStream::new(&[]).next(), None);
    }

    #[test]
    fn cursor_tracks_byte_and_bit_position() {
        let b = [0u8; 2];
        let mut it = BitStream::new(&b);
        it.by_ref().take(10).for_each(drop);
        assert_eq!(
            it.cursor(),
            BitCursor {
                byte_index: 1,
                bit_index: 2
            }
        );
    }

    #[test]
    fn assembler_reverses_the_stream() {
        let message = b"Hi there";
        let mut assembler = ByteAssembler::new(message.len());
        for bit in BitStream::new(message) {
            assert!(assembler.push(bit));
        }
        assert!(assembler.is_complete());
        assert!(!assembler.push(1), "a full assembler must reject more bits");
        assert_eq!(assembler.into_bytes(), message.to_vec());
    }

    #[test]
    fn zero_length_assembler_is_complete_immediately() {
        let assembler = ByteAssembler::new(0);
        assert!(assembler.is_complete());
        assert!(assembler.into_bytes().is_empty());
    }
}
