//! # 隐写核心模块
//!
//! 在像素 R, G, B 通道的最低有效位中写入/读取带长度头部的消息。
//!
//! 嵌入格式：
//! * 前 32 位是消息长度 (`u32`，大端序)；
//! * 紧接着是消息本体，每个字节最高位在前；
//! * 每个像素依次使用 R, G, B 三个通道各一位，alpha 不参与；
//! * 像素按列优先顺序遍历 (见 [`crate::grid`])。

use crate::bit_stream::{BitStream, ByteAssembler};
use crate::bits::{get_lsb, set_lsb};
use crate::capacity::max_encode_size;
use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, HEADER_BITS, HEADER_SIZE};
use crate::error::StegoError;
use crate::framing::{combine_to_int, frame};
use crate::grid::PixelGrid;
use image::{DynamicImage, ImageFormat};
use log::debug;
use std::io::{Seek, Write};

/// 把 `message` 隐藏进 `grid`，返回修改后的网格。
///
/// 只有遍历顺序中前 `ceil((4 + L) * 8 / 3)` 个像素的 R, G, B 最低位可能改变，
/// 之后的像素与输入完全相同。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::CapacityExceeded`]，此时不会修改任何像素。
pub fn encode(mut grid: PixelGrid, message: &[u8]) -> Result<PixelGrid, StegoError> {
    let capacity = u64::from(max_encode_size(grid.width(), grid.height()));
    let required = message.len() as u64 + HEADER_SIZE as u64;
    if capacity < required {
        return Err(StegoError::CapacityExceeded {
            required,
            available: capacity,
        });
    }

    let framed = frame(message)?;
    let mut bits = BitStream::new(&framed);
    debug!(
        "Hiding {} bytes ({} bits with header) in a {}x{} grid",
        message.len(),
        bits.len(),
        grid.width(),
        grid.height()
    );

    for (x, y) in grid.coordinates() {
        let mut pixel = grid.at(x, y);
        for channel in pixel.0.iter_mut().take(CHANNELS_PER_PIXEL) {
            let Some(bit) = bits.next() else { break };
            *channel = set_lsb(*channel, bit);
        }
        grid.set(x, y, pixel);
        if bits.len() == 0 {
            break;
        }
    }

    Ok(grid)
}

/// 把 `image` 规范化为 RGBA 网格，隐藏 `message`，并以 PNG 格式写入 `writer`。
///
/// PNG 是无损格式，写出的最低有效位可以被原样读回。
///
/// # Errors
///
/// 容量不足时返回 [`StegoError::CapacityExceeded`]，此时 `writer` 中不会写入任何数据；
/// PNG 编码或写入失败时返回 [`StegoError::ImageEncodingError`]。
pub fn encode_png<W: Write + Seek>(
    writer: &mut W,
    image: &DynamicImage,
    message: &[u8],
) -> Result<(), StegoError> {
    let encoded = encode(PixelGrid::from_source(image), message)?;
    encoded
        .as_image()
        .write_to(writer, ImageFormat::Png)
        .map_err(|e| StegoError::ImageEncodingError(e.to_string()))
}

/// 解码器所处的阶段。
#[derive(Debug)]
enum Phase {
    ReadingHeader(ByteAssembler),
    ReadingPayload(ByteAssembler),
}

/// 从 `grid` 中恢复隐藏的消息：先读 4 字节长度头部，再从下一个通道开始读取消息本体。
///
/// # Errors
///
/// 图像放不下完整的头部，或头部声明的长度超出图像剩余的通道数时，
/// 返回 [`StegoError::MalformedCarrier`]。
pub fn decode(grid: &PixelGrid) -> Result<Vec<u8>, StegoError> {
    let available_bits = grid.channel_count();
    let mut channels = grid.color_channels();
    let mut phase = Phase::ReadingHeader(ByteAssembler::new(HEADER_SIZE));
    let mut needed_bits = HEADER_BITS as u64;

    loop {
        phase = match phase {
            Phase::ReadingHeader(header) if header.is_complete() => {
                let length = header_length(&header.into_bytes());
                ensure_payload_fits(length, available_bits)?;
                debug!("Found a header announcing {length} bytes");
                needed_bits = framed_bits(length);
                Phase::ReadingPayload(ByteAssembler::new(length as usize))
            }
            Phase::ReadingPayload(payload) if payload.is_complete() => {
                return Ok(payload.into_bytes());
            }
            Phase::ReadingHeader(mut header) => {
                push_next(&mut channels, &mut header, needed_bits, available_bits)?;
                Phase::ReadingHeader(header)
            }
            Phase::ReadingPayload(mut payload) => {
                push_next(&mut channels, &mut payload, needed_bits, available_bits)?;
                Phase::ReadingPayload(payload)
            }
        };
    }
}

/// 只读取长度头部。
///
/// # Errors
///
/// 图像少于 32 个颜色通道时返回 [`StegoError::MalformedCarrier`]。
pub fn message_length(grid: &PixelGrid) -> Result<u32, StegoError> {
    let available_bits = grid.channel_count();
    let mut channels = grid.color_channels();
    let mut header = ByteAssembler::new(HEADER_SIZE);
    while !header.is_complete() {
        push_next(&mut channels, &mut header, HEADER_BITS as u64, available_bits)?;
    }
    Ok(header_length(&header.into_bytes()))
}

/// 跳过头部，按调用方给出的长度读取消息本体。
///
/// # Errors
///
/// 头部加上 `length` 字节超出图像容量时返回 [`StegoError::MalformedCarrier`]。
pub fn decode_with_length(grid: &PixelGrid, length: u32) -> Result<Vec<u8>, StegoError> {
    let available_bits = grid.channel_count();
    ensure_payload_fits(length, available_bits)?;
    let mut channels = grid.color_channels().skip(HEADER_BITS);
    let mut payload = ByteAssembler::new(length as usize);
    let needed_bits = framed_bits(length);
    while !payload.is_complete() {
        push_next(&mut channels, &mut payload, needed_bits, available_bits)?;
    }
    Ok(payload.into_bytes())
}

fn push_next(
    channels: &mut impl Iterator<Item = u8>,
    assembler: &mut ByteAssembler,
    needed_bits: u64,
    available_bits: u64,
) -> Result<(), StegoError> {
    let channel = channels.next().ok_or(StegoError::MalformedCarrier {
        needed_bits,
        available_bits,
    })?;
    let pushed = assembler.push(get_lsb(channel));
    debug_assert!(pushed, "bit pushed into an already complete assembler");
    Ok(())
}

fn header_length(bytes: &[u8]) -> u32 {
    combine_to_int(bytes[0], bytes[1], bytes[2], bytes[3])
}

/// 头部加上 `length` 字节消息所占的总位数。
fn framed_bits(length: u32) -> u64 {
    (u64::from(length) + HEADER_SIZE as u64) * BITS_PER_BYTE as u64
}

fn ensure_payload_fits(length: u32, available_bits: u64) -> Result<(), StegoError> {
    let needed_bits = framed_bits(length);
    if needed_bits > available_bits {
        return Err(StegoError::MalformedCarrier {
            needed_bits,
            available_bits,
        });
    }
    Ok(())
}
