//! # lsb_conceal 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：把带长度头部的字节消息写入图像
//! R, G, B 通道的最低有效位，并按相同的列优先顺序读回。

// 声明库包含的所有模块。

pub mod bit_stream;
pub mod bits;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod framing;
pub mod grid;
pub mod handler;
pub mod steganography;

pub use error::StegoError;
pub use grid::PixelGrid;
pub use steganography::{decode, decode_with_length, encode, encode_png, message_length};
