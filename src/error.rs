//! # 错误类型模块
//!
//! 隐写核心返回的所有错误。命令处理层会把它们包装进 `anyhow::Error` 并附加上下文。

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 消息加上 4 字节长度头部无法放入图像的可用最低有效位中。
    /// 在修改任何像素之前报告。
    #[error(
        "Not enough space in the image to hide the message. Required: {required} bytes, Available: {available} bytes"
    )]
    CapacityExceeded { required: u64, available: u64 },

    /// 图像太小，无法容纳完整的长度头部，或者负载读取越过了图像边界。
    #[error(
        "Malformed carrier: {needed_bits} bits are required but the image only holds {available_bits}"
    )]
    MalformedCarrier { needed_bits: u64, available_bits: u64 },

    /// 隐写后的像素无法被编码为图像文件。
    #[error("Image encoding error: {0}")]
    ImageEncodingError(String),

    /// 图像容器无法被解码为像素 (格式或颜色模型不受支持)。
    #[error("Unsupported color model or image format: {0}")]
    UnsupportedColorModel(String),
}
