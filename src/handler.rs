//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::max_encode_size;
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{DOCTORED_PREFIX, RECOVERED_PREFIX};
use crate::error::StegoError;
use crate::grid::PixelGrid;
use crate::steganography::{decode, encode_png};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{DynamicImage, ImageError};
use log::info;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和消息、调用核心编码函数生成 PNG，
/// 最后将结果写入目标图像文件。无论目标扩展名是什么，写出的都是 PNG 数据。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或图像格式不受支持。
/// * 图像没有足够的空间来隐藏消息。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let carrier = load_carrier(&args.image)?;

    let message = match (&args.text, args.message) {
        (Some(path), _) => fs::read(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, Some(message)) => message.into_bytes(),
        (None, None) => anyhow::bail!("Nothing to hide. \nProvide either --text or --message."),
    };

    let dest = args
        .dest
        .unwrap_or_else(|| default_output(&args.image, DOCTORED_PREFIX, "png"));
    ensure_writable(&dest, args.force)?;

    info!(
        "Hiding {} bytes in {} ({}x{})",
        message.len(),
        args.image.display(),
        carrier.width(),
        carrier.height()
    );

    // 先编码到内存，失败时不会留下不完整的输出文件
    let mut png = Cursor::new(Vec::new());
    encode_png(&mut png, &carrier, &message).with_context(|| {
        format!(
            "Failed to hide the message in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, png.into_inner()).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用核心解码函数，
/// 最后将恢复的内容写入目标文件或打印到标准输出。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件，或图像格式不受支持。
/// * 图像中没有完整的隐藏消息。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let grid = PixelGrid::from_source(&load_carrier(&args.image)?);

    let message = decode(&grid).with_context(|| {
        format!(
            "Failed to recover the message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    info!(
        "Recovered {} bytes from {}",
        message.len(),
        args.image.display()
    );

    if args.print {
        if message.is_empty() {
            println!("{}", "No message found".yellow());
        } else {
            println!("{}", String::from_utf8_lossy(&message));
        }
        return Ok(());
    }

    let dest = args
        .text
        .unwrap_or_else(|| default_output(&args.image, RECOVERED_PREFIX, "txt"));
    ensure_writable(&dest, args.force)?;

    fs::write(&dest, message).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令：打印图像尺寸和最多可隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let grid = PixelGrid::from_source(&load_carrier(&args.image)?);
    let capacity = max_encode_size(grid.width(), grid.height());

    println!(
        "{} ({}x{}) can hide up to {} bytes",
        args.image.to_string_lossy().bold(),
        grid.width(),
        grid.height(),
        capacity.to_string().green().bold()
    );
    Ok(())
}

/// 读取并解码图像文件。
fn load_carrier(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path)
        .map_err(|e| match e {
            ImageError::Unsupported(unsupported) => {
                anyhow::Error::new(StegoError::UnsupportedColorModel(unsupported.to_string()))
            }
            other => anyhow::Error::new(other),
        })
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

    Ok(image)
}

/// 在 `source` 旁边生成 `<prefix><文件名>.<extension>` 形式的默认输出路径。
fn default_output(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    source.with_file_name(format!("{prefix}{stem}.{extension}"))
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}
