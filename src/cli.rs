//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像的 R, G, B 通道中隐藏或恢复任意字节消息。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，在无损格式图像 (如 PNG, BMP) 的 R, G, B 通道中隐藏或恢复任意字节消息。\n\n设置环境变量 RUST_LOG=debug 可以查看详细日志。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量查询)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 在无损格式图像中隐藏一个文件的内容或一段文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的消息。
    Recover(RecoverArgs),

    /// 显示图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的内容的文件路径。
    #[arg(short, long, required_unless_present = "message", conflicts_with = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 保存结果图像的输出路径，总是以 PNG 格式写出。默认为输入图像旁边的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存恢复内容的输出路径。默认为图像旁边的 `recovered_<名称>.txt`。
    #[arg(short, long, conflicts_with = "print")]
    pub text: Option<PathBuf>,

    /// 把恢复的消息直接打印到标准输出，而不是写入文件。
    #[arg(short, long)]
    pub print: bool,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要查询的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
