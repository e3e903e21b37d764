//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 程序没有配置文件，所有选项都来自命令行。

use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// 把文本隐藏在 RGB 图像通道的最低有效位中，或从中恢复文本。结果图像总是保存为 PNG。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "把 UTF-8 文本经 base64 编码后逐位写入 RGB 图像各通道的最低有效位，以 16 位结束标记收尾。\n结果图像总是保存为无损的 PNG，任何有损压缩都会破坏隐藏的内容。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v, -vv, -vvv)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在图像中隐藏文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复隐藏的文本。
    Recover(RecoverArgs),

    /// 显示图像能容纳的最大消息长度。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "message"])))]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 结果图像的输出路径，默认为输入图像旁的 `doctored_<name>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的输出路径，默认为图像旁的 `recovered_<name>.txt`。
    #[arg(short, long)]
    pub text: Option<PathBuf>,

    /// 目标文件已存在时直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
