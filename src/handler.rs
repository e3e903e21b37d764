//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责文件 I/O、把输入图像统一转换为 RGB、调用隐写核心以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::error::StegoError;
use crate::pixels::capacity;
use crate::steganography::{encode, max_message_bytes, try_decode};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbImage};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 读取任意受支持格式的图像，并丢弃 alpha 等多余通道。
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let picture = image::open(path)
        .with_context(|| {
            format!(
                "Unable to read image file: {}",
                path.to_string_lossy().red().bold()
            )
        })?
        .to_rgb8();

    info!(
        "loaded {} ({}x{})",
        path.display(),
        picture.width(),
        picture.height()
    );
    Ok(picture)
}

/// 在 `source` 所在目录下生成 `<prefix>_<stem>.<extension>`。
fn default_output(source: &Path, prefix: &str, extension: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let name = format!("{prefix}_{stem}.{extension}");

    match source.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取图像和待隐藏的文本、检查隐写空间是否足够、调用隐写核心函数，
/// 最后把结果以 PNG 格式写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .unwrap_or_else(|| default_output(&args.image, "doctored", "png"));
    ensure_writable(&dest, args.force)?;

    let picture = load_rgb(&args.image)?;

    let text = match (args.message, args.text) {
        (Some(message), _) => message,
        (None, Some(path)) => fs::read_to_string(&path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Nothing to hide. \nUse --text or --message."),
    };

    let doctored = match encode(&picture, &text) {
        Ok(doctored) => doctored,
        Err(StegoError::Capacity {
            required,
            available,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
    };

    doctored
        .save_with_format(&dest, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })?;

    info!("hid {} bytes in {}", text.len(), dest.display());
    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 读取经过隐写的图像并恢复其中的文本。
/// 图像中没有可用的消息时，只打印诊断信息，不写任何文件，也不视为错误。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .unwrap_or_else(|| default_output(&args.image, "recovered", "txt"));
    ensure_writable(&dest, args.force)?;

    let picture = load_rgb(&args.image)?;

    let text = match try_decode(&picture) {
        Ok(text) => text,
        Err(diagnostic) => {
            warn!("{}: {:?}", args.image.display(), diagnostic);
            println!("{}", diagnostic.to_string().yellow().bold());
            return Ok(());
        }
    };

    fs::write(&dest, &text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!("recovered {} bytes from {}", text.len(), args.image.display());
    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑，打印图像的位容量和可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = load_rgb(&args.image)?;

    println!(
        "{}: {} bits, up to {} bytes of UTF-8 text",
        args.image.to_string_lossy().bold(),
        capacity(&picture).to_string().green().bold(),
        max_message_bytes(&picture).to_string().green().bold()
    );
    Ok(())
}
