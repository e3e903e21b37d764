//! # lsb_courier 库
//!
//! 本库包含 LSB 文本隐写的核心逻辑 (`bits`、`pixels`、`steganography`)
//! 以及命令行工具使用的外围模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod pixels;
pub mod steganography;

pub use error::{Diagnostic, StegoError};
pub use steganography::{decode, encode, try_decode};
