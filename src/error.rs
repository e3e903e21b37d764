//! # 错误类型
//!
//! 隐写核心只有两类失败：
//! 编码时容量不足 (致命，调用方必须处理)，
//! 以及解码时的诊断结果 (从不致命，总能转换成可显示的字符串)。

use crate::constants::{MSG_DECODE_ERROR, MSG_EMPTY, MSG_NOT_FOUND};
use thiserror::Error;

/// 编码阶段的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 待写入的位数超过图像的通道容量。图像不会被修改。
    #[error("message needs {required} bits but the image only holds {available}")]
    Capacity { required: usize, available: usize },
}

/// 解码阶段的诊断结果，`Display` 输出固定的提示字符串。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("{}", MSG_NOT_FOUND)]
    NotFound,

    #[error("{}", MSG_EMPTY)]
    Empty,

    #[error("{}", MSG_DECODE_ERROR)]
    Malformed,
}
