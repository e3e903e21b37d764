//! # 位序列编解码
//!
//! 文本与自终止位序列之间的转换：
//! `文本 -> UTF-8 字节 -> base64 (ASCII) -> 每字符 8 位 (高位在前) -> 追加结束标记`。
//!
//! 先经过 base64 保证每 8 位都对应一个可打印 ASCII 字符，
//! 载荷中不会出现与结束标记冲突的位模式。

use crate::constants::{BITS_PER_CHAR, TERMINATOR};
use crate::error::Diagnostic;
use base64::{
    Engine as _, alphabet,
    engine::{
        DecodePaddingMode,
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
    },
};
use log::debug;

/// 宽松的 base64 解码器：不关心填充，也容忍末尾多余的位。
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// 有序的位序列，`true` 表示 1。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence(Vec<bool>);

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 把文本转换为带结束标记的位序列。
///
/// 对任何字符串都不会失败，空字符串只产生结束标记本身。
pub fn frame(text: &str) -> BitSequence {
    let encoded = STANDARD.encode(text.as_bytes());
    debug!(
        "framing {} bytes as {} base64 chars",
        text.len(),
        encoded.len()
    );

    encoded
        .bytes()
        .flat_map(|byte| (0..BITS_PER_CHAR).rev().map(move |i| (byte >> i) & 1 == 1))
        .chain(TERMINATOR)
        .collect()
}

/// 返回结束标记第一次出现的位置。
pub fn find_terminator(bits: &BitSequence) -> Option<usize> {
    bits.as_slice()
        .windows(TERMINATOR.len())
        .position(|window| window == TERMINATOR)
}

/// 从位序列中还原文本。
///
/// 只读取第一个结束标记之前的位。末尾不足 8 位的部分会被丢弃，
/// 非 ASCII 字节和非法的 UTF-8 序列都会被跳过，而不是报错。
///
/// # Errors
///
/// * [`Diagnostic::NotFound`] - 没有结束标记。
/// * [`Diagnostic::Empty`] - 标记之前没有内容，或还原出的文本为空白。
/// * [`Diagnostic::Malformed`] - 载荷无法按 base64 解码。
pub fn unframe(bits: &BitSequence) -> Result<String, Diagnostic> {
    let end = find_terminator(bits).ok_or(Diagnostic::NotFound)?;
    debug!("terminator found at bit {}", end);

    let payload = &bits.as_slice()[..end];
    if payload.is_empty() {
        return Err(Diagnostic::Empty);
    }

    let ascii: String = payload
        .chunks_exact(BITS_PER_CHAR)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .filter(u8::is_ascii)
        .map(char::from)
        .collect();
    let ascii = ascii.trim_end_matches('\0');
    if ascii.is_empty() {
        return Err(Diagnostic::Empty);
    }

    let bytes = STANDARD
        .decode(ascii)
        .ok()
        .or_else(|| decode_lenient(ascii))
        .ok_or(Diagnostic::Malformed)?;

    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    if text.trim_matches(is_blank).is_empty() {
        return Err(Diagnostic::Empty);
    }

    Ok(text)
}

/// 空白字符，包括 U+001C..=U+001F 这几个分隔符。
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// 补上 `==` 后再宽松地解码一次。
///
/// 字母表之外的字符被跳过；第一个凑满一组的填充之后的内容全部忽略。
/// 字符数余 1 的残缺分组无法解码，返回 `None`。
fn decode_lenient(ascii: &str) -> Option<Vec<u8>> {
    let mut cleaned = String::with_capacity(ascii.len());
    let mut pads = 0;
    let mut complete = false;

    for c in ascii.chars().chain("==".chars()) {
        let quad_pos = cleaned.len() % 4;
        match c {
            '=' if quad_pos >= 2 => {
                pads += 1;
                if quad_pos + pads >= 4 {
                    complete = true;
                    break;
                }
            }
            'A'..='Z' | 'a'..='z' | '0'..='9' | '+' | '/' => {
                cleaned.push(c);
                pads = 0;
            }
            _ => {}
        }
    }

    debug!(
        "strict base64 decode failed, retrying with {} chars",
        cleaned.len()
    );
    if !complete && cleaned.len() % 4 != 0 {
        return None;
    }
    LENIENT.decode(cleaned).ok()
}
