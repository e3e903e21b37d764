//! # 隐写流程
//!
//! 组合 [`bits`](crate::bits) 与 [`pixels`](crate::pixels)：
//!
//! * 编码：`frame(text)` 得到位序列，再由 `embed` 写入图像副本。
//! * 解码：`extract_all` 读出整幅图像的最低位，再由 `unframe` 还原文本。
//!
//! 每次调用都是独立、无状态的，可以在多个线程上并行处理不同的图像。

use crate::bits::{frame, unframe};
use crate::constants::{BITS_PER_CHAR, TERMINATOR};
use crate::error::{Diagnostic, StegoError};
use crate::pixels::{capacity, embed, extract_all};
use image::RgbImage;

/// 把 `text` 隐藏到 `image` 的副本中并返回该副本。
///
/// # Errors
///
/// 图像容量不足时返回 [`StegoError::Capacity`]，原图不受影响。
pub fn encode(image: &RgbImage, text: &str) -> Result<RgbImage, StegoError> {
    embed(image, &frame(text))
}

/// 从图像中恢复隐藏的文本，失败时返回对应的诊断信息。
pub fn try_decode(image: &RgbImage) -> Result<String, Diagnostic> {
    unframe(&extract_all(image))
}

/// 从图像中恢复隐藏的文本。
///
/// 对任何图像都会返回一个可显示的字符串：
/// 找不到消息或消息损坏时，返回固定的诊断字符串。
pub fn decode(image: &RgbImage) -> String {
    try_decode(image).unwrap_or_else(|diagnostic| diagnostic.to_string())
}

/// 能够完整写入该图像的最大 UTF-8 字节数。
///
/// base64 每 3 个字节产生 4 个字符，再加上 16 位结束标记。
pub fn max_message_bytes(image: &RgbImage) -> usize {
    let chars = capacity(image).saturating_sub(TERMINATOR.len()) / BITS_PER_CHAR;
    chars / 4 * 3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MSG_EMPTY, MSG_NOT_FOUND};
    use image::Rgb;
    use rand::RngCore;

    fn random_image(width: u32, height: u32) -> RgbImage {
        let mut raw = vec![0u8; (width * height * 3) as usize];
        rand::rng().fill_bytes(&mut raw);
        RgbImage::from_raw(width, height, raw).unwrap()
    }

    /// 平滑渐变，最低位最长只有 6 个连续的 1。
    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let v = (x + y) as u8;
            Rgb([v, v, v])
        })
    }

    #[test]
    fn test_round_trip() {
        let image = random_image(64, 64);
        for text in [
            "hello",
            "The quick brown fox jumps over the lazy dog.",
            "tabs\tand\nnewlines",
            "这是一个测试信息！",
        ] {
            let encoded = encode(&image, text).unwrap();
            assert_eq!(decode(&encoded), text);
        }
    }

    #[test]
    fn test_unicode_round_trip() {
        let image = random_image(32, 32);
        let encoded = encode(&image, "héllo 🌍").unwrap();
        assert_eq!(try_decode(&encoded).as_deref(), Ok("héllo 🌍"));
    }

    #[test]
    fn test_encode_does_not_mutate_source() {
        let image = random_image(20, 20);
        let snapshot = image.clone();
        let encoded = encode(&image, "secret").unwrap();

        assert_eq!(image, snapshot);
        assert_eq!(encoded.dimensions(), image.dimensions());
    }

    #[test]
    fn test_empty_message() {
        let image = random_image(10, 10);
        let encoded = encode(&image, "").unwrap();
        assert_eq!(try_decode(&encoded), Err(Diagnostic::Empty));
        assert_eq!(decode(&encoded), MSG_EMPTY);
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(decode(&gradient_image(50, 40)), MSG_NOT_FOUND);
        let flat = RgbImage::from_pixel(30, 30, Rgb([200, 120, 40]));
        assert_eq!(decode(&flat), MSG_NOT_FOUND);
    }

    #[test]
    fn test_capacity_boundary() {
        // "abc" -> "YWJj": 4 * 8 + 16 = 48 = 4 * 4 * 3
        let image = random_image(4, 4);
        let encoded = encode(&image, "abc").unwrap();
        assert_eq!(decode(&encoded), "abc");

        assert_eq!(
            encode(&image, "abcd").unwrap_err(),
            StegoError::Capacity {
                required: 80,
                available: 48
            }
        );
    }

    #[test]
    fn test_max_message_bytes() {
        let image = random_image(10, 10);
        assert_eq!(max_message_bytes(&image), 24);

        assert!(encode(&image, &"x".repeat(24)).is_ok());
        assert!(encode(&image, &"x".repeat(25)).is_err());
        assert_eq!(max_message_bytes(&RgbImage::new(1, 1)), 0);
    }

    #[test]
    fn test_decode_is_total() {
        for _ in 0..20 {
            let image = random_image(24, 24);
            assert!(!decode(&image).is_empty());
        }
        assert_eq!(decode(&RgbImage::new(0, 0)), MSG_NOT_FOUND);
    }
}
