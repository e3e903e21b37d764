//! # 像素通道编解码
//!
//! 按固定顺序遍历 RGB 图像的每个通道值：从上到下逐行，行内从左到右，
//! 像素内按 R、G、B。每个通道值的最低位承载一位数据。
//! 写入和读取必须使用完全相同的顺序。

use crate::bits::BitSequence;
use crate::constants::CHANNELS;
use crate::error::StegoError;
use image::RgbImage;
use log::debug;

/// 图像可承载的位数，即通道值的总数。
pub fn capacity(image: &RgbImage) -> usize {
    let (width, height) = image.dimensions();
    (width as usize) * (height as usize) * CHANNELS
}

/// 将位序列写入图像副本的最低位。
///
/// 位序列用完后，其余通道值保持原样。
///
/// # Errors
///
/// 位序列长度超过 [`capacity`] 时返回 [`StegoError::Capacity`]，此时不做任何写入。
pub fn embed(image: &RgbImage, bits: &BitSequence) -> Result<RgbImage, StegoError> {
    let available = capacity(image);
    if bits.len() > available {
        return Err(StegoError::Capacity {
            required: bits.len(),
            available,
        });
    }

    let mut output = image.clone();
    output
        .pixels_mut()
        .flat_map(|pixel| pixel.0.iter_mut())
        .zip(bits.iter())
        .for_each(|(value, bit)| *value = (*value & 0xFE) | bit as u8);

    debug!("embedded {} of {} available bits", bits.len(), available);
    Ok(output)
}

/// 读取整幅图像全部通道值的最低位。
///
/// 结果长度总是等于 [`capacity`]，载荷在哪里结束由上层判断。
pub fn extract_all(image: &RgbImage) -> BitSequence {
    image
        .pixels()
        .flat_map(|pixel| pixel.0.iter())
        .map(|&value| value & 1 == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use rand::RngCore;

    fn random_image(width: u32, height: u32) -> RgbImage {
        let mut raw = vec![0u8; (width * height * 3) as usize];
        rand::rng().fill_bytes(&mut raw);
        RgbImage::from_raw(width, height, raw).unwrap()
    }

    #[test]
    fn test_capacity() {
        assert_eq!(capacity(&RgbImage::new(10, 7)), 210);
        assert_eq!(capacity(&RgbImage::new(0, 5)), 0);
    }

    #[test]
    fn test_traversal_order() {
        let image = RgbImage::new(2, 2);
        // 第二个像素 (x=1, y=0) 的 G 通道是第 5 位。
        let bits: BitSequence = (0..12).map(|i| i == 4).collect();
        let output = embed(&image, &bits).unwrap();

        assert_eq!(*output.get_pixel(1, 0), Rgb([0, 1, 0]));
        assert_eq!(*output.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*output.get_pixel(0, 1), Rgb([0, 0, 0]));

        // 第二行第一个像素的 R 通道是第 7 位。
        let bits: BitSequence = (0..7).map(|i| i == 6).collect();
        let output = embed(&image, &bits).unwrap();
        assert_eq!(*output.get_pixel(0, 1), Rgb([1, 0, 0]));
    }

    #[test]
    fn test_embed_only_touches_lsb() {
        let image = random_image(16, 9);
        let bits: BitSequence = (0..capacity(&image)).map(|i| i % 3 == 0).collect();
        let output = embed(&image, &bits).unwrap();

        for (before, after) in image.as_raw().iter().zip(output.as_raw()) {
            assert_eq!(before & 0xFE, after & 0xFE);
        }
        assert_eq!(extract_all(&output), bits);
    }

    #[test]
    fn test_embed_leaves_tail_untouched() {
        let image = random_image(8, 8);
        let bits: BitSequence = vec![true; 10].into();
        let output = embed(&image, &bits).unwrap();

        assert_eq!(&image.as_raw()[10..], &output.as_raw()[10..]);
        assert!(output.as_raw()[..10].iter().all(|v| v & 1 == 1));
    }

    #[test]
    fn test_embed_capacity_boundary() {
        let image = random_image(4, 4);
        let exact: BitSequence = vec![false; 48].into();
        assert!(embed(&image, &exact).is_ok());

        let over: BitSequence = vec![false; 49].into();
        assert_eq!(
            embed(&image, &over).unwrap_err(),
            StegoError::Capacity {
                required: 49,
                available: 48
            }
        );
    }

    #[test]
    fn test_extract_all_is_idempotent() {
        let image = random_image(13, 5);
        let first = extract_all(&image);
        let second = extract_all(&image);

        assert_eq!(first.len(), 13 * 5 * 3);
        assert_eq!(first, second);
    }
}
