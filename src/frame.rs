// 该文件是 Tanjing （探镜） 项目的一部分。
// src/frame.rs - NCHW 输入张量与预处理
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{RgbImage, imageops::FilterType};
use thiserror::Error;
use tracing::debug;

const RGB_CHANNELS: usize = 3;

/// 缩放插值方式：双线性，与导出模型时 OpenCV 默认的 INTER_LINEAR 一致
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// 输入张量的通道顺序
///
/// 图像解码结果总是 RGB。`Bgr` 会交换第 0 与第 2 个平面，
/// 用于按 OpenCV 解码习惯（BGR）导出的模型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
  #[default]
  Rgb,
  Bgr,
}

impl ChannelOrder {
  // 第 i 个输出平面取自源像素的哪个通道
  fn source_channels(self) -> [usize; RGB_CHANNELS] {
    match self {
      ChannelOrder::Rgb => [0, 1, 2],
      ChannelOrder::Bgr => [2, 1, 0],
    }
  }
}

#[derive(Error, Debug)]
pub enum PreprocessError {
  #[error("输入图像为空: {width}x{height}")]
  EmptyImage { width: u32, height: u32 },
  #[error("模型输入尺寸无效: {width}x{height}")]
  InvalidTargetSize { width: u32, height: u32 },
}

/// 归一化到 [0, 1] 的平面（NCHW，N = 1）浮点张量
#[derive(Debug, Clone)]
pub struct NchwTensor {
  data: Box<[f32]>,
  width: u32,
  height: u32,
}

impl NchwTensor {
  /// 缩放、归一化并按通道拆分图像
  pub fn from_image(
    image: &RgbImage,
    width: u32,
    height: u32,
    order: ChannelOrder,
  ) -> Result<Self, PreprocessError> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
      return Err(PreprocessError::EmptyImage {
        width: src_w,
        height: src_h,
      });
    }
    if width == 0 || height == 0 {
      return Err(PreprocessError::InvalidTargetSize { width, height });
    }

    debug!(
      "预处理: {}x{} -> {}x{}, 通道顺序 {:?}",
      src_w, src_h, width, height, order
    );

    let resized;
    let source = if (src_w, src_h) == (width, height) {
      image
    } else {
      resized = image::imageops::resize(image, width, height, RESIZE_FILTER);
      &resized
    };

    let plane_size = width as usize * height as usize;
    let mut data = vec![0f32; RGB_CHANNELS * plane_size];
    let channels = order.source_channels();

    // pixels() 按行优先遍历，下标即平面内偏移
    for (idx, pixel) in source.pixels().enumerate() {
      for (plane, &channel) in channels.iter().enumerate() {
        data[plane * plane_size + idx] = pixel[channel] as f32 / 255.0;
      }
    }

    Ok(Self {
      data: data.into_boxed_slice(),
      width,
      height,
    })
  }

  /// ONNX 输入形状 `[1, 3, H, W]`
  pub fn shape(&self) -> [usize; 4] {
    [1, RGB_CHANNELS, self.height as usize, self.width as usize]
  }
}

impl AsRef<[f32]> for NchwTensor {
  fn as_ref(&self) -> &[f32] {
    &self.data
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(color))
  }

  fn plane(tensor: &NchwTensor, channel: usize) -> &[f32] {
    let [_, _, height, width] = tensor.shape();
    &tensor.as_ref()[channel * width * height..(channel + 1) * width * height]
  }

  fn assert_plane_filled(plane: &[f32], expected: f32) {
    assert!(
      plane.iter().all(|v| (v - expected).abs() < 1e-6),
      "平面不是常量 {expected}"
    );
  }

  #[test]
  fn solid_color_splits_into_uniform_planes() {
    let image = solid(32, 24, [10, 128, 250]);
    let tensor = NchwTensor::from_image(&image, 16, 16, ChannelOrder::Rgb).unwrap();

    assert_eq!(tensor.as_ref().len(), 3 * 16 * 16);
    assert_eq!(tensor.shape(), [1, 3, 16, 16]);
    assert_plane_filled(plane(&tensor, 0), 10.0 / 255.0);
    assert_plane_filled(plane(&tensor, 1), 128.0 / 255.0);
    assert_plane_filled(plane(&tensor, 2), 250.0 / 255.0);
  }

  #[test]
  fn bgr_order_swaps_outer_planes() {
    let image = solid(8, 8, [10, 128, 250]);
    let tensor = NchwTensor::from_image(&image, 8, 8, ChannelOrder::Bgr).unwrap();

    assert_plane_filled(plane(&tensor, 0), 250.0 / 255.0);
    assert_plane_filled(plane(&tensor, 1), 128.0 / 255.0);
    assert_plane_filled(plane(&tensor, 2), 10.0 / 255.0);
  }

  #[test]
  fn layout_is_planar_not_interleaved() {
    let mut image = solid(2, 1, [0, 0, 0]);
    image.put_pixel(0, 0, Rgb([255, 0, 51]));
    image.put_pixel(1, 0, Rgb([0, 255, 102]));
    let tensor = NchwTensor::from_image(&image, 2, 1, ChannelOrder::Rgb).unwrap();

    let expected = [1.0, 0.0, 0.0, 1.0, 0.2, 0.4];
    for (got, want) in tensor.as_ref().iter().zip(expected) {
      assert!((got - want).abs() < 1e-6, "{got} != {want}");
    }
  }

  #[test]
  fn non_square_target_uses_width_and_height() {
    let image = solid(10, 10, [1, 2, 3]);
    let tensor = NchwTensor::from_image(&image, 6, 4, ChannelOrder::Rgb).unwrap();
    assert_eq!(tensor.shape(), [1, 3, 4, 6]);
    assert_eq!(tensor.as_ref().len(), 72);
  }

  #[test]
  fn rejects_empty_source_and_zero_target() {
    let empty = RgbImage::new(0, 5);
    assert!(matches!(
      NchwTensor::from_image(&empty, 4, 4, ChannelOrder::Rgb),
      Err(PreprocessError::EmptyImage { .. })
    ));

    let image = solid(4, 4, [0, 0, 0]);
    assert!(matches!(
      NchwTensor::from_image(&image, 0, 4, ChannelOrder::Rgb),
      Err(PreprocessError::InvalidTargetSize { .. })
    ));
  }
}
