// 该文件是 Tanjing （探镜） 项目的一部分。
// src/output/draw.rs - 目标检测结果可视化
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

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use embedded_graphics::{
  mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10},
  pixelcolor::Rgb888,
  prelude::*,
  text::Text,
};
use image::{Rgb, RgbImage};
use imageproc::{
  drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
  rect::Rect,
};
use thiserror::Error;

use crate::{
  FromPath,
  model::{BBox, DetectItem, DetectResult, WithLabel},
};

// 绘制常量
const BOX_COLOR: [u8; 3] = [0, 255, 0]; // 绿色
const BOX_THICKNESS: i32 = 2;
const LABEL_BACKGROUND: [u8; 3] = [255, 255, 255];
const LABEL_COLOR: [u8; 3] = [0, 0, 0];
const LABEL_FONT_SIZE: f32 = 16.0;
const MONO_FONT: &MonoFont<'static> = &FONT_6X10;

#[derive(Error, Debug)]
pub enum LabelFontError {
  #[error("无法读取字体文件 {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("无效的 TrueType 字体: {path}")]
  Invalid { path: PathBuf },
}

/// 标签文本的像素尺寸，高度以基线为界分为上下两部分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMetrics {
  pub width: u32,
  pub ascent: u32,
  pub descent: u32,
}

/// 标签字体
pub enum LabelFont {
  /// 内置 6x10 点阵字体
  Mono,
  TrueType { font: FontVec, scale: PxScale },
}

impl FromPath for LabelFont {
  type Error = LabelFontError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    let data = std::fs::read(path).map_err(|source| LabelFontError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let font = FontVec::try_from_vec(data).map_err(|_| LabelFontError::Invalid {
      path: path.to_path_buf(),
    })?;

    Ok(LabelFont::TrueType {
      font,
      scale: PxScale::from(LABEL_FONT_SIZE),
    })
  }
}

impl LabelFont {
  pub fn measure(&self, text: &str) -> LabelMetrics {
    match self {
      LabelFont::Mono => {
        let chars = text.chars().count() as u32;
        let size = MONO_FONT.character_size;
        LabelMetrics {
          width: chars * size.width + chars.saturating_sub(1) * MONO_FONT.character_spacing,
          ascent: MONO_FONT.baseline,
          descent: size.height - MONO_FONT.baseline,
        }
      }
      LabelFont::TrueType { font, scale } => {
        let scaled = font.as_scaled(*scale);
        let (width, _) = text_size(*scale, font, text);
        LabelMetrics {
          width,
          ascent: scaled.ascent().ceil() as u32,
          descent: (-scaled.descent()).ceil() as u32,
        }
      }
    }
  }

  /// 以 (x, baseline) 为起点绘制文本
  fn draw(&self, image: &mut RgbImage, x: i32, baseline: i32, text: &str, color: [u8; 3]) {
    match self {
      LabelFont::Mono => {
        let style = MonoTextStyle::new(MONO_FONT, Rgb888::new(color[0], color[1], color[2]));
        let mut target = ImageDrawTarget { image };
        let _ = Text::new(text, Point::new(x, baseline), style).draw(&mut target);
      }
      LabelFont::TrueType { font, scale } => {
        // draw_text_mut 的 y 为文本顶部
        let top = baseline - font.as_scaled(*scale).ascent().ceil() as i32;
        draw_text_mut(image, Rgb(color), x, top, *scale, font, text);
      }
    }
  }
}

pub struct Draw {
  font: LabelFont,
  box_color: [u8; 3],
  label_background: [u8; 3],
  label_color: [u8; 3],
}

impl Default for Draw {
  fn default() -> Self {
    Self::new(LabelFont::Mono)
  }
}

impl Draw {
  pub fn new(font: LabelFont) -> Self {
    Self {
      font,
      box_color: BOX_COLOR,
      label_background: LABEL_BACKGROUND,
      label_color: LABEL_COLOR,
    }
  }

  pub fn draw_detections_on_image(&self, image: &mut RgbImage, result: &DetectResult) {
    for item in result.iter() {
      self.draw_bbox_with_label(image, item);
    }
  }

  fn draw_bbox_with_label(&self, image: &mut RgbImage, item: &DetectItem) {
    let (image_w, image_h) = image.dimensions();
    let Some((left, top, right, bottom)) = clamp_to_image(&item.bbox, image_w, image_h) else {
      return;
    };

    // 边框向内加粗
    for t in 0..BOX_THICKNESS {
      let (l, tp, r, b) = (left + t, top + t, right - t, bottom - t);
      if l > r || tp > b {
        break;
      }
      let rect = Rect::at(l, tp).of_size((r - l + 1) as u32, (b - tp + 1) as u32);
      draw_hollow_rect_mut(image, rect, Rgb(self.box_color));
    }

    // 标签背景从 (left, top - ascent) 延伸到 (left + width, top + descent)，文本基线落在 top
    let label = label_text(item);
    let metrics = self.font.measure(&label);
    if metrics.width > 0 {
      let rect = Rect::at(left, top - metrics.ascent as i32)
        .of_size(metrics.width, (metrics.ascent + metrics.descent).max(1));
      draw_filled_rect_mut(image, rect, Rgb(self.label_background));
    }
    self.font.draw(image, left, top, &label, self.label_color);
  }
}

/// 将边界框裁剪到图像内，返回闭区间 (left, top, right, bottom)
///
/// 尺寸非正或完全位于图像外的框返回 `None`。
fn clamp_to_image(bbox: &BBox, image_w: u32, image_h: u32) -> Option<(i32, i32, i32, i32)> {
  let BBox {
    x,
    y,
    width,
    height,
  } = *bbox;
  if width <= 0 || height <= 0 || image_w == 0 || image_h == 0 {
    return None;
  }

  // i64 下计算右下角，避免饱和坐标溢出
  let (left, top) = (i64::from(x), i64::from(y));
  let right = left + i64::from(width) - 1;
  let bottom = top + i64::from(height) - 1;
  let (max_x, max_y) = (i64::from(image_w) - 1, i64::from(image_h) - 1);
  if right < 0 || bottom < 0 || left > max_x || top > max_y {
    return None;
  }

  // 裁剪后的坐标都落在 [0, 图像尺寸) 内，可安全转回 i32
  Some((
    left.clamp(0, max_x) as i32,
    top.clamp(0, max_y) as i32,
    right.clamp(0, max_x) as i32,
    bottom.clamp(0, max_y) as i32,
  ))
}

pub fn label_text(item: &DetectItem) -> String {
  format!("{}: {:.6}", item.kind.to_label_str(), item.score)
}

/// 让 embedded-graphics 直接在 RgbImage 上绘制，越界像素丢弃
struct ImageDrawTarget<'a> {
  image: &'a mut RgbImage,
}

impl OriginDimensions for ImageDrawTarget<'_> {
  fn size(&self) -> Size {
    Size::new(self.image.width(), self.image.height())
  }
}

impl DrawTarget for ImageDrawTarget<'_> {
  type Color = Rgb888;
  type Error = core::convert::Infallible;

  fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
  where
    I: IntoIterator<Item = Pixel<Self::Color>>,
  {
    let width = self.image.width() as i32;
    let height = self.image.height() as i32;
    for Pixel(coord, color) in pixels {
      if coord.x < 0 || coord.y < 0 || coord.x >= width || coord.y >= height {
        continue;
      }
      self.image.put_pixel(
        coord.x as u32,
        coord.y as u32,
        Rgb([color.r(), color.g(), color.b()]),
      );
    }
    Ok(())
  }
}
