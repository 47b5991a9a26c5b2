// 该文件是 Tanjing （探镜） 项目的一部分。
// src/output/save_image_file.rs - 保存图像文件
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

use std::path::PathBuf;

use image::RgbImage;
use thiserror::Error;
use tracing::info;

use crate::{
  model::DetectResult,
  output::{Render, draw::Draw},
};

pub struct SaveImageFileOutput {
  path: PathBuf,
  draw: Draw,
}

#[derive(Error, Debug)]
pub enum SaveImageFileError {
  #[error("无法创建目录 {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("无法写入图像 {path}: {source}")]
  Encode {
    path: PathBuf,
    #[source]
    source: image::ImageError,
  },
}

impl SaveImageFileOutput {
  /// 图像格式由扩展名决定
  pub fn new(path: impl Into<PathBuf>, draw: Draw) -> Self {
    Self {
      path: path.into(),
      draw,
    }
  }

  fn save_image(&self, image: &RgbImage) -> Result<(), SaveImageFileError> {
    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent).map_err(|source| SaveImageFileError::Io {
        path: parent.to_path_buf(),
        source,
      })?;
    }

    image
      .save(&self.path)
      .map_err(|source| SaveImageFileError::Encode {
        path: self.path.clone(),
        source,
      })?;

    info!("保存图像到文件: {}", self.path.display());

    Ok(())
  }
}

impl Render<RgbImage, DetectResult> for SaveImageFileOutput {
  type Error = SaveImageFileError;

  fn render_result(
    &mut self,
    frame: &mut RgbImage,
    result: &DetectResult,
  ) -> Result<(), Self::Error> {
    self.draw.draw_detections_on_image(frame, result);
    self.save_image(frame)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::Rgb;

  #[test]
  fn writes_jpeg_and_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("result.jpg");
    let mut output = SaveImageFileOutput::new(&path, Draw::default());
    let mut frame = RgbImage::from_pixel(16, 12, Rgb([200, 10, 10]));

    output
      .render_result(&mut frame, &DetectResult::default())
      .unwrap();

    let written = image::open(&path).unwrap();
    assert_eq!((written.width(), written.height()), (16, 12));
  }

  #[test]
  fn unwritable_destination_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let mut output = SaveImageFileOutput::new(blocker.join("result.jpg"), Draw::default());
    let mut frame = RgbImage::new(2, 2);
    let result = output.render_result(&mut frame, &DetectResult::default());
    assert!(matches!(result, Err(SaveImageFileError::Io { .. })));
  }

  #[test]
  fn unsupported_extension_fails_to_encode() {
    let dir = tempfile::tempdir().unwrap();
    let mut output = SaveImageFileOutput::new(dir.path().join("result.unknown"), Draw::default());
    let mut frame = RgbImage::new(2, 2);
    let result = output.render_result(&mut frame, &DetectResult::default());
    assert!(matches!(result, Err(SaveImageFileError::Encode { .. })));
  }
}
