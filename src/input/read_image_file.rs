// 该文件是 Tanjing （探镜） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use image::{ImageReader, RgbImage};
use thiserror::Error;
use tracing::{debug, error};

use crate::FromPath;

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("无法读取图像文件 {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("无法解码图像文件 {path}: {source}")]
  Decode {
    path: PathBuf,
    #[source]
    source: image::ImageError,
  },
}

/// 单张图像输入，迭代时仅产出一帧
pub struct ImageFileInput {
  image: Option<RgbImage>,
}

impl FromPath for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    let reader = ImageReader::open(path)
      .and_then(|reader| reader.with_guessed_format())
      .map_err(|source| {
        error!("读取图像失败: {}", path.display());
        ImageFileInputError::Io {
          path: path.to_path_buf(),
          source,
        }
      })?;

    let image = reader.decode().map_err(|source| {
      error!("解码图像失败: {}", path.display());
      ImageFileInputError::Decode {
        path: path.to_path_buf(),
        source,
      }
    })?;

    debug!(
      "图像已加载: {} ({}x{}, {:?})",
      path.display(),
      image.width(),
      image.height(),
      image.color()
    );

    Ok(ImageFileInput {
      image: Some(image.into_rgb8()),
    })
  }
}

impl Iterator for ImageFileInput {
  type Item = RgbImage;

  fn next(&mut self) -> Option<Self::Item> {
    self.image.take()
  }
}
