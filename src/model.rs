// 该文件是 Tanjing （探镜） 项目的一部分。
// src/model.rs - 模型
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

use crate::frame::NchwTensor;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 推理后端：输入一个 NCHW 张量，返回扁平的原始输出
pub trait InferenceBackend {
  fn run(&mut self, input: &NchwTensor) -> Result<Vec<f32>, InferenceError>;
}

/// 原图像素坐标下的边界框
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

#[derive(Debug, Clone)]
pub struct DetectItem {
  pub kind: CocoLabel,
  pub score: f32,
  pub bbox: BBox,
}

impl DetectItem {
  pub fn new(class_id: usize, score: f32, bbox: BBox) -> Result<Self, ClassIndexError> {
    Ok(Self {
      kind: CocoLabel::try_from(class_id)?,
      score,
      bbox,
    })
  }
}

#[derive(Debug, Clone, Default)]
pub struct DetectResult {
  pub items: Box<[DetectItem]>,
}

impl DetectResult {
  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, DetectItem> {
    self.items.iter()
  }
}

impl From<Vec<DetectItem>> for DetectResult {
  fn from(items: Vec<DetectItem>) -> Self {
    Self {
      items: items.into_boxed_slice(),
    }
  }
}

pub trait WithLabel: Sized + std::fmt::Debug {
  fn to_label_str(&self) -> &'static str;
  fn to_label_id(&self) -> usize;
  fn from_label_id(id: usize) -> Result<Self, ClassIndexError>;
}

mod detector;
mod label;
mod onnx;
mod postprocess;

pub use self::detector::Detector;
pub use self::label::{COCO_CLASS_NUM, COCO_CLASSES, ClassIndexError, CocoLabel};
pub use self::onnx::{InferenceError, ModelLoadError, OnnxModel};
pub use self::postprocess::{RECORD_STRIDE, decode_detections};

#[cfg(test)]
mod tests {
  use super::*;

  fn bbox() -> BBox {
    BBox {
      x: 1,
      y: 2,
      width: 3,
      height: 4,
    }
  }

  #[test]
  fn detect_item_accepts_last_class() {
    let item = DetectItem::new(79, 0.7, bbox()).unwrap();
    assert_eq!(item.kind.to_label_id(), 79);
    assert_eq!(item.kind.to_label_str(), "toothbrush");
  }

  #[test]
  fn detect_item_rejects_class_80() {
    let err = DetectItem::new(80, 0.7, bbox()).unwrap_err();
    assert_eq!(err.raw, 80.0);
  }
}
