// 该文件是 Tanjing （探镜） 项目的一部分。
// src/model/label.rs - COCO 类别表
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

use std::fmt;

use thiserror::Error;

use super::WithLabel;

pub const COCO_CLASS_NUM: usize = 80;

/// COCO 数据集类别名称
pub const COCO_CLASSES: [&str; COCO_CLASS_NUM] = [
  "person",
  "bicycle",
  "car",
  "motorcycle",
  "airplane",
  "bus",
  "train",
  "truck",
  "boat",
  "traffic light",
  "fire hydrant",
  "stop sign",
  "parking meter",
  "bench",
  "bird",
  "cat",
  "dog",
  "horse",
  "sheep",
  "cow",
  "elephant",
  "bear",
  "zebra",
  "giraffe",
  "backpack",
  "umbrella",
  "handbag",
  "tie",
  "suitcase",
  "frisbee",
  "skis",
  "snowboard",
  "sports ball",
  "kite",
  "baseball bat",
  "baseball glove",
  "skateboard",
  "surfboard",
  "tennis racket",
  "bottle",
  "wine glass",
  "cup",
  "fork",
  "knife",
  "spoon",
  "bowl",
  "banana",
  "apple",
  "sandwich",
  "orange",
  "broccoli",
  "carrot",
  "hot dog",
  "pizza",
  "donut",
  "cake",
  "chair",
  "couch",
  "potted plant",
  "bed",
  "dining table",
  "toilet",
  "tv",
  "laptop",
  "mouse",
  "remote",
  "keyboard",
  "cell phone",
  "microwave",
  "oven",
  "toaster",
  "sink",
  "refrigerator",
  "book",
  "clock",
  "vase",
  "scissors",
  "teddy bear",
  "hair drier",
  "toothbrush",
];

/// 模型给出的类别编号不在类别表内，说明模型与类别表不匹配
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("类别编号 {raw} 超出类别表范围 [0, 80)")]
pub struct ClassIndexError {
  pub raw: f32,
}

/// 经过范围校验的 COCO 类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CocoLabel(usize);

impl CocoLabel {
  /// 由模型输出的浮点类别编号构造，小数部分向零截断
  pub fn from_raw(raw: f32) -> Result<Self, ClassIndexError> {
    let id = raw.trunc();
    // NaN 不满足任何比较，同样视为越界
    if id >= 0.0 && id < COCO_CLASS_NUM as f32 {
      Ok(Self(id as usize))
    } else {
      Err(ClassIndexError { raw })
    }
  }
}

impl TryFrom<usize> for CocoLabel {
  type Error = ClassIndexError;

  fn try_from(id: usize) -> Result<Self, Self::Error> {
    if id < COCO_CLASS_NUM {
      Ok(Self(id))
    } else {
      Err(ClassIndexError { raw: id as f32 })
    }
  }
}

impl WithLabel for CocoLabel {
  fn to_label_str(&self) -> &'static str {
    COCO_CLASSES[self.0]
  }

  fn to_label_id(&self) -> usize {
    self.0
  }

  fn from_label_id(id: usize) -> Result<Self, ClassIndexError> {
    Self::try_from(id)
  }
}

impl fmt::Display for CocoLabel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.to_label_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_has_80_ordered_entries() {
    assert_eq!(COCO_CLASSES.len(), 80);
    assert_eq!(COCO_CLASSES[0], "person");
    assert_eq!(COCO_CLASSES[2], "car");
    assert_eq!(COCO_CLASSES[79], "toothbrush");
  }

  #[test]
  fn raw_ids_truncate_toward_zero() {
    assert_eq!(CocoLabel::from_raw(0.0).unwrap().to_label_id(), 0);
    assert_eq!(CocoLabel::from_raw(2.9).unwrap().to_label_str(), "car");
    assert_eq!(CocoLabel::from_raw(79.99).unwrap().to_label_id(), 79);
    assert_eq!(CocoLabel::from_raw(-0.5).unwrap().to_label_id(), 0);
  }

  #[test]
  fn out_of_range_ids_fail() {
    assert!(CocoLabel::from_raw(80.0).is_err());
    assert!(CocoLabel::from_raw(-1.0).is_err());
    assert!(CocoLabel::from_raw(f32::NAN).is_err());
    assert!(CocoLabel::from_raw(f32::INFINITY).is_err());
    assert_eq!(CocoLabel::from_label_id(80), Err(ClassIndexError { raw: 80.0 }));
  }

  #[test]
  fn displays_class_name() {
    let label = CocoLabel::from_label_id(9).unwrap();
    assert_eq!(label.to_string(), "traffic light");
  }
}
