// 该文件是 Tanjing （探镜） 项目的一部分。
// src/model/postprocess.rs - 检测结果解码与坐标映射
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

use tracing::{debug, error};

use crate::{
  error::DetectError,
  model::{BBox, CocoLabel, DetectItem, DetectResult, InferenceError},
};

/// 每条原始检测记录的长度：left, top, right, bottom, score, class
pub const RECORD_STRIDE: usize = 6;

/// 将模型输出解码为原图坐标下的检测结果
///
/// `model_size` 与 `original_size` 均为 (宽, 高)。保留 `score >= threshold`
/// 的记录，顺序与原始输出一致，不做非极大值抑制。
///
/// 坐标按 `coord * 原图尺寸 / 模型尺寸` 线性缩放，前提是预处理为直接缩放；
/// 对使用 letterbox 导出的模型，结果会有偏差。
pub fn decode_detections(
  raw: &[f32],
  threshold: f32,
  model_size: (u32, u32),
  original_size: (u32, u32),
) -> Result<DetectResult, DetectError> {
  if raw.len() % RECORD_STRIDE != 0 {
    error!("模型输出长度 {} 不是 {} 的整数倍", raw.len(), RECORD_STRIDE);
    return Err(InferenceError::MalformedOutput { len: raw.len() }.into());
  }

  let (model_w, model_h) = model_size;
  let (orig_w, orig_h) = original_size;
  let scale_x = |v: f32| rescale(v, orig_w, model_w);
  let scale_y = |v: f32| rescale(v, orig_h, model_h);

  let mut items = Vec::new();
  // 长度已校验，余下部分为空
  let (records, _) = raw.as_chunks::<RECORD_STRIDE>();
  for &[left, top, right, bottom, score, class] in records {
    if score.is_nan() || score < threshold {
      continue;
    }

    let kind = CocoLabel::from_raw(class)?;
    let bbox = BBox {
      x: scale_x(left),
      y: scale_y(top),
      width: scale_x(right - left),
      height: scale_y(bottom - top),
    };
    items.push(DetectItem { kind, score, bbox });
  }

  debug!(
    "原始记录 {} 条，阈值 {} 过滤后剩余 {} 条",
    raw.len() / RECORD_STRIDE,
    threshold,
    items.len()
  );

  Ok(items.into())
}

fn rescale(value: f32, original: u32, model: u32) -> i32 {
  (value * original as f32 / model as f32) as i32
}
