// 该文件是 Tanjing （探镜） 项目的一部分。
// src/model/detector.rs - 目标检测器
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

use image::RgbImage;
use tracing::debug;

use crate::{
  config::DetectConfig,
  error::DetectError,
  frame::{ChannelOrder, NchwTensor},
  model::{DetectResult, InferenceBackend, Model, decode_detections},
};

/// 预处理、推理、后处理串联成的检测器
pub struct Detector<B> {
  backend: B,
  /// 模型输入尺寸 (宽, 高)
  input_size: (u32, u32),
  confidence_threshold: f32,
  channel_order: ChannelOrder,
}

impl<B: InferenceBackend> Detector<B> {
  pub fn new(backend: B, config: &DetectConfig) -> Self {
    Self {
      backend,
      input_size: config.input_size,
      confidence_threshold: config.confidence_threshold,
      channel_order: config.channel_order,
    }
  }
}

impl<B: InferenceBackend> Model for Detector<B> {
  type Input = RgbImage;
  type Output = DetectResult;
  type Error = DetectError;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    let (width, height) = self.input_size;
    let tensor = NchwTensor::from_image(input, width, height, self.channel_order)?;

    let raw = self.backend.run(&tensor)?;
    debug!("原始输出长度: {}", raw.len());

    decode_detections(
      &raw,
      self.confidence_threshold,
      self.input_size,
      input.dimensions(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{BBox, InferenceError, WithLabel};
  use image::Rgb;

  /// 记录收到的张量形状并返回固定输出
  struct FixedBackend {
    raw: Vec<f32>,
    seen_shape: Option<[usize; 4]>,
  }

  impl InferenceBackend for FixedBackend {
    fn run(&mut self, input: &NchwTensor) -> Result<Vec<f32>, InferenceError> {
      self.seen_shape = Some(input.shape());
      Ok(self.raw.clone())
    }
  }

  fn detector(raw: Vec<f32>) -> Detector<FixedBackend> {
    Detector::new(
      FixedBackend {
        raw,
        seen_shape: None,
      },
      &DetectConfig::default(),
    )
  }

  #[test]
  fn infers_in_original_coordinates() {
    let mut detector = detector(vec![320.0, 180.0, 640.0, 360.0, 0.92, 0.0]);
    let image = RgbImage::from_pixel(1280, 720, Rgb([90, 90, 90]));

    let result = detector.infer(&image).unwrap();
    assert_eq!(detector.backend.seen_shape, Some([1, 3, 640, 640]));
    assert_eq!(result.len(), 1);
    assert_eq!(result.items[0].kind.to_label_str(), "person");
    assert_eq!(
      result.items[0].bbox,
      BBox {
        x: 640,
        y: 202,
        width: 640,
        height: 202
      }
    );
  }

  #[test]
  fn backend_errors_propagate_as_inference_errors() {
    struct FailingBackend;
    impl InferenceBackend for FailingBackend {
      fn run(&mut self, input: &NchwTensor) -> Result<Vec<f32>, InferenceError> {
        Err(InferenceError::MalformedOutput {
          len: input.as_ref().len() + 1,
        })
      }
    }

    let mut detector = Detector::new(FailingBackend, &DetectConfig::default());
    let image = RgbImage::new(4, 4);
    assert!(matches!(
      detector.infer(&image),
      Err(DetectError::Inference(InferenceError::MalformedOutput { .. }))
    ));
  }

  #[test]
  fn empty_image_is_preprocess_error() {
    let mut detector = detector(Vec::new());
    let image = RgbImage::new(0, 0);
    assert!(matches!(
      detector.infer(&image),
      Err(DetectError::Preprocess(_))
    ));
  }
}
