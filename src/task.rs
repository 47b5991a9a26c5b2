// 该文件是 Tanjing （探镜） 项目的一部分。
// src/task.rs - 检测任务
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

use std::path::Path;

use tracing::{info, warn};

use crate::{
  FromPath,
  config::DetectConfig,
  error::DetectError,
  input::ImageFileInput,
  model::{DetectResult, Detector, Model, OnnxModel},
  output::{
    ConsoleOutput, Render, SaveImageFileOutput,
    draw::{Draw, LabelFont},
  },
};

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 取一帧、推理一次、输出一次
pub struct OneShotTask;

impl<F, D, I, M, O> Task<I, M, O> for OneShotTask
where
  I: Iterator<Item = F>,
  M: Model<Input = F, Output = D>,
  O: Render<F, D>,
  DetectError: From<M::Error> + From<O::Error>,
{
  type Output = D;
  type Error = DetectError;

  fn run_task(self, mut input: I, mut model: M, mut output: O) -> Result<D, DetectError> {
    info!("开始任务...");
    let mut frame = input.next().ok_or(DetectError::NoInput)?;
    info!("输入帧获取成功，开始推理...");

    let now = std::time::Instant::now();
    let result = model.infer(&frame)?;
    info!("推理完成，耗时: {:.2?}", now.elapsed());

    let now = std::time::Instant::now();
    output.render_result(&mut frame, &result)?;
    info!("渲染完成，耗时: {:.2?}", now.elapsed());

    Ok(result)
  }
}

/// 按配置加载模型与图像，完成一次检测并写出结果
pub fn run_detection(
  model_path: &Path,
  image_path: &Path,
  config: &DetectConfig,
) -> Result<DetectResult, DetectError> {
  let model = Detector::new(OnnxModel::from_path(model_path)?, config);
  let input = ImageFileInput::from_path(image_path)?;

  let output = (
    ConsoleOutput::stdout(),
    SaveImageFileOutput::new(&config.output_path, Draw::new(label_font(config))),
  );

  OneShotTask.run_task(input, model, output)
}

// 字体只影响标注外观，加载失败时退回内置字体
fn label_font(config: &DetectConfig) -> LabelFont {
  let Some(path) = &config.label_font else {
    return LabelFont::Mono;
  };

  match LabelFont::from_path(path) {
    Ok(font) => {
      info!("使用标签字体: {}", path.display());
      font
    }
    Err(e) => {
      warn!("{}，改用内置字体", e);
      LabelFont::Mono
    }
  }
}
