// 该文件是 Tanjing （探镜） 项目的一部分。
// src/config.rs - 运行配置
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

use std::{env, path::PathBuf};

use crate::frame::ChannelOrder;

/// 模型输入宽度（像素）
pub const MODEL_INPUT_W: u32 = 640;
/// 模型输入高度（像素）
pub const MODEL_INPUT_H: u32 = 640;
/// 默认置信度阈值
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;
/// 结果图像文件名，写入当前工作目录
pub const OUTPUT_FILE: &str = "result.jpg";

const LABEL_FONT_ENV: &str = "TANJING_LABEL_FONT";

#[derive(Debug, Clone)]
pub struct DetectConfig {
  /// 模型输入尺寸 (宽, 高)
  pub input_size: (u32, u32),
  pub confidence_threshold: f32,
  pub channel_order: ChannelOrder,
  pub output_path: PathBuf,
  /// 标签使用的 TrueType 字体，为空时使用内置点阵字体
  pub label_font: Option<PathBuf>,
}

impl Default for DetectConfig {
  fn default() -> Self {
    Self {
      input_size: (MODEL_INPUT_W, MODEL_INPUT_H),
      confidence_threshold: CONFIDENCE_THRESHOLD,
      channel_order: ChannelOrder::Rgb,
      output_path: PathBuf::from(OUTPUT_FILE),
      label_font: None,
    }
  }
}

impl DetectConfig {
  /// 在固定策略的基础上读取环境变量
  ///
  /// 仅标签字体可由 `TANJING_LABEL_FONT` 指定；阈值与输出路径不对外开放。
  pub fn from_env() -> Self {
    let label_font = env::var_os(LABEL_FONT_ENV)
      .filter(|value| !value.is_empty())
      .map(PathBuf::from);

    Self {
      label_font,
      ..Self::default()
    }
  }
}
