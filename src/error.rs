// 该文件是 Tanjing （探镜） 项目的一部分。
// src/error.rs - 顶层错误定义
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

use thiserror::Error;

use crate::{
  frame::PreprocessError,
  input::ImageFileInputError,
  model::{ClassIndexError, InferenceError, ModelLoadError},
  output::SaveImageFileError,
};

/// 一次检测流程中所有可能的失败，均为终止性错误
#[derive(Error, Debug)]
pub enum DetectError {
  #[error("参数错误: {0}")]
  Argument(#[from] clap::Error),
  #[error("图像加载错误: {0}")]
  Load(#[from] ImageFileInputError),
  #[error("预处理错误: {0}")]
  Preprocess(#[from] PreprocessError),
  #[error("模型加载错误: {0}")]
  ModelLoad(#[from] ModelLoadError),
  #[error("推理错误: {0}")]
  Inference(#[from] InferenceError),
  #[error("类别索引错误: {0}")]
  ClassIndex(#[from] ClassIndexError),
  #[error("没有可用的输入帧")]
  NoInput,
  #[error("检测结果输出错误: {0}")]
  Report(#[from] std::io::Error),
  #[error("图像写入错误: {0}")]
  Write(#[from] SaveImageFileError),
}
