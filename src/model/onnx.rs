// 该文件是 Tanjing （探镜） 项目的一部分。
// src/model/onnx.rs - ONNX Runtime 推理后端
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

use ort::{
  session::{Session, builder::GraphOptimizationLevel},
  value::Tensor,
};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{FromPath, frame::NchwTensor, model::InferenceBackend};

const ONNX_NUM_INPUTS: usize = 1;
const ONNX_NUM_OUTPUTS: usize = 1;
const SESSION_INTRA_THREADS: usize = 1;

#[derive(Error, Debug)]
pub enum ModelLoadError {
  #[error("无法读取模型文件 {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("ONNX Runtime 无法创建会话: {0}")]
  Runtime(#[source] ort::Error),
  #[error("模型接口不符合约定: {0}")]
  Contract(String),
}

#[derive(Error, Debug)]
pub enum InferenceError {
  /// 包括运行时拒绝与模型声明不符的输入形状
  #[error("ONNX Runtime 推理失败: {0}")]
  Runtime(#[source] ort::Error),
  #[error("模型输出长度 {len} 不是 6 的整数倍")]
  MalformedOutput { len: usize },
}

/// 单输入、单输出的 ONNX 检测模型
pub struct OnnxModel {
  session: Session,
  input_name: String,
  output_name: String,
}

impl FromPath for OnnxModel {
  type Error = ModelLoadError;

  fn from_path(path: &Path) -> Result<Self, Self::Error> {
    Self::load(path)
  }
}

impl OnnxModel {
  pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
    info!("加载模型文件: {}", path.display());
    let model_data = std::fs::read(path).map_err(|source| ModelLoadError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(
      "模型文件大小: {:.2} MB",
      model_data.len() as f64 / (1024.0 * 1024.0)
    );

    info!("创建 ONNX Runtime 推理会话");
    let session = build_session(&model_data).map_err(|e| {
      error!("创建推理会话失败: {}", e);
      ModelLoadError::Runtime(e)
    })?;

    let num_inputs = session.inputs.len();
    let num_outputs = session.outputs.len();
    debug!("模型输入数量: {}", num_inputs);
    debug!("模型输出数量: {}", num_outputs);

    if num_inputs != ONNX_NUM_INPUTS {
      error!("预期模型输入数量为 {}, 实际为 {}", ONNX_NUM_INPUTS, num_inputs);
      return Err(ModelLoadError::Contract(format!(
        "预期模型输入数量为 {}, 实际为 {}",
        ONNX_NUM_INPUTS, num_inputs
      )));
    }

    if num_outputs != ONNX_NUM_OUTPUTS {
      error!("预期模型输出数量为 {}, 实际为 {}", ONNX_NUM_OUTPUTS, num_outputs);
      return Err(ModelLoadError::Contract(format!(
        "预期模型输出数量为 {}, 实际为 {}",
        ONNX_NUM_OUTPUTS, num_outputs
      )));
    }

    let input_name = session.inputs[0].name.clone();
    let output_name = session.outputs[0].name.clone();
    info!("模型加载完成，输入 '{}'，输出 '{}'", input_name, output_name);

    Ok(Self {
      session,
      input_name,
      output_name,
    })
  }
}

impl InferenceBackend for OnnxModel {
  /// 执行一次同步前向推理
  fn run(&mut self, input: &NchwTensor) -> Result<Vec<f32>, InferenceError> {
    let shape = input.shape();
    debug!("执行模型推理，输入形状 {:?}", shape);
    let (output_shape, output) = forward(
      &mut self.session,
      &self.input_name,
      &self.output_name,
      shape,
      input.as_ref().to_vec(),
    )
    .map_err(|e| {
      error!("模型推理失败: {}", e);
      InferenceError::Runtime(e)
    })?;
    debug!("模型输出形状 {:?}", output_shape);

    Ok(output)
  }
}

fn build_session(model_data: &[u8]) -> Result<Session, ort::Error> {
  let session = Session::builder()?
    .with_optimization_level(GraphOptimizationLevel::Level1)?
    .with_intra_threads(SESSION_INTRA_THREADS)?
    .commit_from_memory(model_data)?;
  Ok(session)
}

fn forward(
  session: &mut Session,
  input_name: &str,
  output_name: &str,
  shape: [usize; 4],
  data: Vec<f32>,
) -> Result<(Vec<i64>, Vec<f32>), ort::Error> {
  let input = Tensor::from_array((shape, data))?;
  let outputs = session.run(ort::inputs![input_name => input])?;
  let (output_shape, output) = outputs[output_name].try_extract_tensor::<f32>()?;
  Ok((output_shape.iter().copied().collect(), output.to_vec()))
}
