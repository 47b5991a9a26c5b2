// 该文件是 Tanjing （探镜） 项目的一部分。
// src/args.rs - 项目参数配置
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

use clap::Parser;

/// Tanjing 单图目标检测
///
/// 检测结果逐行输出到标准输出，标注后的图像写入当前目录下的 result.jpg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// ONNX 模型文件路径
  #[arg(value_name = "MODEL")]
  pub model: PathBuf,

  /// 输入图像文件路径
  #[arg(value_name = "IMAGE")]
  pub image: PathBuf,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_exactly_two_positionals() {
    let args = Args::try_parse_from(["tanjing", "model.onnx", "photo.jpg"]).unwrap();
    assert_eq!(args.model, PathBuf::from("model.onnx"));
    assert_eq!(args.image, PathBuf::from("photo.jpg"));
  }

  #[test]
  fn rejects_wrong_arity() {
    assert!(Args::try_parse_from(["tanjing"]).is_err());
    assert!(Args::try_parse_from(["tanjing", "model.onnx"]).is_err());
    assert!(Args::try_parse_from(["tanjing", "model.onnx", "a.jpg", "b.jpg"]).is_err());
  }
}
