// 该文件是 Tanjing （探镜） 项目的一部分。
// src/main.rs - 项目主程序
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

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, error::ErrorKind};
use tracing::info;

use tanjing::{
  DetectError, args::Args, config::DetectConfig, logging::setup_logging, task::run_detection,
};

fn main() -> ExitCode {
  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      let _ = err.print();
      return ExitCode::SUCCESS;
    }
    Err(err) => {
      // 参数数量错误：用法写入标准错误，退出码 1
      eprintln!("{}", DetectError::from(err));
      return ExitCode::FAILURE;
    }
  };

  setup_logging();

  match run(&args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("错误: {}", err);
      if let Some(cause) = err.chain().nth(1) {
        eprintln!("原因: {}", cause);
      }
      ExitCode::FAILURE
    }
  }
}

fn run(args: &Args) -> Result<()> {
  let config = DetectConfig::from_env();

  info!("模型文件路径: {}", args.model.display());
  info!("输入图像: {}", args.image.display());
  info!("置信度阈值: {}", config.confidence_threshold);

  let result = run_detection(&args.model, &args.image, &config)
    .with_context(|| format!("无法完成对 {} 的检测", args.image.display()))?;

  info!(
    "检测到 {} 个对象，结果已写入 {}",
    result.len(),
    config.output_path.display()
  );

  Ok(())
}
