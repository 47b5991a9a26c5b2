// 该文件是 Tanjing （探镜） 项目的一部分。
// src/logging.rs - 日志初始化
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

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";

/// 初始化日志输出
///
/// 日志写入标准错误，标准输出只保留检测结果。
/// 过滤级别由 `RUST_LOG` 控制，未设置时为 warn。
pub fn setup_logging() {
  let env_filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

  // 重复初始化（如测试中）时忽略错误
  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .try_init();
}
