// 该文件是 Tanjing （探镜） 项目的一部分。
// src/output/console.rs - 检测结果文本输出
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

use std::io::{self, Write};

use image::RgbImage;

use crate::{
  model::{DetectItem, DetectResult, WithLabel},
  output::Render,
};

/// 每个检测结果输出一行，供人阅读，不保证格式稳定
pub struct ConsoleOutput<W> {
  writer: W,
}

impl ConsoleOutput<io::Stdout> {
  pub fn stdout() -> Self {
    Self::new(io::stdout())
  }
}

impl<W: Write> ConsoleOutput<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }

  pub fn into_inner(self) -> W {
    self.writer
  }

  fn write_item(&mut self, item: &DetectItem) -> io::Result<()> {
    let bbox = &item.bbox;
    writeln!(
      self.writer,
      "Class ID: {} Confidence: {} BBox: [{}, {}, {}, {}] Class Name: {}",
      item.kind.to_label_id(),
      item.score,
      bbox.x,
      bbox.y,
      bbox.width,
      bbox.height,
      item.kind.to_label_str()
    )
  }
}

impl<W: Write> Render<RgbImage, DetectResult> for ConsoleOutput<W> {
  type Error = io::Error;

  fn render_result(&mut self, _frame: &mut RgbImage, result: &DetectResult) -> io::Result<()> {
    for item in result.iter() {
      self.write_item(item)?;
    }
    self.writer.flush()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{BBox, DetectItem};

  #[test]
  fn prints_one_line_per_detection() {
    let result = DetectResult::from(vec![
      DetectItem::new(
        0,
        0.92,
        BBox {
          x: 640,
          y: 202,
          width: 640,
          height: 202,
        },
      )
      .unwrap(),
      DetectItem::new(
        16,
        0.5,
        BBox {
          x: 1,
          y: 2,
          width: 3,
          height: 4,
        },
      )
      .unwrap(),
    ]);

    let mut output = ConsoleOutput::new(Vec::new());
    let mut frame = RgbImage::new(1, 1);
    output.render_result(&mut frame, &result).unwrap();

    let text = String::from_utf8(output.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
      lines,
      vec![
        "Class ID: 0 Confidence: 0.92 BBox: [640, 202, 640, 202] Class Name: person",
        "Class ID: 16 Confidence: 0.5 BBox: [1, 2, 3, 4] Class Name: dog",
      ]
    );
  }

  #[test]
  fn prints_nothing_for_empty_result() {
    let mut output = ConsoleOutput::new(Vec::new());
    let mut frame = RgbImage::new(1, 1);
    output
      .render_result(&mut frame, &DetectResult::default())
      .unwrap();
    assert!(output.into_inner().is_empty());
  }
}
