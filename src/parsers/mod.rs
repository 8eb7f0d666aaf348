//! # 结构文件读写模块
//!
//! 根据文件名推断格式并解析，或将结构序列化为指定格式。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `router` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, cell

pub mod cell;
pub mod poscar;

use crate::cli::OutputFormat;
use crate::error::{Result, XformError};
use crate::models::Crystal;
use std::path::Path;

/// 从文件路径推断格式并解析
///
/// 无法识别的文件名会先按 POSCAR 尝试解析。
pub fn parse_structure_file(path: &Path) -> Result<Crystal> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "cell" => cell::parse_cell_file(path),
        "vasp" | "poscar" => poscar::parse_poscar_file(path),
        _ => {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
                return poscar::parse_poscar_file(path);
            }
            match poscar::parse_poscar_file(path) {
                Ok(crystal) => Ok(crystal),
                Err(XformError::ParseError { .. }) => Err(XformError::UnsupportedFormat(format!(
                    "Cannot determine format for: {}",
                    path.display()
                ))),
                Err(e) => Err(e),
            }
        }
    }
}

/// 将结构序列化为指定格式的文本
pub fn to_structure_string(crystal: &Crystal, format: OutputFormat) -> String {
    match format {
        OutputFormat::Poscar => poscar::to_poscar_string(crystal),
        OutputFormat::Cell => cell::to_cell_string(crystal),
    }
}
