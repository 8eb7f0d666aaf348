//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! 矩阵与旋转参数之间的互斥/依赖关系不在这里声明，
//! 而是解析后由 `transform::TransformRequest::into_mode` 校验。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/`

use crate::transform::TransformRequest;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// VASP POSCAR format
    Poscar,
    /// CASTEP .cell format
    Cell,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Poscar => write!(f, "poscar"),
            OutputFormat::Cell => write!(f, "cell"),
        }
    }
}

/// xtal-transform - 晶格变换工具
#[derive(Parser, Debug)]
#[command(name = "xtal-transform")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Transform a crystal structure's lattice by a 3x3 matrix or an axis-angle rotation",
    long_about = None
)]
pub struct Cli {
    /// Path to the input structure (POSCAR/CONTCAR, .vasp or .cell)
    #[arg(short, long, value_name = "PATH")]
    pub structure: PathBuf,

    /// Path to write the transformed structure to (default: print to screen)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// File containing a 3x3 transformation matrix (9 numbers, row by row)
    #[arg(short, long, value_name = "PATH")]
    pub matrix: Option<PathBuf>,

    /// Rotation axis, need not be normalized
    #[arg(
        short,
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        action = clap::ArgAction::Set
    )]
    pub axis: Option<Vec<f64>>,

    /// Rotation angle in degrees
    #[arg(short = 'r', long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub angle: Option<f64>,

    /// Also print to screen when writing to a file (y/n)
    #[arg(
        short,
        long,
        value_name = "y|n",
        default_value = "n",
        value_parser = parse_yes_no,
        action = clap::ArgAction::Set
    )]
    pub print: bool,

    /// Output structure format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Poscar)]
    pub format: OutputFormat,

    /// Print lattice parameters before and after the transform
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

impl Cli {
    /// 提取变换相关参数
    pub fn transform_request(&self) -> TransformRequest {
        TransformRequest {
            matrix: self.matrix.clone(),
            axis: self.axis.as_deref().and_then(|v| <[f64; 3]>::try_from(v).ok()),
            angle: self.angle,
        }
    }
}

/// 解析 y/n：大小写不敏感，只看首字母
pub fn parse_yes_no(s: &str) -> Result<bool, String> {
    match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('y') => Ok(true),
        Some('n') => Ok(false),
        _ => Err(format!("expected 'y' or 'n', got '{}'", s)),
    }
}
