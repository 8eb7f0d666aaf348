//! # 输出路由
//!
//! 决定变换后的结构写到哪里：
//!
//! | 输出路径 | print | 行为 |
//! |---|---|---|
//! | 有 | n | 只写文件 |
//! | 有 | y | 先写文件，再打印到屏幕 |
//! | 无 | 任意 | 打印到屏幕，并提示未给出输出路径 |
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/` 序列化结构，`utils/output.rs` 打印提示

use crate::cli::OutputFormat;
use crate::error::{Result, XformError};
use crate::models::Crystal;
use crate::parsers;
use crate::utils::output;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Screen,
    Both(PathBuf),
}

impl OutputTarget {
    pub fn from_args(output: Option<PathBuf>, print: bool) -> Self {
        match (output, print) {
            (Some(path), false) => OutputTarget::File(path),
            (Some(path), true) => OutputTarget::Both(path),
            (None, _) => OutputTarget::Screen,
        }
    }

    /// 需要写入的文件路径
    pub fn file(&self) -> Option<&Path> {
        match self {
            OutputTarget::File(path) | OutputTarget::Both(path) => Some(path.as_path()),
            OutputTarget::Screen => None,
        }
    }

    pub fn prints_to_screen(&self) -> bool {
        !matches!(self, OutputTarget::File(_))
    }
}

/// 序列化一次，然后按 "文件 -> 屏幕" 的顺序输出
pub fn route<W: Write>(
    crystal: &Crystal,
    target: &OutputTarget,
    format: OutputFormat,
    screen: &mut W,
) -> Result<()> {
    let content = parsers::to_structure_string(crystal, format);

    if let Some(path) = target.file() {
        fs::write(path, &content).map_err(|e| XformError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        output::print_success(&format!("Wrote {} structure to '{}'", format, path.display()));
    }

    if target.prints_to_screen() {
        if *target == OutputTarget::Screen {
            output::print_notice("No output path given (-o), printing structure to screen");
        }
        screen
            .write_all(content.as_bytes())
            .and_then(|_| screen.flush())
            .map_err(|e| XformError::FileWriteError {
                path: "<stdout>".to_string(),
                source: e,
            })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn sample() -> Crystal {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        Crystal::new("Po", lattice, vec![Atom::new("Po", [0.0, 0.0, 0.0])])
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("xtal_transform_router_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_target_from_args() {
        let path = PathBuf::from("out.vasp");
        assert_eq!(
            OutputTarget::from_args(Some(path.clone()), false),
            OutputTarget::File(path.clone())
        );
        assert_eq!(
            OutputTarget::from_args(Some(path.clone()), true),
            OutputTarget::Both(path)
        );
        assert_eq!(OutputTarget::from_args(None, false), OutputTarget::Screen);
        assert_eq!(OutputTarget::from_args(None, true), OutputTarget::Screen);
    }

    #[test]
    fn test_route_screen_only() {
        let mut screen = Vec::new();
        route(&sample(), &OutputTarget::Screen, OutputFormat::Poscar, &mut screen).unwrap();

        let text = String::from_utf8(screen).unwrap();
        assert!(text.starts_with("Po\n1.0\n"));
        assert!(text.contains("Direct"));
    }

    #[test]
    fn test_route_file_only() {
        let path = temp_path("file_only.vasp");
        let mut screen = Vec::new();
        route(
            &sample(),
            &OutputTarget::File(path.clone()),
            OutputFormat::Poscar,
            &mut screen,
        )
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(screen.is_empty());
        assert_eq!(written, parsers::to_structure_string(&sample(), OutputFormat::Poscar));
    }

    #[test]
    fn test_route_both_writes_identical_content() {
        let path = temp_path("both.cell");
        let mut screen = Vec::new();
        route(
            &sample(),
            &OutputTarget::Both(path.clone()),
            OutputFormat::Cell,
            &mut screen,
        )
        .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(written.contains("%BLOCK LATTICE_CART"));
        assert_eq!(written.as_bytes(), screen.as_slice());
    }

    #[test]
    fn test_route_file_error_skips_screen() {
        let path = temp_path("no_such_dir").join("out.vasp");
        let mut screen = Vec::new();
        let err = route(
            &sample(),
            &OutputTarget::Both(path),
            OutputFormat::Poscar,
            &mut screen,
        )
        .unwrap_err();

        assert!(matches!(err, XformError::FileWriteError { .. }));
        assert!(screen.is_empty());
    }
}
