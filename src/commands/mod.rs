//! # 命令执行模块
//!
//! 串起整个流程：
//! 校验输入 -> 确定变换模式 -> 读取结构 -> 构造矩阵 -> 变换晶格 -> 输出。
//!
//! 所有致命错误都在写出之前检测，因此不会留下半截输出文件。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `transform/`, `router`, `utils/`

use crate::cli::Cli;
use crate::error::{Result, XformError};
use crate::parsers;
use crate::router::{self, OutputTarget};
use crate::transform::{self, Mode};
use crate::utils::{output, summary};

use std::fs::File;
use std::io::{self, Write};

/// 执行命令，结构输出到 stdout
pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// 执行命令，结构输出到给定的 `screen`
pub fn execute<W: Write>(cli: &Cli, screen: &mut W) -> Result<()> {
    output::print_header("Lattice Transformation");

    // 结构文件必须存在且可读
    if !cli.structure.is_file() || File::open(&cli.structure).is_err() {
        return Err(XformError::MissingRequiredInput {
            path: cli.structure.display().to_string(),
        });
    }

    let mode = cli.transform_request().into_mode()?;

    let crystal = parsers::parse_structure_file(&cli.structure)?;
    output::print_info(&format!(
        "Read '{}' ({}, {} atoms) from {} file '{}'",
        crystal.name,
        crystal.formula(),
        crystal.atoms.len(),
        crystal.source_format.as_deref().unwrap_or("structure"),
        cli.structure.display()
    ));

    let matrix = transform::resolve(&mode)?;
    match &mode {
        Mode::Matrix(path) => output::print_info(&format!(
            "Applying matrix from '{}' (det = {:.6})",
            path.display(),
            matrix.determinant()
        )),
        Mode::Rotation(spec) => output::print_info(&format!(
            "Rotating by {}° about axis ({}, {}, {})",
            spec.degrees, spec.axis.x, spec.axis.y, spec.axis.z
        )),
        Mode::NoneRequested => output::print_warning(
            "No transformation requested (use --matrix or --axis/--angle); structure is left unchanged",
        ),
    }

    let transformed = transform::apply(&crystal, &matrix);

    if cli.summary {
        eprintln!("{}", summary::lattice_table(&crystal.lattice, &transformed.lattice));
    }

    let target = OutputTarget::from_args(cli.output.clone(), cli.print);
    router::route(&transformed, &target, cli.format, screen)
}
