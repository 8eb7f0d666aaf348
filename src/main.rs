//! # xtal-transform - 晶格变换工具
//!
//! 用显式 3x3 矩阵或轴-角旋转变换晶体结构的晶格，
//! 结果写入文件或打印到屏幕。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (流程编排)
//!   │     ├── parsers/    (POSCAR / .cell 读写)
//!   │     ├── transform/  (构造并施加变换矩阵)
//!   │     ├── router.rs   (输出路由)
//!   │     └── models/     (数据模型)
//!   ├── utils/      (终端输出、晶格对比表)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod router;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
