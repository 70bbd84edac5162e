//! # qcalc - 简易量子化学计算前端
//!
//! 从 SMILES 或 XYZ 文件出发，选择计算类型、方法与基组，
//! 调用外部 Psi4 完成计算并在终端展示结果。
//!
//! ## 子命令
//! - `calc`  - 执行一次计算 (energy / optimize / frequency / orbitals)
//! - `embed` - 仅将 SMILES 转换为三维 XYZ 结构
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── handler.rs (请求处理流程)
//!   │     ├── engine/    (外部程序: RDKit / Open Babel / Psi4)
//!   │     ├── parsers/   (格式解析器)
//!   │     ├── models/    (数据模型)
//!   │     └── vib/       (振动频率导出与绘图)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod engine;
mod error;
mod handler;
mod models;
mod parsers;
mod utils;
mod vib;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
