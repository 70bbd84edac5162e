//! # embed 子命令 CLI 定义
//!
//! 嵌入程序选项同时被 `calc` 子命令复用（flatten）。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/calc.rs` 使用
//! - 参数传递给 `commands/embed.rs`

use super::EmbedderKind;
use clap::Args;
use std::path::PathBuf;

/// 嵌入程序相关选项
#[derive(Args, Debug, Clone)]
pub struct EmbedderArgs {
    /// Program used to turn SMILES into 3D coordinates
    #[arg(long, value_enum, env = "QCALC_EMBEDDER", default_value = "rdkit")]
    pub embedder: EmbedderKind,

    /// Python interpreter with RDKit installed
    #[arg(long, env = "QCALC_PYTHON", default_value = "python3")]
    pub python: String,

    /// Open Babel executable
    #[arg(long, env = "QCALC_OBABEL", default_value = "obabel")]
    pub obabel: String,
}

/// embed 子命令参数
#[derive(Args, Debug)]
pub struct EmbedArgs {
    /// SMILES string of the molecule
    #[arg(long)]
    pub smiles: String,

    /// Output .xyz file (prints to stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    #[command(flatten)]
    pub tools: EmbedderArgs,
}
