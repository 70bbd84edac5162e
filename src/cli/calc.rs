//! # calc 子命令 CLI 定义
//!
//! 结构输入二选一：`--smiles` 或 `--xyz`。
//! 计算参数：计算类型、方法、基组。
//! 其余选项控制外部程序路径、内存、工作目录及输出文件名，可由环境变量提供。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/calc.rs`

use super::embed::EmbedderArgs;
use crate::models::{Basis, CalcType, Method};

use clap::{ArgGroup, Args};
use regex::Regex;
use std::path::PathBuf;

/// calc 子命令参数
#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("structure")
        .required(true)
        .args(["smiles", "xyz"]),
))]
pub struct CalcArgs {
    // ─────────────────────────────────────────────────────────────
    // 结构输入
    // ─────────────────────────────────────────────────────────────
    /// SMILES string of the molecule
    #[arg(long)]
    pub smiles: Option<String>,

    /// Structure file in XYZ format (.xyz)
    #[arg(long)]
    pub xyz: Option<PathBuf>,

    // ─────────────────────────────────────────────────────────────
    // 计算参数
    // ─────────────────────────────────────────────────────────────
    /// Type of calculation
    #[arg(long, value_enum)]
    pub calc_type: CalcType,

    /// Electronic structure method
    #[arg(long, value_enum)]
    pub method: Method,

    /// Basis set
    #[arg(long, value_enum)]
    pub basis: Basis,

    // ─────────────────────────────────────────────────────────────
    // 外部程序与资源
    // ─────────────────────────────────────────────────────────────
    /// Psi4 executable
    #[arg(long, env = "QCALC_PSI4", default_value = "psi4")]
    pub psi4: String,

    #[command(flatten)]
    pub tools: EmbedderArgs,

    /// Memory limit passed to Psi4 (e.g. 10GB, 500MB, 2GiB)
    #[arg(long, env = "QCALC_MEMORY", default_value = "10GB", value_parser = parse_memory)]
    pub memory: String,

    /// Working directory for Psi4 input, logs and output files
    #[arg(long, env = "QCALC_WORKDIR", default_value = ".")]
    pub workdir: PathBuf,

    // ─────────────────────────────────────────────────────────────
    // 输出文件
    // ─────────────────────────────────────────────────────────────
    /// Psi4 log file for energy, optimize and frequency runs
    #[arg(long, default_value = "psi4_output.dat")]
    pub output_file: String,

    /// Psi4 log file for orbital runs
    #[arg(long, default_value = "fchk.log")]
    pub orbital_log: String,

    /// Orbital checkpoint file written by orbital runs
    #[arg(long, default_value = "MO.fchk")]
    pub fchk: String,

    /// File name of the structure download for optimize runs
    #[arg(long, default_value = "optimized_struture.xyz")]
    pub download: String,

    /// Download the optimized geometry instead of the input geometry
    #[arg(long, default_value_t = false)]
    pub download_optimized: bool,

    /// Export frequencies to CSV (frequency runs only)
    #[arg(long)]
    pub freq_csv: Option<PathBuf>,

    /// Save a frequency stick plot (PNG, or SVG for .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 1200)]
    pub plot_width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 600)]
    pub plot_height: u32,

    /// Write the Psi4 input without running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

/// 解析内存设置，例如 `10GB`, `500 mb`, `2GiB`
pub fn parse_memory(input: &str) -> Result<String, String> {
    let re = Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*(b|kb|mb|gb|tb|kib|mib|gib|tib)$").unwrap();
    let trimmed = input.trim();

    let caps = re.captures(trimmed).ok_or_else(|| {
        format!(
            "Invalid memory '{}'. Expected a number followed by a unit (e.g. 10GB, 500MB)",
            input
        )
    })?;

    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| format!("Invalid memory amount '{}'", &caps[1]))?;
    if amount <= 0.0 {
        return Err(format!("Memory must be positive, got '{}'", input));
    }

    Ok(format!("{}{}", &caps[1], &caps[2]))
}
