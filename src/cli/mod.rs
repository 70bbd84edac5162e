//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `calc`: 量子化学计算（energy / optimize / frequency / orbitals）
//! - `embed`: 只执行 SMILES → XYZ 结构生成
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: calc, embed

pub mod calc;
pub mod embed;

use clap::{Parser, Subcommand, ValueEnum};

/// qcalc - 小分子量子化学计算工具
#[derive(Parser)]
#[command(name = "qcalc")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Run small-molecule quantum chemistry calculations with Psi4", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Run an energy, optimization, frequency or orbital calculation
    Calc(calc::CalcArgs),

    /// Generate a 3D structure (XYZ) from a SMILES string
    Embed(embed::EmbedArgs),
}

/// SMILES 嵌入程序
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum EmbedderKind {
    /// RDKit via Python
    Rdkit,
    /// Open Babel
    Obabel,
}

impl std::fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedderKind::Rdkit => write!(f, "rdkit"),
            EmbedderKind::Obabel => write!(f, "obabel"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Basis, CalcType, Method};
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calc_with_smiles() {
        let cli = Cli::try_parse_from([
            "qcalc",
            "calc",
            "--smiles",
            "CCO",
            "--calc-type",
            "frequency",
            "--method",
            "mp2",
            "--basis",
            "6-31g(d)",
        ])
        .unwrap();

        match cli.command {
            Commands::Calc(args) => {
                assert_eq!(args.smiles.as_deref(), Some("CCO"));
                assert_eq!(args.calc_type, CalcType::Frequency);
                assert_eq!(args.method, Method::Mp2);
                assert_eq!(args.basis, Basis::Pople631gd);
            }
            _ => panic!("expected calc"),
        }
    }

    #[test]
    fn test_smiles_and_xyz_are_exclusive() {
        let both = Cli::try_parse_from([
            "qcalc", "calc", "--smiles", "C", "--xyz", "a.xyz", "--calc-type", "energy",
            "--method", "hf", "--basis", "sto-3g",
        ]);
        assert!(both.is_err());

        let neither = Cli::try_parse_from([
            "qcalc", "calc", "--calc-type", "energy", "--method", "hf", "--basis", "sto-3g",
        ]);
        assert!(neither.is_err());
    }

    #[test]
    fn test_unknown_basis_rejected() {
        let result = Cli::try_parse_from([
            "qcalc", "calc", "--smiles", "C", "--calc-type", "energy", "--method", "hf",
            "--basis", "def2-svp",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_embed() {
        let cli = Cli::try_parse_from(["qcalc", "embed", "--smiles", "c1ccccc1", "-o", "b.xyz"])
            .unwrap();
        match cli.command {
            Commands::Embed(args) => {
                assert_eq!(args.smiles, "c1ccccc1");
                assert_eq!(args.output.unwrap().to_str(), Some("b.xyz"));
            }
            _ => panic!("expected embed"),
        }
    }
}
