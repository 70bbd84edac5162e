//! # 计算请求数据模型
//!
//! 输入结构的选择、计算类型、方法与基组。
//!
//! ## 依赖关系
//! - 被 `cli/calc.rs` 用作 clap 取值枚举
//! - 被 `handler.rs` 与 `engine/` 使用

use clap::ValueEnum;
use std::path::PathBuf;

/// 输入结构来源（每次运行只有一个生效）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    /// SMILES 字符串
    Smiles(String),
    /// 上传的 .xyz 文件原始字节
    XyzFile { path: PathBuf, bytes: Vec<u8> },
}

impl InputSelection {
    pub fn mode(&self) -> &'static str {
        match self {
            InputSelection::Smiles(_) => "SMILES",
            InputSelection::XyzFile { .. } => "XYZ file",
        }
    }
}

/// 量子化学方法
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Method {
    /// Hartree-Fock
    Hf,
    /// Second-order Møller-Plesset perturbation theory
    Mp2,
    /// B3LYP hybrid density functional
    B3lyp,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Hf => write!(f, "hf"),
            Method::Mp2 => write!(f, "mp2"),
            Method::B3lyp => write!(f, "b3lyp"),
        }
    }
}

/// 基组
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Basis {
    #[value(name = "3-21g")]
    Pople321g,
    #[value(name = "6-31g")]
    Pople631g,
    #[value(name = "6-31g(d)")]
    Pople631gd,
    #[value(name = "sto-3g")]
    Sto3g,
    #[value(name = "cc-pvdz")]
    CcPvdz,
    #[value(name = "cc-pvtz")]
    CcPvtz,
    #[value(name = "aug-cc-pvtz")]
    AugCcPvtz,
}

impl std::fmt::Display for Basis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Basis::Pople321g => "3-21g",
            Basis::Pople631g => "6-31g",
            Basis::Pople631gd => "6-31g(d)",
            Basis::Sto3g => "sto-3g",
            Basis::CcPvdz => "cc-pvdz",
            Basis::CcPvtz => "cc-pvtz",
            Basis::AugCcPvtz => "aug-cc-pvtz",
        };
        write!(f, "{}", name)
    }
}

/// 计算类型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CalcType {
    /// Single-point energy
    Energy,
    /// Geometry optimization
    Optimize,
    /// Optimization followed by harmonic vibrational frequencies
    Frequency,
    /// Optimization followed by a formatted checkpoint export of the orbitals
    Orbitals,
}

impl std::fmt::Display for CalcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcType::Energy => write!(f, "energy"),
            CalcType::Optimize => write!(f, "optimize"),
            CalcType::Frequency => write!(f, "frequency"),
            CalcType::Orbitals => write!(f, "orbitals"),
        }
    }
}

/// 一次计算请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcRequest {
    pub method: Method,
    pub basis: Basis,
    pub calc_type: CalcType,
}

impl CalcRequest {
    pub fn new(calc_type: CalcType, method: Method, basis: Basis) -> Self {
        CalcRequest {
            method,
            basis,
            calc_type,
        }
    }

    /// 求解器使用的 "method/basis" 描述串，例如 `hf/sto-3g`
    pub fn level_of_theory(&self) -> String {
        format!("{}/{}", self.method, self.basis)
    }
}
