//! # 数据模型模块
//!
//! 定义分子结构、计算请求与计算结果数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `engine/`, `handler.rs` 和 `commands/` 使用
//! - 子模块: molecule, request, outcome

pub mod molecule;
pub mod outcome;
pub mod request;

pub use molecule::{Atom, Molecule};
pub use outcome::{CalcOutcome, Download, SolverOutput, HARTREE_TO_KCAL_MOL};
pub use request::{Basis, CalcRequest, CalcType, InputSelection, Method};
