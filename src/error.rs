//! # 统一错误处理模块
//!
//! 定义 qcalc 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qcalc 统一错误类型
#[derive(Error, Debug)]
pub enum QcalcError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 结构输入错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} content: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Structure file is not valid UTF-8: {path}")]
    InvalidEncoding { path: String },

    #[error("Structure contains no atoms: {0}")]
    EmptyStructure(String),

    #[error("Invalid SMILES '{smiles}': {reason}")]
    InvalidSmiles { smiles: String, reason: String },

    #[error("Failed to embed 3D coordinates for '{smiles}': {reason}")]
    EmbeddingFailed { smiles: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 量子化学求解器错误
    // ─────────────────────────────────────────────────────────────
    #[error("{level} did not converge (see {log})\n{message}")]
    SolverNotConverged {
        level: String,
        log: String,
        message: String,
    },

    #[error("{level} calculation failed (see {log})\n{message}")]
    SolverFailed {
        level: String,
        log: String,
        message: String,
    },

    #[error("Solver finished without reporting {0}")]
    MissingResult(String),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, QcalcError>;
