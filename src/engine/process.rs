//! # 外部命令执行
//!
//! 启动外部程序（python / obabel / psi4），收集 stdout 与 stderr。
//!
//! ## 依赖关系
//! - 被 `engine/embed.rs`, `engine/psi4.rs` 使用
//! - 无外部模块依赖

use crate::error::{QcalcError, Result};

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// 外部命令的执行结果
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// stderr 最后若干行，用于错误信息
    pub fn stderr_tail(&self, lines: usize) -> String {
        let all: Vec<&str> = self.stderr.lines().filter(|l| !l.trim().is_empty()).collect();
        let start = all.len().saturating_sub(lines);
        all[start..].join("\n")
    }
}

/// 运行外部命令并等待结束
pub fn run_command(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<CommandOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => QcalcError::CommandNotFound {
            command: program.to_string(),
        },
        _ => QcalcError::CommandFailed {
            command: program.to_string(),
            stderr: e.to_string(),
        },
    })?;

    let output = child
        .wait_with_output()
        .map_err(|e| QcalcError::CommandFailed {
            command: program.to_string(),
            stderr: e.to_string(),
        })?;

    Ok(CommandOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
