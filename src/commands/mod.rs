//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `handler.rs`, `engine/`, `utils/`
//! - 子模块: calc, embed

pub mod calc;
pub mod embed;

use crate::cli::embed::EmbedderArgs;
use crate::cli::{Commands, EmbedderKind};
use crate::engine::{Embedder, ObabelEmbedder, RdkitEmbedder};
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Calc(args) => calc::execute(args),
        Commands::Embed(args) => embed::execute(args),
    }
}

/// 根据命令行选项构造嵌入程序
pub(crate) fn build_embedder(args: &EmbedderArgs) -> Box<dyn Embedder> {
    match args.embedder {
        EmbedderKind::Rdkit => Box::new(RdkitEmbedder::new(args.python.as_str())),
        EmbedderKind::Obabel => Box::new(ObabelEmbedder::new(args.obabel.as_str())),
    }
}
