//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `mie/`, `utils/`
//! - 子模块: compare, modes

pub mod compare;
pub mod modes;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Compare(args) => compare::execute(args),
        Commands::Modes => modes::execute(),
    }
}
