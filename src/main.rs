//! # mieplot - Mie 理论降水消光对比图
//!
//! 计算降水粒子的 Mie 消光系数随降水率的变化，并与
//! Ulbrich-Atlas 经验公式对比，输出三面板图像。
//!
//! ## 子命令
//! - `compare` - 生成对比图 `<output_dir>/<mode>.png`
//! - `modes`   - 列出支持的降水模式
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── mie/  (散射、粒子谱、扫描、绘图、导出)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod error;
mod mie;
mod utils;

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
