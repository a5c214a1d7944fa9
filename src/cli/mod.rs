//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `compare`: 生成 Mie 模型 vs 经验公式对比图
//! - `modes`: 列出支持的降水模式
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: compare

pub mod compare;

use clap::{Parser, Subcommand};

/// mieplot - Mie 理论降水消光对比图
#[derive(Parser)]
#[command(name = "mieplot")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Mie-theory vs empirical rain extinction comparison plots", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Render the Mie vs Ulbrich-Atlas extinction comparison figure
    Compare(compare::CompareArgs),

    /// List supported precipitation modes and their size distributions
    Modes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_defaults() {
        let cli = Cli::try_parse_from(["mieplot", "compare"]).unwrap();
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.mode, "snow_1958");
                assert_eq!(args.points, 100);
                assert_eq!(args.rr_min, 1.0);
                assert_eq!(args.rr_max, 50.0);
                assert_eq!(args.output_dir.to_str(), Some("imgs"));
                assert_eq!(args.dpi, 300);
                assert!(args.csv.is_none());
            }
            Commands::Modes => panic!("expected compare"),
        }
    }

    #[test]
    fn test_compare_overrides() {
        let cli = Cli::try_parse_from([
            "mieplot", "compare", "--mode", "rain", "-n", "20", "--csv", "out.csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.mode, "rain");
                assert_eq!(args.points, 20);
                assert_eq!(args.csv.unwrap().to_str(), Some("out.csv"));
            }
            Commands::Modes => panic!("expected compare"),
        }
    }
}
