//! # modes 命令实现
//!
//! 以表格形式列出支持的降水模式及其粒子谱参数。
//!
//! ## 依赖关系
//! - 使用 `mie/distribution.rs` 的 Mode
//! - 使用 `mie/sweep.rs` 生成图例标题
//! - 使用 `utils/output.rs`

use crate::error::Result;
use crate::mie::sweep::derive_title;
use crate::mie::Mode;
use crate::utils::output;

use tabled::{Table, Tabled};

/// 模式表格行
#[derive(Debug, Clone, Tabled)]
struct ModeRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Distribution")]
    identifier: String,
    #[tabled(rename = "Label")]
    title: String,
    #[tabled(rename = "N0 (m⁻³ mm⁻¹)")]
    n0: String,
    #[tabled(rename = "Λ (mm⁻¹)")]
    lambda: String,
}

/// 执行 modes 命令
pub fn execute() -> Result<()> {
    output::print_header("Supported Precipitation Modes");

    let table = Table::new(mode_rows());
    println!("{}", table);

    output::print_info("N(D) = N0 · exp(-Λ · D), R = rain rate in mm/hr");
    Ok(())
}

fn mode_rows() -> Vec<ModeRow> {
    Mode::ALL
        .iter()
        .map(|m| {
            let family = m.family();
            let (n0, lambda) = family.formula();
            ModeRow {
                mode: m.name().to_string(),
                identifier: family.identifier().to_string(),
                title: derive_title(family.identifier()),
                n0,
                lambda,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_rows() {
        let rows = mode_rows();
        assert_eq!(rows.len(), Mode::ALL.len());

        let snow = rows.iter().find(|r| r.mode == "snow_1958").unwrap();
        assert_eq!(snow.identifier, "gunn_marshall_Nd");
        assert_eq!(snow.title, "Gunn-Marshall");
        assert_eq!(snow.n0, "3800 R^-0.87");

        let rain = rows.iter().find(|r| r.mode == "rain").unwrap();
        assert_eq!(rain.title, "Marshall-Palmer");
        assert_eq!(rain.n0, "8000");
    }
}
