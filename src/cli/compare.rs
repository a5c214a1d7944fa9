//! # compare 子命令 CLI 定义
//!
//! Mie 模型与 Ulbrich-Atlas 经验公式的消光系数对比图
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/compare.rs`

use clap::Args;
use std::path::PathBuf;

/// compare 子命令参数
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Precipitation mode (run `mieplot modes` for the list)
    #[arg(short, long, default_value = "snow_1958")]
    pub mode: String,

    /// Number of rain-rate sweep points
    #[arg(short = 'n', long, default_value_t = 100)]
    pub points: usize,

    /// Lower bound of the rain-rate sweep (mm/hr)
    #[arg(long, default_value_t = 1.0)]
    pub rr_min: f64,

    /// Upper bound of the rain-rate sweep (mm/hr)
    #[arg(long, default_value_t = 50.0)]
    pub rr_max: f64,

    /// Directory for the output figure (<output-dir>/<mode>.png)
    #[arg(short, long, default_value = "imgs")]
    pub output_dir: PathBuf,

    /// Create the output directory if it does not exist
    #[arg(long, default_value_t = false)]
    pub create_dir: bool,

    /// Laser wavelength in nm
    #[arg(short, long, default_value_t = 905.0)]
    pub wavelength: f64,

    /// Real part of the particle refractive index
    #[arg(long, default_value_t = 1.328)]
    pub m_real: f64,

    /// Imaginary part of the particle refractive index
    #[arg(long, default_value_t = 0.0)]
    pub m_imag: f64,

    /// Number of diameter grid points (log-spaced over 1e-4..10 mm)
    #[arg(long, default_value_t = 500)]
    pub d_points: usize,

    /// Figure resolution in dots per inch (6x6 inch figure)
    #[arg(long, default_value_t = 300)]
    pub dpi: u32,

    /// Also write the rain-rate sweep to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Also write the diameter/extinction-efficiency table to this CSV file
    #[arg(long)]
    pub efficiency_csv: Option<PathBuf>,

    /// Number of parallel jobs for the Mie table and rain-rate sweep (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
