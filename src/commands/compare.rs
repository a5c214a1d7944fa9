//! # compare 命令实现
//!
//! 生成 Mie 模型与 Ulbrich-Atlas 经验公式的消光系数对比图。
//!
//! ## 功能
//! - 构建 Mie 效率表（rayon 并行）
//! - 降水率扫描，计算 alpha / beta / k1 / k2
//! - 三面板对比图输出到 `<output_dir>/<mode>.png`
//! - 可选导出扫描结果和效率表 (CSV)
//!
//! ## 依赖关系
//! - 使用 `cli/compare.rs` 定义的参数
//! - 使用 `mie/` 模块进行计算、绘图与导出
//! - 使用 `utils/output.rs`

use crate::cli::compare::CompareArgs;
use crate::error::{MieplotError, Result};
use crate::mie::plot::{self, FigureConfig};
use crate::mie::sweep::{derive_title, run_sweep};
use crate::mie::{
    export, ComparisonData, ExtinctionModel, MieModel, Mode, ModelConfig, SweepConfig,
};
use crate::utils::output;

use num_complex::Complex64;
use std::fs;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 对比图流程配置
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub mode: Mode,
    /// 输出目录，图像写入 `<output_dir>/<mode>.png`
    pub output_dir: PathBuf,
    /// 输出目录不存在时是否创建
    pub create_dir: bool,
    pub sweep: SweepConfig,
    pub figure: FigureConfig,
    pub sweep_csv: Option<PathBuf>,
    pub efficiency_csv: Option<PathBuf>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            mode: Mode::Snow1958,
            output_dir: PathBuf::from("imgs"),
            create_dir: false,
            sweep: SweepConfig::default(),
            figure: FigureConfig::default(),
            sweep_csv: None,
            efficiency_csv: None,
        }
    }
}

impl ComparisonConfig {
    /// 图像输出路径
    pub fn figure_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.png", self.mode))
    }
}

/// 对比图流程结果
#[derive(Debug)]
pub struct ComparisonOutcome {
    pub figure_path: PathBuf,
    /// 图例中的模型标题
    pub title: String,
    pub data: ComparisonData,
}

/// 摘要表格行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Rr (mm/hr)")]
    rain_rate: String,
    #[tabled(rename = "alpha (1/m)")]
    alpha: String,
    #[tabled(rename = "beta (1/m/sr)")]
    beta: String,
    #[tabled(rename = "Ulbrich-Atlas (dB/km)")]
    k1: String,
    #[tabled(rename = "Mie (dB/km)")]
    k2: String,
}

/// 执行 compare 命令
pub fn execute(args: CompareArgs) -> Result<()> {
    output::print_header("Mie vs Ulbrich-Atlas Extinction Comparison");

    // 模式必须在任何计算与写文件之前确定
    let mode: Mode = args.mode.parse()?;

    let config = ComparisonConfig {
        mode,
        output_dir: args.output_dir.clone(),
        create_dir: args.create_dir,
        sweep: SweepConfig {
            points: args.points,
            rr_min: args.rr_min,
            rr_max: args.rr_max,
            jobs: args.jobs,
        },
        figure: FigureConfig {
            dpi: args.dpi,
            ..FigureConfig::default()
        },
        sweep_csv: args.csv.clone(),
        efficiency_csv: args.efficiency_csv.clone(),
    };
    config.sweep.validate()?;
    prepare_output_dir(&config)?;

    if config.figure_path().exists() {
        output::print_warning(&format!(
            "Overwriting existing '{}'",
            config.figure_path().display()
        ));
    }

    let model_config = ModelConfig {
        mode,
        wavelength_nm: args.wavelength,
        refractive_index: Complex64::new(args.m_real, args.m_imag),
        d_points: args.d_points,
        jobs: args.jobs,
        ..ModelConfig::default()
    };

    output::print_info(&format!("Mode: {} ({})", mode, mode.family().identifier()));
    output::print_info(&format!(
        "λ = {} nm, m = {} + {}i, {} diameters",
        model_config.wavelength_nm,
        model_config.refractive_index.re,
        model_config.refractive_index.im,
        model_config.d_points
    ));

    let model = MieModel::new(&model_config)?;
    output::print_success(&format!(
        "Mie table computed for {} diameters",
        model.diameters().len()
    ));

    let outcome = run_comparison(&model, &config)?;

    print_summary_table(&outcome.data, 10);

    output::print_success(&format!(
        "Figure saved to '{}'",
        outcome.figure_path.display()
    ));
    if let Some(path) = &config.sweep_csv {
        output::print_success(&format!("Sweep data saved to '{}'", path.display()));
    }
    if let Some(path) = &config.efficiency_csv {
        output::print_success(&format!(
            "Efficiency table saved to '{}'",
            path.display()
        ));
    }

    Ok(())
}

/// 对任意消光模型执行扫描、绘图与导出
pub fn run_comparison<M>(model: &M, config: &ComparisonConfig) -> Result<ComparisonOutcome>
where
    M: ExtinctionModel + Sync,
{
    prepare_output_dir(config)?;

    let title = derive_title(model.nd_identifier());
    let data = run_sweep(model, &config.sweep)?;

    let figure_path = config.figure_path();
    plot::render_comparison(&data, &title, &figure_path, &config.figure)?;

    if let Some(path) = &config.sweep_csv {
        export::sweep_to_csv(&data, path)?;
    }
    if let Some(path) = &config.efficiency_csv {
        export::efficiency_to_csv(&data.diameters, &data.qext, path)?;
    }

    Ok(ComparisonOutcome {
        figure_path,
        title,
        data,
    })
}

/// 检查输出目录，必要时创建
fn prepare_output_dir(config: &ComparisonConfig) -> Result<()> {
    if config.output_dir.is_dir() {
        return Ok(());
    }

    if config.create_dir && !config.output_dir.exists() {
        fs::create_dir_all(&config.output_dir).map_err(|e| MieplotError::FileWriteError {
            path: config.output_dir.display().to_string(),
            source: e,
        })?;
        return Ok(());
    }

    Err(MieplotError::DirectoryNotFound {
        path: config.output_dir.display().to_string(),
    })
}

/// 打印扫描摘要表格（约 `rows` 行）
fn print_summary_table(data: &ComparisonData, rows: usize) {
    let n = data.rain_rate.len();
    if n == 0 {
        return;
    }
    let step = (n / rows.max(1)).max(1);

    let mut indices: Vec<usize> = (0..n).step_by(step).collect();
    if indices.last() != Some(&(n - 1)) {
        indices.push(n - 1);
    }

    let table_rows: Vec<SummaryRow> = indices
        .into_iter()
        .map(|i| SummaryRow {
            rain_rate: format!("{:.2}", data.rain_rate[i]),
            alpha: format!("{:.4e}", data.alpha[i]),
            beta: format!("{:.4e}", data.beta[i]),
            k1: format!("{:.3}", data.k1[i]),
            k2: format!("{:.3}", data.k2[i]),
        })
        .collect();

    output::print_header("Extinction Coefficient Sweep");
    let table = Table::new(&table_rows);
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mie::sweep::tests::StubModel;

    fn small_figure() -> FigureConfig {
        FigureConfig {
            dpi: 60,
            ..FigureConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_with_stub_model() {
        let dir = tempfile::tempdir().unwrap();
        let imgs = dir.path().join("imgs");
        fs::create_dir(&imgs).unwrap();

        let config = ComparisonConfig {
            output_dir: imgs.clone(),
            figure: small_figure(),
            sweep_csv: Some(dir.path().join("sweep.csv")),
            ..ComparisonConfig::default()
        };

        let outcome = run_comparison(&StubModel::new(), &config).unwrap();

        assert_eq!(outcome.figure_path, imgs.join("snow_1958.png"));
        assert_eq!(outcome.title, "Gunn-Marshall");
        let meta = fs::metadata(&outcome.figure_path).unwrap();
        assert!(meta.len() > 0);
        assert!(dir.path().join("sweep.csv").exists());
    }

    #[test]
    fn test_missing_output_dir_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ComparisonConfig {
            output_dir: dir.path().join("missing"),
            figure: small_figure(),
            ..ComparisonConfig::default()
        };

        let result = run_comparison(&StubModel::new(), &config);
        assert!(matches!(
            result,
            Err(MieplotError::DirectoryNotFound { .. })
        ));
        assert!(!config.figure_path().exists());
    }

    #[test]
    fn test_create_dir_option() {
        let dir = tempfile::tempdir().unwrap();
        let config = ComparisonConfig {
            output_dir: dir.path().join("nested").join("imgs"),
            create_dir: true,
            ..ComparisonConfig::default()
        };
        prepare_output_dir(&config).unwrap();
        assert!(config.output_dir.is_dir());
    }

    #[test]
    fn test_unsupported_mode_fails_before_any_output() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompareArgs {
            mode: "hail_2001".to_string(),
            points: 100,
            rr_min: 1.0,
            rr_max: 50.0,
            output_dir: dir.path().to_path_buf(),
            create_dir: false,
            wavelength: 905.0,
            m_real: 1.328,
            m_imag: 0.0,
            d_points: 500,
            dpi: 300,
            csv: Some(dir.path().join("sweep.csv")),
            efficiency_csv: None,
            jobs: 0,
        };

        let result = execute(args);
        assert!(matches!(result, Err(MieplotError::UnsupportedMode { .. })));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
