//! # 消光模型
//!
//! 定义绘图流程所需的模型接口 `ExtinctionModel`，并提供基于
//! Mie 理论 + 指数粒子谱的实现 `MieModel`。
//!
//! ## 接口
//! - `diameters()` / `qext()`: 预先计算好的直径网格与消光效率
//! - `nd_identifier()`: 粒子谱标识符（用于图例标题）
//! - `nd(D, R)`: 给定降水率下的粒子谱
//! - `alpha(Nd)`: 体消光系数 (m⁻¹)
//! - `beta(Nd)`: 体后向散射系数 (m⁻¹ sr⁻¹)
//!
//! ## 依赖关系
//! - 被 `mie/sweep.rs` 和 `commands/compare.rs` 使用
//! - 使用 `mie/scattering.rs` 计算效率表
//! - 使用 `mie/distribution.rs` 计算粒子谱
//! - 使用 `rayon` 并行计算效率表

use crate::error::{MieplotError, Result};
use crate::mie::distribution::{DsdFamily, Mode};
use crate::mie::scattering;
use crate::utils::progress;

use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// 绘图流程依赖的模型能力
pub trait ExtinctionModel {
    /// 直径网格 (mm)
    fn diameters(&self) -> &[f64];

    /// 与直径网格逐点对应的消光效率
    fn qext(&self) -> &[f64];

    /// 粒子谱标识符
    fn nd_identifier(&self) -> &str;

    /// 粒子谱 (m⁻³ mm⁻¹)
    fn nd(&self, d: &[f64], rain_rate: f64) -> Vec<f64>;

    /// 体消光系数 (m⁻¹)
    fn alpha(&self, nd: &[f64]) -> f64;

    /// 体后向散射系数 (m⁻¹ sr⁻¹)
    fn beta(&self, nd: &[f64]) -> f64;
}

/// Mie 模型配置
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub mode: Mode,
    /// 激光波长 (nm)
    pub wavelength_nm: f64,
    /// 粒子相对折射率
    pub refractive_index: Complex64,
    /// 直径网格下限 (mm)
    pub d_min: f64,
    /// 直径网格上限 (mm)
    pub d_max: f64,
    /// 直径网格点数（对数均匀）
    pub d_points: usize,
    /// 并行线程数（0 = 自动）
    pub jobs: usize,
    /// 是否显示进度条
    pub show_progress: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            mode: Mode::Snow1958,
            wavelength_nm: 905.0,
            refractive_index: Complex64::new(1.328, 0.0),
            d_min: 1e-4,
            d_max: 10.0,
            d_points: 500,
            jobs: 0,
            show_progress: true,
        }
    }
}

impl ModelConfig {
    /// 检查配置合法性
    pub fn validate(&self) -> Result<()> {
        if !(self.wavelength_nm > 0.0) {
            return Err(MieplotError::InvalidArgument(format!(
                "wavelength must be positive, got {} nm",
                self.wavelength_nm
            )));
        }
        if !(self.d_min > 0.0) || !(self.d_max > self.d_min) {
            return Err(MieplotError::InvalidArgument(format!(
                "diameter range must satisfy 0 < d_min < d_max, got {}..{} mm",
                self.d_min, self.d_max
            )));
        }
        if self.d_points < 2 {
            return Err(MieplotError::InvalidArgument(format!(
                "diameter grid needs at least 2 points, got {}",
                self.d_points
            )));
        }
        Ok(())
    }
}

/// Mie 理论 + 指数粒子谱模型
#[derive(Debug, Clone)]
pub struct MieModel {
    family: DsdFamily,
    d: Vec<f64>,
    qext: Vec<f64>,
    qback: Vec<f64>,
}

impl MieModel {
    /// 构建模型并计算效率表
    pub fn new(config: &ModelConfig) -> Result<Self> {
        config.validate()?;

        let d = logspace(config.d_min.log10(), config.d_max.log10(), config.d_points);
        let pool = build_pool(config.jobs)?;

        let pb = if config.show_progress {
            Some(progress::create_progress_bar(d.len() as u64, "Mie table"))
        } else {
            None
        };

        let m = config.refractive_index;
        let wavelength = config.wavelength_nm;
        let table: Vec<scattering::MieEfficiencies> = pool.install(|| {
            d.par_iter()
                .map(|&diameter| {
                    let x = scattering::size_parameter(diameter, wavelength);
                    let q = scattering::mie_efficiencies(m, x);
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                    q
                })
                .collect()
        });

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(MieModel {
            family: config.mode.family(),
            qext: table.iter().map(|q| q.qext).collect(),
            qback: table.iter().map(|q| q.qback).collect(),
            d,
        })
    }
}

impl ExtinctionModel for MieModel {
    fn diameters(&self) -> &[f64] {
        &self.d
    }

    fn qext(&self) -> &[f64] {
        &self.qext
    }

    fn nd_identifier(&self) -> &str {
        self.family.identifier()
    }

    fn nd(&self, d: &[f64], rain_rate: f64) -> Vec<f64> {
        d.iter()
            .map(|&diameter| self.family.evaluate(diameter, rain_rate))
            .collect()
    }

    fn alpha(&self, nd: &[f64]) -> f64 {
        // D² (mm²) · N (m⁻³ mm⁻¹) · dD (mm) → 1e-6 m⁻¹
        let integrand: Vec<f64> = self
            .d
            .iter()
            .zip(&self.qext)
            .zip(nd)
            .map(|((d, q), n)| d * d * q * n)
            .collect();
        1e-6 * PI / 4.0 * trapezoid(&integrand, &self.d)
    }

    fn beta(&self, nd: &[f64]) -> f64 {
        // σ_b / 4π = Q_back · πD²/4 / 4π
        let integrand: Vec<f64> = self
            .d
            .iter()
            .zip(&self.qback)
            .zip(nd)
            .map(|((d, q), n)| d * d * q * n)
            .collect();
        1e-6 / 16.0 * trapezoid(&integrand, &self.d)
    }
}

/// 构建限定线程数的 rayon 线程池（0 = CPU 核数）
pub(crate) fn build_pool(jobs: usize) -> Result<rayon::ThreadPool> {
    let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| MieplotError::Other(format!("Failed to build thread pool: {}", e)))
}

/// 线性均匀网格，首尾严格等于端点
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// 对数均匀网格 10^start ... 10^stop
pub fn logspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    linspace(start, stop, n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// 非均匀网格上的梯形积分
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    y.windows(2)
        .zip(x.windows(2))
        .map(|(yw, xw)| 0.5 * (yw[0] + yw[1]) * (xw[1] - xw[0]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config(mode: Mode) -> ModelConfig {
        ModelConfig {
            mode,
            d_min: 1e-3,
            d_max: 0.5,
            d_points: 60,
            jobs: 2,
            show_progress: false,
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(1.0, 50.0, 100);
        assert_eq!(v.len(), 100);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[99], 50.0);
        let step = 49.0 / 99.0;
        for w in v.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-12);
        }
    }

    #[test]
    fn test_logspace() {
        let v = logspace(-4.0, 1.0, 6);
        let expected = [1e-4, 1e-3, 1e-2, 1e-1, 1.0, 10.0];
        for (a, b) in v.iter().zip(expected) {
            assert!(((a - b) / b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_build_pool_thread_count() {
        assert_eq!(build_pool(3).unwrap().current_num_threads(), 3);
        assert_eq!(build_pool(0).unwrap().current_num_threads(), num_cpus::get());
    }

    #[test]
    fn test_trapezoid() {
        let x = linspace(0.0, 1.0, 1001);
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        assert!((trapezoid(&y, &x) - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(trapezoid(&[1.0], &[0.0]), 0.0);
    }

    #[test]
    fn test_invalid_config() {
        let config = ModelConfig {
            d_min: 2.0,
            d_max: 1.0,
            ..small_config(Mode::Rain)
        };
        assert!(matches!(
            MieModel::new(&config),
            Err(MieplotError::InvalidArgument(_))
        ));

        let config = ModelConfig {
            wavelength_nm: 0.0,
            ..small_config(Mode::Rain)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_alignment_for_all_modes() {
        for mode in Mode::ALL {
            let model = MieModel::new(&small_config(mode)).unwrap();
            assert_eq!(model.diameters().len(), model.qext().len());
            assert_eq!(model.diameters().len(), model.qback.len());
            let nd = model.nd(model.diameters(), 10.0);
            assert_eq!(nd.len(), model.diameters().len());
            assert_eq!(model.nd_identifier(), mode.family().identifier());
        }
    }

    #[test]
    fn test_alpha_increases_with_rain_rate() {
        let model = MieModel::new(&small_config(Mode::Rain)).unwrap();
        let d = model.diameters().to_vec();
        let a10 = model.alpha(&model.nd(&d, 10.0));
        let a50 = model.alpha(&model.nd(&d, 50.0));
        assert!(a10 > 0.0);
        assert!(a50 > a10);
        assert!(model.beta(&model.nd(&d, 10.0)) > 0.0);
    }
}
