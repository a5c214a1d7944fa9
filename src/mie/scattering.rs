//! # Mie 散射效率计算
//!
//! 计算均匀球形粒子的消光、散射与后向散射效率。
//!
//! ## 算法概述
//! 1. 向下递推计算对数导数 Dₙ(mx)
//! 2. 向上递推计算 Riccati-Bessel 函数 ψₙ(x), χₙ(x)
//! 3. 求 Mie 系数 aₙ, bₙ 并累加级数
//!
//! ## 公式
//! - Q_ext  = 2/x² Σ (2n+1) Re(aₙ + bₙ)
//! - Q_sca  = 2/x² Σ (2n+1) (|aₙ|² + |bₙ|²)
//! - Q_back = |Σ (2n+1) (-1)ⁿ (aₙ - bₙ)|² / x²
//!
//! ## 参考
//! - Bohren & Huffman, Absorption and Scattering of Light by Small Particles (BHMIE)
//!
//! ## 依赖关系
//! - 被 `mie/model.rs` 调用构建效率表
//! - 使用 `num-complex` 进行复数运算

use num_complex::Complex64;
use std::f64::consts::PI;

/// 单个粒子的 Mie 效率因子
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MieEfficiencies {
    /// 消光效率
    pub qext: f64,
    /// 散射效率
    pub qsca: f64,
    /// 后向散射效率（σ_b = Q_back · πr²）
    pub qback: f64,
}

/// 尺度参数 x = πD/λ
///
/// 直径单位 mm，波长单位 nm。
pub fn size_parameter(diameter_mm: f64, wavelength_nm: f64) -> f64 {
    PI * (diameter_mm * 1e-3) / (wavelength_nm * 1e-9)
}

/// 计算相对折射率为 `m`、尺度参数为 `x` 的球形粒子的效率因子
pub fn mie_efficiencies(m: Complex64, x: f64) -> MieEfficiencies {
    if x <= 0.0 || !x.is_finite() {
        return MieEfficiencies::default();
    }

    let mx = m * x;
    let nstop = (x + 4.0 * x.cbrt() + 2.0) as usize;
    let nmx = (nstop as f64).max(mx.norm()) as usize + 15;

    // 对数导数 Dₙ(mx)，向下递推保证稳定
    let mut d = vec![Complex64::new(0.0, 0.0); nmx + 1];
    for n in (1..=nmx).rev() {
        let en = Complex64::new(n as f64, 0.0) / mx;
        d[n - 1] = en - 1.0 / (d[n] + en);
    }

    // Riccati-Bessel 函数初值
    let mut psi0 = x.cos();
    let mut psi1 = x.sin();
    let mut chi0 = -x.sin();
    let mut chi1 = x.cos();
    let mut xi1 = Complex64::new(psi1, -chi1);

    let mut qext = 0.0;
    let mut qsca = 0.0;
    let mut back = Complex64::new(0.0, 0.0);

    for n in 1..=nstop {
        let nf = n as f64;
        let weight = 2.0 * nf + 1.0;

        let psi = (2.0 * nf - 1.0) * psi1 / x - psi0;
        let chi = (2.0 * nf - 1.0) * chi1 / x - chi0;
        let xi = Complex64::new(psi, -chi);

        let da = d[n] / m + nf / x;
        let db = d[n] * m + nf / x;
        let an = (da * psi - psi1) / (da * xi - xi1);
        let bn = (db * psi - psi1) / (db * xi - xi1);

        qext += weight * (an + bn).re;
        qsca += weight * (an.norm_sqr() + bn.norm_sqr());

        let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
        back += weight * sign * (an - bn);

        psi0 = psi1;
        psi1 = psi;
        chi0 = chi1;
        chi1 = chi;
        xi1 = Complex64::new(psi1, -chi1);
    }

    let x2 = x * x;
    MieEfficiencies {
        qext: 2.0 * qext / x2,
        qsca: 2.0 * qsca / x2,
        qback: back.norm_sqr() / x2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_parameter() {
        // 1 mm 液滴，905 nm 激光
        let x = size_parameter(1.0, 905.0);
        assert!((x - PI * 1e-3 / 905e-9).abs() < 1e-9);
        assert!((x - 3471.4).abs() < 1.0);
    }

    #[test]
    fn test_zero_size() {
        let q = mie_efficiencies(Complex64::new(1.33, 0.0), 0.0);
        assert_eq!(q, MieEfficiencies::default());
    }

    #[test]
    fn test_rayleigh_limit() {
        let m = Complex64::new(1.5, 0.0);
        let x = 0.01;
        let q = mie_efficiencies(m, x);

        let m2 = m * m;
        let pol = ((m2 - 1.0) / (m2 + 2.0)).norm_sqr();
        let rayleigh = 8.0 / 3.0 * x.powi(4) * pol;

        assert!(
            ((q.qsca - rayleigh) / rayleigh).abs() < 1e-3,
            "qsca = {:e}, rayleigh = {:e}",
            q.qsca,
            rayleigh
        );
    }

    #[test]
    fn test_non_absorbing_extinction_equals_scattering() {
        let m = Complex64::new(1.328, 0.0);
        for x in [0.5, 1.0, 5.0, 50.0, 300.0] {
            let q = mie_efficiencies(m, x);
            assert!(
                ((q.qext - q.qsca) / q.qext).abs() < 1e-6,
                "x = {}: qext = {}, qsca = {}",
                x,
                q.qext,
                q.qsca
            );
        }
    }

    #[test]
    fn test_absorbing_sphere() {
        let q = mie_efficiencies(Complex64::new(1.5, 0.1), 10.0);
        assert!(q.qext > q.qsca);
        assert!(q.qback > 0.0);
    }

    #[test]
    fn test_large_particle_extinction_paradox() {
        // 大粒子极限 Q_ext → 2
        let q = mie_efficiencies(Complex64::new(1.328, 0.0), 2000.0);
        assert!((q.qext - 2.0).abs() < 0.1, "qext = {}", q.qext);
    }
}
