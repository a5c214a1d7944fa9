//! # 降水粒子谱分布
//!
//! 指数型粒子谱 N(D; R) = N₀(R) · exp(-Λ(R) · D)。
//!
//! ## 单位
//! - D: 粒子直径 (mm)
//! - R: 降水率 (mm/hr)
//! - N: 数浓度谱 (m⁻³ mm⁻¹)
//!
//! ## 数据来源
//! - Marshall & Palmer (1948), 雨
//! - Gunn & Marshall (1958), 雪
//! - Sekhon & Srivastava (1970), 雪
//! - Joss, Thams & Waldvogel (1968), 毛毛雨 / 层状降水 / 雷暴
//!
//! ## 依赖关系
//! - 被 `mie/model.rs` 调用计算粒子谱
//! - 被 `commands/modes.rs` 用于打印模式列表

use crate::error::{MieplotError, Result};

use std::fmt;
use std::str::FromStr;

/// 降水模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Rain,
    Snow1958,
    Snow1970,
    Drizzle,
    Widespread,
    Thunderstorm,
}

impl Mode {
    /// 所有支持的模式
    pub const ALL: [Mode; 6] = [
        Mode::Rain,
        Mode::Snow1958,
        Mode::Snow1970,
        Mode::Drizzle,
        Mode::Widespread,
        Mode::Thunderstorm,
    ];

    /// 模式名称（也用作输出文件名）
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Rain => "rain",
            Mode::Snow1958 => "snow_1958",
            Mode::Snow1970 => "snow_1970",
            Mode::Drizzle => "drizzle",
            Mode::Widespread => "widespread",
            Mode::Thunderstorm => "thunderstorm",
        }
    }

    /// 模式对应的粒子谱
    pub fn family(&self) -> DsdFamily {
        match self {
            Mode::Rain => DsdFamily::MarshallPalmer,
            Mode::Snow1958 => DsdFamily::GunnMarshall,
            Mode::Snow1970 => DsdFamily::SekhonSrivastava,
            Mode::Drizzle => DsdFamily::JossDrizzle,
            Mode::Widespread => DsdFamily::JossWidespread,
            Mode::Thunderstorm => DsdFamily::JossThunderstorm,
        }
    }

    fn supported_names() -> String {
        Mode::ALL
            .iter()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Mode {
    type Err = MieplotError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.name() == key)
            .ok_or_else(|| MieplotError::UnsupportedMode {
                mode: s.to_string(),
                supported: Mode::supported_names(),
            })
    }
}

/// 指数型粒子谱族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsdFamily {
    MarshallPalmer,
    GunnMarshall,
    SekhonSrivastava,
    JossDrizzle,
    JossWidespread,
    JossThunderstorm,
}

/// N₀ = a · R^b, Λ = c · R^d
#[derive(Debug, Clone, Copy)]
pub struct ExponentialParams {
    pub n0_coeff: f64,
    pub n0_exp: f64,
    pub lambda_coeff: f64,
    pub lambda_exp: f64,
}

impl DsdFamily {
    /// 粒子谱标识符，形如 `<name>_Nd`
    pub fn identifier(&self) -> &'static str {
        match self {
            DsdFamily::MarshallPalmer => "marshall_palmer_Nd",
            DsdFamily::GunnMarshall => "gunn_marshall_Nd",
            DsdFamily::SekhonSrivastava => "sekhon_srivastava_Nd",
            DsdFamily::JossDrizzle => "joss_drizzle_Nd",
            DsdFamily::JossWidespread => "joss_widespread_Nd",
            DsdFamily::JossThunderstorm => "joss_thunderstorm_Nd",
        }
    }

    pub fn params(&self) -> ExponentialParams {
        let (n0_coeff, n0_exp, lambda_coeff, lambda_exp) = match self {
            DsdFamily::MarshallPalmer => (8000.0, 0.0, 4.1, -0.21),
            DsdFamily::GunnMarshall => (3800.0, -0.87, 2.55, -0.48),
            DsdFamily::SekhonSrivastava => (2500.0, -0.94, 2.29, -0.45),
            DsdFamily::JossDrizzle => (30000.0, 0.0, 5.7, -0.21),
            DsdFamily::JossWidespread => (7000.0, 0.0, 4.1, -0.21),
            DsdFamily::JossThunderstorm => (1400.0, 0.0, 3.0, -0.21),
        };
        ExponentialParams {
            n0_coeff,
            n0_exp,
            lambda_coeff,
            lambda_exp,
        }
    }

    /// 截距 N₀(R) (m⁻³ mm⁻¹)
    pub fn intercept(&self, rain_rate: f64) -> f64 {
        let p = self.params();
        p.n0_coeff * rain_rate.powf(p.n0_exp)
    }

    /// 斜率 Λ(R) (mm⁻¹)
    pub fn slope(&self, rain_rate: f64) -> f64 {
        let p = self.params();
        p.lambda_coeff * rain_rate.powf(p.lambda_exp)
    }

    /// 计算直径 `d` (mm) 处的粒子谱
    pub fn evaluate(&self, d: f64, rain_rate: f64) -> f64 {
        self.intercept(rain_rate) * (-self.slope(rain_rate) * d).exp()
    }

    /// 参数的可读公式，用于终端表格
    pub fn formula(&self) -> (String, String) {
        let p = self.params();
        let n0 = if p.n0_exp == 0.0 {
            format!("{}", p.n0_coeff)
        } else {
            format!("{} R^{}", p.n0_coeff, p.n0_exp)
        };
        let lambda = format!("{} R^{}", p.lambda_coeff, p.lambda_exp);
        (n0, lambda)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("snow_1958".parse::<Mode>().unwrap(), Mode::Snow1958);
        assert_eq!("Rain".parse::<Mode>().unwrap(), Mode::Rain);
        for m in Mode::ALL {
            assert_eq!(m.name().parse::<Mode>().unwrap(), m);
        }
    }

    #[test]
    fn test_unsupported_mode() {
        let err = "hail_2001".parse::<Mode>().unwrap_err();
        match err {
            MieplotError::UnsupportedMode { mode, supported } => {
                assert_eq!(mode, "hail_2001");
                assert!(supported.contains("snow_1958"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_marshall_palmer() {
        let f = DsdFamily::MarshallPalmer;
        assert_eq!(f.evaluate(0.0, 10.0), 8000.0);
        let expected = 8000.0 * (-4.1 * 10.0_f64.powf(-0.21) * 1.0).exp();
        assert!((f.evaluate(1.0, 10.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_gunn_marshall_at_unit_rate() {
        let f = Mode::Snow1958.family();
        assert_eq!(f.intercept(1.0), 3800.0);
        assert_eq!(f.slope(1.0), 2.55);
    }

    #[test]
    fn test_distribution_decreasing_in_diameter() {
        for m in Mode::ALL {
            let f = m.family();
            let a = f.evaluate(0.5, 20.0);
            let b = f.evaluate(2.0, 20.0);
            assert!(a > b, "{} should decrease with diameter", m);
        }
    }

    #[test]
    fn test_identifiers_have_suffix() {
        for m in Mode::ALL {
            assert!(m.family().identifier().ends_with("_Nd"));
        }
    }
}
