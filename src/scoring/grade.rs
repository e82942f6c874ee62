//! Letter grades and display rounding.

use serde::Serialize;
use std::fmt;

/// Coarse A+..F classification of a total percentage, on the fixed
/// 10-tier scale (>=95 A+ ... <50 F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "F")]
    F,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 95.0 => Grade::APlus,
            p if p >= 90.0 => Grade::A,
            p if p >= 85.0 => Grade::AMinus,
            p if p >= 80.0 => Grade::BPlus,
            p if p >= 75.0 => Grade::B,
            p if p >= 70.0 => Grade::BMinus,
            p if p >= 65.0 => Grade::CPlus,
            p if p >= 60.0 => Grade::C,
            p if p >= 55.0 => Grade::CMinus,
            p if p >= 50.0 => Grade::D,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to exactly one decimal place for display, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
