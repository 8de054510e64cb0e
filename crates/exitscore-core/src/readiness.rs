//! Interpretation of scores as sale-readiness tiers and category standings.

use serde::{Deserialize, Serialize};

use crate::engine::OverallScore;

/// Sale-readiness band for an overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    /// 86 and above.
    Premium,
    /// 76 to 85.
    Strong,
    /// 60 to 75.
    Promising,
    /// 45 to 59.
    AtRisk,
    /// Below 45.
    Critical,
}

impl ReadinessTier {
    pub fn from_score(score: OverallScore) -> Self {
        match score.value() {
            86.. => ReadinessTier::Premium,
            76..=85 => ReadinessTier::Strong,
            60..=75 => ReadinessTier::Promising,
            45..=59 => ReadinessTier::AtRisk,
            _ => ReadinessTier::Critical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessTier::Premium => "Premium",
            ReadinessTier::Strong => "Strong",
            ReadinessTier::Promising => "Promising",
            ReadinessTier::AtRisk => "At Risk",
            ReadinessTier::Critical => "Critical",
        }
    }

    /// One-sentence guidance for an owner in this band.
    pub fn guidance(self) -> &'static str {
        match self {
            ReadinessTier::Premium => {
                "The business is well positioned for a sale and should attract premium buyers and valuations."
            }
            ReadinessTier::Strong => {
                "The business is sale-ready with a few gaps that, once closed, could lift the valuation."
            }
            ReadinessTier::Promising => {
                "The business has solid foundations but needs targeted work before going to market."
            }
            ReadinessTier::AtRisk => {
                "Significant gaps would weigh on buyer interest and price; plan 12 to 24 months of preparation."
            }
            ReadinessTier::Critical => {
                "The business is not yet transferable; owner dependence and structural risks must be addressed first."
            }
        }
    }
}

impl std::fmt::Display for ReadinessTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Heat-map label for a single category percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Strong,
    Moderate,
    NeedsAttention,
}

impl Standing {
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            80.. => Standing::Strong,
            50..=79 => Standing::Moderate,
            _ => Standing::NeedsAttention,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Standing::Strong => "Strong",
            Standing::Moderate => "Moderate",
            Standing::NeedsAttention => "Needs Attention",
        }
    }
}

impl std::fmt::Display for Standing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
