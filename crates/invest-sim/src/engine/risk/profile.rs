use serde::{Deserialize, Serialize};

const CONSERVATIVE_CEILING: u32 = 35;
const MODERATE_CEILING: u32 = 70;

/// Named risk band derived from a clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskBand {
    fn from_score(score: u32) -> Self {
        if score <= CONSERVATIVE_CEILING {
            Self::Conservative
        } else if score <= MODERATE_CEILING {
            Self::Moderate
        } else {
            Self::Aggressive
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Conservative => "Conservative",
            RiskBand::Moderate => "Moderate",
            RiskBand::Aggressive => "Aggressive",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            RiskBand::Conservative => "Focus on liquidity and low transaction activity.",
            RiskBand::Moderate => "Balanced between safety and return.",
            RiskBand::Aggressive => "Seeks high returns and accepts higher risk.",
        }
    }

    /// Catalog risk level matching the band (1 = low .. 3 = high).
    pub const fn risk_level(self) -> u8 {
        match self {
            RiskBand::Conservative => 1,
            RiskBand::Moderate => 2,
            RiskBand::Aggressive => 3,
        }
    }

    /// Parses a band name, accepting the English labels and the Portuguese equivalents.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "conservative" | "conservador" => Some(Self::Conservative),
            "moderate" | "moderado" => Some(Self::Moderate),
            "aggressive" | "agressivo" => Some(Self::Aggressive),
            _ => None,
        }
    }
}

/// Risk profile value. Only obtainable through [`RiskProfile::create`] or
/// [`RiskProfile::CONSERVATIVE_DEFAULT`], so the band always agrees with the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RiskProfile {
    score: u32,
    band: RiskBand,
}

impl RiskProfile {
    /// Profile returned when there is no data to score.
    pub const CONSERVATIVE_DEFAULT: RiskProfile = RiskProfile {
        score: 0,
        band: RiskBand::Conservative,
    };

    pub fn create(score: i64) -> Self {
        let score = u32::try_from(score.max(0)).unwrap_or(u32::MAX);
        Self {
            score,
            band: RiskBand::from_score(score),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn band(&self) -> RiskBand {
        self.band
    }

    pub fn name(&self) -> &'static str {
        self.band.label()
    }

    pub fn description(&self) -> &'static str {
        self.band.description()
    }
}
