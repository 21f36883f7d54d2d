use serde::{Deserialize, Serialize};

/// Structured outcome of one analysis.
///
/// Every field is always present. Absent sections are the empty vec / empty
/// string, and an absent score is `None`, so renderers never branch on a
/// missing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// 0 – 100, `None` when no score label with digits was found.
    pub score: Option<u8>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
    pub summary: String,
}

/// Coarse verdict shown next to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::Excellent
        } else if score >= 60 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent! Your resume is well-optimized.",
            ScoreBand::Good => "Good job, but there's room for improvement.",
            ScoreBand::NeedsWork => "Needs work. Check the suggestions below.",
        }
    }
}

impl ResultRecord {
    /// Score as rendered: the sentinel shows as 0.
    pub fn score_or_zero(&self) -> u8 {
        self.score.unwrap_or(0)
    }

    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score_or_zero())
    }

    /// True when the reply carried none of the recognised sections.
    pub fn is_empty(&self) -> bool {
        self.score.is_none()
            && self.matched_skills.is_empty()
            && self.missing_skills.is_empty()
            && self.suggestions.is_empty()
            && self.summary.is_empty()
    }
}
