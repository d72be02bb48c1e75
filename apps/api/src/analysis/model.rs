use serde::{Deserialize, Serialize};

/// Structured résumé evaluation returned by `POST /analyze`.
///
/// Built once per request from model output and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall: Overall,
    pub ratings: Ratings,
    pub skills_analysis: Vec<SkillShare>,
    pub experience_analysis: Vec<ExperienceScore>,
    pub suggestions: Suggestions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overall {
    pub score: f64, // 1.0 – 10.0
    pub rating_text: RatingText,
    pub stars: u8, // 1 – 5
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingText {
    Poor,
    #[serde(rename = "Below Average", alias = "BelowAverage")]
    BelowAverage,
    Average,
    #[serde(rename = "Above Average", alias = "AboveAverage")]
    AboveAverage,
    Excellent,
}

/// Per-dimension scores, each 1.0 – 10.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    pub clarity_formatting: f64,
    pub skills_relevance: f64,
    pub experience_strength: f64,
    pub overall_presentation: f64,
}

impl Ratings {
    pub fn named(&self) -> [(&'static str, f64); 4] {
        [
            ("clarity_formatting", self.clarity_formatting),
            ("skills_relevance", self.skills_relevance),
            ("experience_strength", self.experience_strength),
            ("overall_presentation", self.overall_presentation),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillShare {
    pub name: String,
    pub color: String, // "#RRGGBB"
    pub value: u32,    // percentage of the whole skill chart
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceCategory {
    Relevance,
    Impact,
    Progression,
    Achievements,
}

impl ExperienceCategory {
    pub const ALL: [ExperienceCategory; 4] = [
        ExperienceCategory::Relevance,
        ExperienceCategory::Impact,
        ExperienceCategory::Progression,
        ExperienceCategory::Achievements,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceScore {
    pub category: ExperienceCategory,
    pub score: u32, // 1 – 100
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl AnalysisResult {
    /// Sum of all skill percentages. Expected to be 100 but the model is not
    /// held to it.
    pub fn skills_total(&self) -> u32 {
        self.skills_analysis.iter().map(|s| s.value).sum()
    }
}
