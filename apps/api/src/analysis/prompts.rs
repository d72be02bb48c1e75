// Résumé analysis prompt template.

pub const ANALYSIS_PROMPT: &str = r#"You are an AI Resume Reviewer. Analyze the following resume in detail and return JSON ONLY in this exact format:
{
  "overall": {
    "score": [number between 1-10 with one decimal place],
    "rating_text": [one of: "Poor", "Below Average", "Average", "Above Average", "Excellent"],
    "stars": [integer 1-5],
    "summary": [brief one-sentence evaluation]
  },
  "ratings": {
    "clarity_formatting": [number between 1-10 with one decimal place],
    "skills_relevance": [number between 1-10 with one decimal place],
    "experience_strength": [number between 1-10 with one decimal place],
    "overall_presentation": [number between 1-10 with one decimal place]
  },
  "skills_analysis": [
    {
      "name": [skill name extracted from resume],
      "color": [color for the skill in #RRGGBB format],
      "value": [integer percentage of relative importance; all values sum to 100]
    }
  ],
  "experience_analysis": [
    {
      "category": [one of: "Relevance", "Impact", "Progression", "Achievements"],
      "score": [integer between 1-100]
    }
  ],
  "suggestions": {
    "strengths": [
      [string - first strength point],
      [string - second strength point],
      [string - third strength point]
    ],
    "improvements": [
      [string - first improvement point],
      [string - second improvement point],
      [string - third improvement point]
    ]
  }
}

Guidelines:
1. Overall score bands: 1-4 poor, 4-6 average, 6-8 good, 8-9 very good, 9-10 excellent.
2. Stars: 1-2 = 1 star, 3-4 = 2 stars, 5-6 = 3 stars, 7-8 = 4 stars, 9-10 = 5 stars.
3. Strengths and improvements must be specific and actionable, each a complete sentence.
4. For skills_analysis, weigh both mentioned skills and implied capabilities. Include the 4-6 most important skills.
5. experience_analysis has exactly 4 entries, one per category:
   - Relevance: how relevant previous roles are to typical career progression
   - Impact: evidence of meaningful contributions and results
   - Progression: clear career advancement over time
   - Achievements: quantifiable or notable accomplishments
6. Return exactly 3 strengths and exactly 3 improvements.
7. The JSON must be valid. Check for missing or extra commas, brackets, or quotes.
8. DO NOT include any explanations or text outside the JSON structure.

Resume Text:
{resume_text}
"#;

pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT.replace("{resume_text}", resume_text.trim())
}
