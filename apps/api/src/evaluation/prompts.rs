// Evaluation LLM prompt templates.
// All prompts for the evaluation module are defined here.

/// System prompt for feedback evaluation.
/// Replace: {min_technical}, {min_soft}, {min_strengths}, {min_areas}
pub const EVALUATION_SYSTEM_TEMPLATE: &str = "\
You are an AI assistant that analyzes interview feedback and returns a structured evaluation in JSON format. \
Extract and evaluate exactly {min_technical} Technical Skills, {min_soft} Soft Skills, {min_strengths} Strengths, \
and {min_areas} Areas for Improvement from the feedback. \
If the feedback contains fewer items, infer additional relevant content based on context \
(e.g., technical skills like \"Python\" or soft skills like \"Communication\") with reasonable ratings (1-5) \
and 3-line evidence for skills, or 2-line descriptions for Strengths and Areas. \
Only use placeholders (e.g., \"Unnamed Skill\" or \"Inferred Point\") if no valid inference is possible after exhausting context. \
Ensure all required fields are present and valid.";

/// User prompt for feedback evaluation.
/// Replace: {interview_date}, {feedback_text}, {min_technical}, {min_soft}, {min_strengths}, {min_areas}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Analyze the following interview feedback and return a structured JSON evaluation:
{
  "Candidate Name": "<Full Name>",
  "Role": "<Job Title>",
  "Interview Date": "{interview_date}",
  "Summary": "<200 to 300 words. Start with '{Name}, evaluated on {Month DD, YYYY} is a...' where {Name} is the candidate's full name and {Month DD, YYYY} is the interview date above. Use the exact interview date, not the current date.>",
  "Strengths": [
    "<Strength name: specific strength with evidence from the feedback>"
  ],
  "Areas for Improvement": [
    "<Area name: specific area needing improvement with evidence>"
  ],
  "Technical Skills": [
    {
      "Section": "<Skill Name>",
      "rating": <integer 1-5 based on demonstrated ability in the feedback>,
      "comments": "<25-35 words on how this skill was demonstrated in the interview>"
    }
  ],
  "Soft Skills": [
    {
      "Section": "<Skill Name>",
      "rating": <integer 1-5 based on demonstrated ability in the feedback>,
      "evidence": "<25-35 words on how this skill was demonstrated in the interview>"
    }
  ]
}

COUNTS:
- "Technical Skills": exactly {min_technical} entries
- "Soft Skills": at least {min_soft} entries
- "Strengths": at least {min_strengths} points
- "Areas for Improvement": at least {min_areas} points

Return ONLY the JSON object.

Feedback:
{feedback_text}"#;
