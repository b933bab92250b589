// Prompt constants for the CV feedback service.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt for CV feedback.
pub const FEEDBACK_SYSTEM: &str =
    "You are an expert career coach specializing in providing feedback on CVs. \
    You provide constructive criticism and actionable suggestions. \
    Respond in clear, concise prose addressed directly to the CV's author. \
    Do NOT return JSON or markdown code fences.";

/// Feedback prompt template. Replace `{cv_content}` (and optionally append
/// the job description block) before sending.
const FEEDBACK_PROMPT_TEMPLATE: &str = "Review the following CV content and provide \
constructive criticism and actionable suggestions.

CV Content:
{cv_content}
";

const JOB_DESCRIPTION_BLOCK: &str = "
The CV is being tailored for this job description. Make the feedback specific \
to it and highlight areas where the CV could be better aligned.

Job Description:
{job_description}
";

pub fn build_feedback_prompt(cv_content: &str, job_description: Option<&str>) -> String {
    let mut prompt = FEEDBACK_PROMPT_TEMPLATE.replace("{cv_content}", cv_content);
    if let Some(jd) = job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        prompt.push_str(&JOB_DESCRIPTION_BLOCK.replace("{job_description}", jd));
    }
    prompt
}
