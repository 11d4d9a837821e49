/// Builds the user prompt sent to the model.
///
/// With a job description: `"Job Description: {jd}\nResume Text: {resume}"`.
/// Without: `"Resume Text: {resume}"`. Pure and deterministic.
pub fn build_prompt(job_description: Option<&str>, resume_text: &str) -> String {
    match job_description.filter(|jd| !jd.trim().is_empty()) {
        Some(jd) => format!("Job Description: {jd}\nResume Text: {resume_text}"),
        None => format!("Resume Text: {resume_text}"),
    }
}
