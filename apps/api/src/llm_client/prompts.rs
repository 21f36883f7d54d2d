/// System prompt for resume analysis.
pub const ANALYZE_SYSTEM: &str =
    "You are an expert ATS Resume Analyzer. Follow the requested output format exactly.";

/// Analysis prompt for one resume and target role, filled in a single pass so
/// placeholder-like text in either input is never substituted again.
///
/// The section labels must stay in sync with `extraction::parser`.
pub fn build_analyze_prompt(role: &str, resume_text: &str) -> String {
    format!(
        r#"You are an expert ATS Resume Analyzer.

Target Role: {role}

Return output EXACTLY in this format:

ATS Score: <number>

Matched Skills:
- skill 1
- skill 2

Missing Skills:
- skill 1
- skill 2

Improvement Suggestions:
- suggestion 1
- suggestion 2

Rewritten Professional Summary:
<3-4 professional lines>

Resume Content:
{resume_text}
"#
    )
}
