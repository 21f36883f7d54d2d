//! Response parser: turns the analysis service's prose reply into a `ResultRecord`.
//!
//! The service is a free-text generator; the labels below are the only anchors.
//! Sections may appear in any order, any subset may be missing, and prose
//! between them is ignored.

use std::borrow::Cow;

use crate::extraction::record::ResultRecord;
use crate::extraction::section::{extract_score, extract_section, extract_tail};

pub const SCORE_LABEL: &str = "ATS Score";
pub const MATCHED_SKILLS_LABEL: &str = "Matched Skills";
pub const MISSING_SKILLS_LABEL: &str = "Missing Skills";
pub const SUGGESTIONS_LABEL: &str = "Improvement Suggestions";
pub const SUMMARY_LABEL: &str = "Rewritten Professional Summary";

/// Parses one raw reply. Total: every input yields a fully-populated record.
pub fn parse(raw: &str) -> ResultRecord {
    let text = normalize_line_endings(raw);

    ResultRecord {
        score: extract_score(&text, SCORE_LABEL),
        matched_skills: extract_section(&text, MATCHED_SKILLS_LABEL),
        missing_skills: extract_section(&text, MISSING_SKILLS_LABEL),
        suggestions: extract_section(&text, SUGGESTIONS_LABEL),
        summary: extract_tail(&text, SUMMARY_LABEL),
    }
}

fn normalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}
