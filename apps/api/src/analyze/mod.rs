// Analysis endpoint: accepts a resume upload and target role, extracts the PDF
// text and returns the analyzer's free-text ATS report.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod analyzer;
pub mod handlers;
pub mod pdf_text;
