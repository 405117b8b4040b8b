//! Prompt construction for case studies, summaries and slide titles.
//!
//! Every system prompt and instruction template lives here so the wording
//! can be changed without touching the completion or parsing code, and so
//! tests can inspect rendered prompts without a live model.
//!
//! Document content is bounded per document (see [`content_summary`]) to keep
//! requests inside provider token limits.

use crate::error::StudioError;
use crate::output::{ExtractedDocument, ProjectInfo};

/// System prompt for case-study generation.
pub const CASE_STUDY_SYSTEM_PROMPT: &str = "You are an expert business consultant specializing in creating \
compelling case studies. Generate a structured one-page case study that clearly \
articulates the problem, solution, and quantifiable impact. Use professional language \
and focus on business value.";

/// System prompt for executive summaries.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are an expert at creating executive summaries for presentations.";

/// System prompt for slide titles.
pub const TITLE_SYSTEM_PROMPT: &str = "You are an expert at creating compelling slide titles.";

/// Literal used when the caller gave no additional context.
pub const NO_CONTEXT_MARKER: &str = "None provided";

/// Appended to a document's text when it was cut at the character budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Exact JSON keys the case-study reply must contain.
pub const CASE_STUDY_KEYS: [&str; 6] = [
    "problem_statement",
    "solution_approach",
    "key_metrics",
    "impact_summary",
    "implementation_details",
    "lessons_learned",
];

/// Render documents as `=== {name} ===` blocks, each cut to `char_budget`
/// characters with [`TRUNCATION_MARKER`] appended when cut.
///
/// Documents appear in the order given (upload order). Truncation counts
/// characters, not bytes, so multi-byte text is never split mid-codepoint.
pub fn content_summary(documents: &[ExtractedDocument], char_budget: usize) -> String {
    let mut summary = String::new();
    for doc in documents {
        summary.push_str("\n=== ");
        summary.push_str(&doc.source_name);
        summary.push_str(" ===\n");
        match doc.text.char_indices().nth(char_budget) {
            Some((cut, _)) => {
                summary.push_str(&doc.text[..cut]);
                summary.push_str(TRUNCATION_MARKER);
            }
            None => summary.push_str(&doc.text),
        }
    }
    summary
}

/// Build the user prompt for case-study generation.
///
/// `templates` is optional reference material; when `None` or empty the
/// "Reference Case Study Templates" block is omitted entirely.
pub fn case_study_prompt(
    project: &ProjectInfo,
    deliverables: &[ExtractedDocument],
    templates: Option<&[ExtractedDocument]>,
    additional_context: &str,
    char_budget: usize,
) -> String {
    let context = if additional_context.trim().is_empty() {
        NO_CONTEXT_MARKER
    } else {
        additional_context
    };

    let mut prompt = format!(
        "Generate a one-page case study for the following project:\n\
         \n\
         Project Name: {}\n\
         Client Name: {}\n\
         Industry: {}\n\
         \n\
         Additional Context from User: {}\n\
         \n\
         Project Deliverables and Documentation:\n\
         {}\n",
        project.project_name,
        project.client_name,
        project.industry,
        context,
        content_summary(deliverables, char_budget),
    );

    if let Some(templates) = templates.filter(|t| !t.is_empty()) {
        prompt.push_str(
            "\nReference Case Study Templates (match their tone and structure, not their facts):\n",
        );
        prompt.push_str(&content_summary(templates, char_budget));
        prompt.push('\n');
    }

    prompt.push_str(
        "\nPlease structure the case study with the following sections:\n\
         \n\
         1. PROBLEM STATEMENT: What was the business challenge or opportunity?\n\
         2. SOLUTION APPROACH: How was the problem addressed?\n\
         3. KEY METRICS: What were the key performance indicators or metrics?\n\
         4. IMPACT SUMMARY: What was the quantifiable business impact?\n\
         5. IMPLEMENTATION DETAILS: What were the key steps in the implementation?\n\
         6. LESSONS LEARNED: What insights were gained?\n\
         \n\
         Provide the response in valid JSON format with these exact keys:\n",
    );
    prompt.push_str(&format!(
        "{}, {}, {} (array), {}, {}, {}\n",
        CASE_STUDY_KEYS[0],
        CASE_STUDY_KEYS[1],
        CASE_STUDY_KEYS[2],
        CASE_STUDY_KEYS[3],
        CASE_STUDY_KEYS[4],
        CASE_STUDY_KEYS[5],
    ));
    prompt.push_str(
        "\nEnsure all information is accurate to the provided documentation and \
         maintains a professional tone suitable for executive reading.\n",
    );
    prompt
}

/// Build the user prompt for an executive summary of `content`.
///
/// Fails with a validation error when `content` is blank; there is nothing
/// to summarise and the call would only waste tokens.
pub fn summary_prompt(content: &str, max_words: usize) -> Result<String, StudioError> {
    if content.trim().is_empty() {
        return Err(StudioError::validation("content", "Content cannot be empty"));
    }
    Ok(format!(
        "You are an executive summary expert.\n\
         Read the following presentation content and create a concise executive summary.\n\
         The summary should:\n\
         - Be approximately {max_words} words or less\n\
         - Highlight the key points and main takeaways\n\
         - Be suitable for a single slide presentation\n\
         - Use clear, professional language\n\
         - Be structured with bullet points where appropriate\n\
         \n\
         Presentation Content:\n\
         {content}\n\
         \n\
         Executive Summary:"
    ))
}

/// Build the user prompt for a 5-10 word slide title.
pub fn title_prompt(summary: &str) -> String {
    format!(
        "Based on the following executive summary, generate a concise and impactful slide title (5-10 words).\n\
         The title should be professional and capture the essence of the presentation.\n\
         \n\
         Summary:\n\
         {summary}\n\
         \n\
         Title:"
    )
}
