//! Prompt templates for group analysis and resource recommendation

use crate::analysis::ExpertiseSummary;

/// Literal example embedded in the group analysis prompt.
///
/// It is itself a valid answer, so a backend that echoes it verbatim still
/// passes validation.
pub const ANALYSIS_EXAMPLE_JSON: &str = r#"{
  "category": "Python Development",
  "expertise_level": 2,
  "knowledge_gaps": ["Python environment management", "Differences between Python versions"],
  "recommendations": ["Work through the official Python tutorial", "Practice creating and activating virtual environments"]
}"#;

/// Literal example embedded in the resource recommendation prompt.
pub const RESOURCES_EXAMPLE_JSON: &str = r#"{
  "resources": [
    {"title": "The Python Tutorial", "url": "https://docs.python.org/3/tutorial/"}
  ]
}"#;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt asking for the structured analysis of one question group.
    pub fn group_analysis<S: AsRef<str>>(questions: &[S]) -> String {
        let mut prompt = String::from(
            "You are analysing a group of related questions asked by the same person.\n\
             Determine the shared topic category, estimate the asker's expertise level, \
             list their likely knowledge gaps and recommend what to study next.\n\nQuestions:\n",
        );

        for (i, question) in questions.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, question.as_ref().trim()));
        }

        prompt.push_str(&format!(
            r#"
Respond with a single JSON object and nothing else. Use exactly these fields:
- "category": a short, non-empty category name (for example technical, non-technical, billing, or a more specific topic)
- "expertise_level": an integer from 1 (novice) to 5 (expert)
- "knowledge_gaps": a JSON array of strings, possibly empty
- "recommendations": a JSON array of strings, possibly empty

Example:
{}"#,
            ANALYSIS_EXAMPLE_JSON
        ));

        prompt
    }

    /// Prompt asking for learning resources for the whole run.
    pub fn resource_recommendations(
        category: &str,
        expertise: Option<&ExpertiseSummary>,
        knowledge_gaps: &[String],
    ) -> String {
        let expertise = expertise
            .map(|e| e.band.as_str())
            .unwrap_or("Unknown");
        let gaps = if knowledge_gaps.is_empty() {
            "none identified".to_string()
        } else {
            knowledge_gaps.join("; ")
        };

        format!(
            r#"Recommend learning resources for:
Category: {}
Expertise Level: {}
Knowledge Gaps: {}

Respond with a single JSON object and nothing else. It must contain a "resources" array whose entries each have a non-empty "title" and a "url".

Example:
{}"#,
            category, expertise, gaps, RESOURCES_EXAMPLE_JSON
        )
    }
}
