//! System/user prompt assembly.
//!
//! Wording here is editorial policy and may change freely. What the rest of
//! the pipeline depends on is the JSON field contract spelled out at the end
//! of each user prompt.

use std::fmt::Write;

use crate::domain::PostType;

use super::settings::GenerationSettings;

/// The two messages sent to the completion API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const VOICE_RULES: &str = "\
You are a content writer producing articles for a professional software engineering website. Follow these rules strictly:

1. Write in an analytical, explanatory or opinionated style.
2. Never write in the first person. Do not say \"I\", \"we\" or \"our team\", and do not imply lived experience.
3. Do not invent projects, companies, clients or personal achievements.
4. Offer insight instead: comparisons, trade-offs, trends and well-argued commentary.
5. Keep examples general, hypothetical or drawn from widely documented industry patterns. Never fabricate case studies.
6. Tone: authoritative yet accessible, like an industry thought-leadership piece.
7. Content must be evergreen rather than news-style, original and non-repetitive.";

/// Builds prompts from the generation settings.
pub struct PromptBuilder<'a> {
    settings: &'a GenerationSettings,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(settings: &'a GenerationSettings) -> Self {
        Self { settings }
    }

    /// `recent_titles` is newest first; only the first
    /// `recent_titles_limit` entries are quoted back to the model.
    pub fn build(&self, topic: &str, post_type: PostType, recent_titles: &[String]) -> Prompt {
        Prompt {
            system: self.system_prompt(post_type),
            user: self.user_prompt(topic, post_type, recent_titles),
        }
    }

    fn system_prompt(&self, post_type: PostType) -> String {
        let mut system = String::from(VOICE_RULES);
        if post_type == PostType::CaseStudy {
            system.push_str(
                "\n8. Cite only from the approved sources below. If none of them supports a claim, leave the claim out.\n\nApproved sources:",
            );
            for source in &self.settings.approved_sources {
                let _ = write!(system, "\n- {}", source);
            }
        }
        system
    }

    fn user_prompt(&self, topic: &str, post_type: PostType, recent_titles: &[String]) -> String {
        let mut user = match post_type {
            PostType::Blog => format!(
                "Write an analytical blog post about {topic}. Structure it as:\n\
                 1. A title\n\
                 2. A 2-3 sentence introduction\n\
                 3. Two or three analytical body sections covering trade-offs, proven practices and where the field is heading\n\
                 4. A conclusion\n"
            ),
            PostType::CaseStudy => format!(
                "Write an analytical case study about {topic} built on a widely documented industry pattern. Structure it as:\n\
                 1. A title\n\
                 2. An introduction\n\
                 3. The challenge\n\
                 4. The approach, including the technologies involved\n\
                 5. The key takeaway\n\
                 6. The source it draws on, taken from the approved sources\n"
            ),
        };

        let titles: Vec<&str> = recent_titles
            .iter()
            .take(self.settings.recent_titles_limit)
            .map(String::as_str)
            .collect();
        if !titles.is_empty() {
            let _ = write!(
                user,
                "\nRecently published titles: {}. Avoid similar topics and angles.\n",
                titles.join("; ")
            );
        }

        user.push_str("\nRespond with a single JSON object and nothing else. Fields:\n");
        user.push_str("- \"title\": string\n- \"content\": string (markdown body)\n- \"excerpt\": string (one or two sentences)\n");
        user.push_str("- \"sources\": optional array of {\"title\": string, \"url\": string}, most relevant first\n");
        if post_type == PostType::CaseStudy {
            user.push_str("- \"metrics\": optional {\"percentage\": number, \"description\": string}\n");
            user.push_str("- \"caseStudyLink\": URL of the approved source used, or null\n");
        }
        user
    }
}
