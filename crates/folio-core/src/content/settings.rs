use std::time::Duration;

use crate::domain::PostType;
use crate::error::ValidationError;

use super::selection::{TopicTable, TopicWeight};

/// Topic vocabulary and its sampling weights.
pub const DEFAULT_TOPIC_WEIGHTS: &[(&str, u32)] = &[
    ("Generative AI", 15),
    ("Software Quality Assurance", 15),
    ("Machine Learning", 10),
    ("Software Development Best Practices", 10),
    ("AI in Software Development", 10),
    ("Test-Driven Development", 8),
    ("Code Quality and Review", 7),
    ("Software Architecture", 5),
    ("DevOps", 5),
    ("Web Development", 5),
    ("API Development", 5),
    ("Microservices", 5),
    ("Cloud Computing", 3),
    ("Data Science", 3),
    ("Cybersecurity", 2),
];

const DEFAULT_APPROVED_SOURCES: &[&str] = &[
    "https://martinfowler.com",
    "https://www.thoughtworks.com/radar",
    "https://research.google",
    "https://learn.microsoft.com/azure/architecture",
    "https://aws.amazon.com/builders-library",
    "https://owasp.org",
];

/// Knobs for the generation pipeline, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub topics: TopicTable,
    /// Chance that a randomly typed post is a case study.
    pub case_study_probability: f64,
    /// Scheduled runs skip while the newest post is younger than this.
    pub recency_threshold_days: f64,
    /// How many prior titles the anti-repetition clause lists.
    pub recent_titles_limit: usize,
    /// The only places a case study may cite.
    pub approved_sources: Vec<String>,
    /// Substituted when a case study comes back without a usable link.
    pub fallback_case_study_link: String,
    pub model: String,
    pub temperature: f32,
    pub blog_max_tokens: u32,
    pub case_study_max_tokens: u32,
    pub lock_ttl: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            topics: TopicTable::default(),
            case_study_probability: 0.4,
            recency_threshold_days: 2.0,
            recent_titles_limit: 5,
            approved_sources: DEFAULT_APPROVED_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback_case_study_link: "https://www.thoughtworks.com/radar".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            blog_max_tokens: 1200,
            case_study_max_tokens: 1500,
            lock_ttl: Duration::from_secs(300),
        }
    }
}

impl GenerationSettings {
    /// Token budget for a completion of the given type.
    pub fn max_tokens(&self, post_type: PostType) -> u32 {
        match post_type {
            PostType::Blog => self.blog_max_tokens,
            PostType::CaseStudy => self.case_study_max_tokens,
        }
    }

    /// Replace the topic table, rejecting empty tables and zero weights.
    pub fn with_topics(mut self, weights: Vec<TopicWeight>) -> Result<Self, ValidationError> {
        self.topics = TopicTable::new(weights)?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.case_study_probability) {
            return Err(ValidationError::InvalidFormat {
                field: "case_study_probability",
                reason: format!("{} is not within 0..=1", self.case_study_probability),
            });
        }
        if self.recency_threshold_days < 0.0 {
            return Err(ValidationError::InvalidFormat {
                field: "recency_threshold_days",
                reason: "must not be negative".to_string(),
            });
        }
        if self.fallback_case_study_link.trim().is_empty() {
            return Err(ValidationError::MissingField("fallback_case_study_link"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GenerationSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.max_tokens(PostType::CaseStudy), 1500);
        assert_eq!(settings.max_tokens(PostType::Blog), 1200);
        assert_eq!(settings.topics.total_weight(), 103);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let settings = GenerationSettings {
            case_study_probability: 1.5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_with_topics_rejects_empty() {
        assert!(GenerationSettings::default().with_topics(vec![]).is_err());
    }
}
