//! Topic and content-type selection.

use rand::Rng;

use crate::domain::PostType;
use crate::error::ValidationError;

use super::settings::DEFAULT_TOPIC_WEIGHTS;

/// A topic and its relative sampling weight (≥ 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicWeight {
    pub topic: String,
    pub weight: u32,
}

impl TopicWeight {
    pub fn new(topic: impl Into<String>, weight: u32) -> Self {
        Self {
            topic: topic.into(),
            weight,
        }
    }
}

/// Roulette-wheel pick over `weights`. `None` only when the total weight is zero.
pub fn pick_topic<'a, R: Rng + ?Sized>(weights: &'a [TopicWeight], rng: &mut R) -> Option<&'a str> {
    let total: u64 = weights.iter().map(|w| u64::from(w.weight)).sum();
    if total == 0 {
        return None;
    }
    let r = rng.gen_range(0.0..total as f64);
    walk(weights, r)
}

fn walk(weights: &[TopicWeight], mut r: f64) -> Option<&str> {
    for entry in weights {
        r -= f64::from(entry.weight);
        if r <= 0.0 {
            return Some(&entry.topic);
        }
    }
    // Float drift can leave a sliver of `r`; the last entry absorbs it.
    weights.last().map(|w| w.topic.as_str())
}

/// `CaseStudy` with probability `p`, otherwise `Blog`.
pub fn choose_type<R: Rng + ?Sized>(p: f64, rng: &mut R) -> PostType {
    if rng.r#gen::<f64>() < p {
        PostType::CaseStudy
    } else {
        PostType::Blog
    }
}

/// Non-empty topic table with every weight ≥ 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicTable {
    entries: Vec<TopicWeight>,
}

impl TopicTable {
    pub fn new(entries: Vec<TopicWeight>) -> Result<Self, ValidationError> {
        if entries.is_empty() {
            return Err(ValidationError::MissingField("topic_weights"));
        }
        if let Some(bad) = entries.iter().find(|e| e.weight == 0) {
            return Err(ValidationError::InvalidFormat {
                field: "topic_weights",
                reason: format!("topic '{}' has weight 0", bad.topic),
            });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TopicWeight] {
        &self.entries
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|w| u64::from(w.weight)).sum()
    }

    pub fn contains(&self, topic: &str) -> bool {
        self.entries.iter().any(|e| e.topic == topic)
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        pick_topic(&self.entries, rng).unwrap_or_default()
    }
}

impl Default for TopicTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TOPIC_WEIGHTS
                .iter()
                .map(|(topic, weight)| TopicWeight::new(*topic, *weight))
                .collect(),
        }
    }
}
