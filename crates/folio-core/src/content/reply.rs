//! Decoding and normalizing the model's JSON reply.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Metrics, NewPost, PostType, Source};
use crate::error::GenerationError;

/// A successfully decoded completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub metrics: Option<Metrics>,
    pub sources: Vec<Source>,
    pub case_study_link: Option<String>,
}

impl GeneratedContent {
    pub fn into_new_post(self, topic: String, post_type: PostType) -> NewPost {
        NewPost {
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            post_type,
            topic,
            metrics: self.metrics,
            sources: self.sources,
            case_study_link: self.case_study_link,
        }
    }
}

#[derive(Deserialize)]
struct RawReply {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    #[serde(default)]
    metrics: Option<Value>,
    #[serde(default)]
    sources: Option<Value>,
    #[serde(default, rename = "caseStudyLink", alias = "case_study_link")]
    case_study_link: Option<Value>,
}

/// Strictly decode the reply text.
///
/// `title`, `content` and `excerpt` must be present non-blank strings.
/// Optional extras that fail to decode are dropped rather than failing the
/// whole reply.
pub fn parse_reply(raw: &str) -> Result<GeneratedContent, GenerationError> {
    let reply: RawReply = serde_json::from_str(raw.trim())
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON object: {e}")))?;

    let metrics = match reply.metrics {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value::<Metrics>(v) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding mis-shaped metrics");
                None
            }
        },
    };

    let sources = match reply.sources {
        None | Some(Value::Null) => Vec::new(),
        Some(v) => serde_json::from_value::<Vec<Source>>(v).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding mis-shaped sources");
            Vec::new()
        }),
    };

    let case_study_link = match reply.case_study_link {
        Some(Value::String(link)) => Some(link),
        _ => None,
    };

    Ok(GeneratedContent {
        title: required("title", reply.title)?,
        content: required("content", reply.content)?,
        excerpt: required("excerpt", reply.excerpt)?,
        metrics,
        sources,
        case_study_link,
    })
}

fn required(field: &str, value: Option<String>) -> Result<String, GenerationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(GenerationError::MalformedResponse(format!(
            "field '{field}' is blank"
        ))),
        None => Err(GenerationError::MalformedResponse(format!(
            "field '{field}' is missing"
        ))),
    }
}

/// Enforce the link policy: case studies always carry a usable link, blogs
/// never carry one.
pub fn normalize(
    mut content: GeneratedContent,
    post_type: PostType,
    fallback_link: &str,
) -> GeneratedContent {
    content.case_study_link = match post_type {
        PostType::Blog => None,
        PostType::CaseStudy => Some(
            content
                .case_study_link
                .as_deref()
                .map(str::trim)
                .filter(|link| is_usable_link(link))
                .unwrap_or(fallback_link)
                .to_string(),
        ),
    };
    content
}

fn is_usable_link(link: &str) -> bool {
    if link.eq_ignore_ascii_case("null") {
        return false;
    }
    url::Url::parse(link)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "https://www.thoughtworks.com/radar";

    #[test]
    fn test_parse_minimal_reply() {
        let parsed = parse_reply(r#"{"title":"T","content":"C","excerpt":"E"}"#).unwrap();
        assert_eq!(parsed.title, "T");
        assert_eq!(parsed.metrics, None);
        assert!(parsed.sources.is_empty());
        assert_eq!(parsed.case_study_link, None);
    }

    #[test]
    fn test_parse_full_reply() {
        let parsed = parse_reply(
            r#"{
                "title": "Contract testing at scale",
                "content": "Body",
                "excerpt": "Short",
                "metrics": {"percentage": 35, "description": "fewer integration failures"},
                "sources": [{"title": "Pact", "url": "https://docs.pact.io"}],
                "caseStudyLink": "https://martinfowler.com/articles/consumerDrivenContracts.html"
            }"#,
        )
        .unwrap();

        assert_eq!(
            parsed.metrics,
            Some(Metrics {
                percentage: 35.0,
                description: "fewer integration failures".into()
            })
        );
        assert_eq!(parsed.sources.len(), 1);
        assert!(parsed.case_study_link.is_some());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let err = parse_reply("not json").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_missing_and_blank_fields() {
        assert!(matches!(
            parse_reply(r#"{"title":"T","content":"C"}"#),
            Err(GenerationError::MalformedResponse(msg)) if msg.contains("excerpt")
        ));
        assert!(matches!(
            parse_reply(r#"{"title":"  ","content":"C","excerpt":"E"}"#),
            Err(GenerationError::MalformedResponse(msg)) if msg.contains("title")
        ));
    }

    #[test]
    fn test_parse_drops_misshaped_extras() {
        let parsed = parse_reply(
            r#"{"title":"T","content":"C","excerpt":"E","metrics":"35%","sources":{"a":1}}"#,
        )
        .unwrap();
        assert_eq!(parsed.metrics, None);
        assert!(parsed.sources.is_empty());
    }

    fn content_with_link(link: Option<&str>) -> GeneratedContent {
        GeneratedContent {
            title: "T".into(),
            content: "C".into(),
            excerpt: "E".into(),
            metrics: None,
            sources: vec![],
            case_study_link: link.map(String::from),
        }
    }

    #[test]
    fn test_case_study_link_falls_back() {
        for link in [None, Some("null"), Some("NULL"), Some("  "), Some("not a url"), Some("ftp://x.y")] {
            let normalized = normalize(content_with_link(link), PostType::CaseStudy, FALLBACK);
            assert_eq!(normalized.case_study_link.as_deref(), Some(FALLBACK), "{link:?}");
        }
    }

    #[test]
    fn test_case_study_link_kept_when_usable() {
        let link = "https://owasp.org/Top10/";
        let normalized = normalize(content_with_link(Some(link)), PostType::CaseStudy, FALLBACK);
        assert_eq!(normalized.case_study_link.as_deref(), Some(link));
    }

    #[test]
    fn test_blog_link_always_cleared() {
        let normalized = normalize(
            content_with_link(Some("https://owasp.org")),
            PostType::Blog,
            FALLBACK,
        );
        assert_eq!(normalized.case_study_link, None);
    }

    #[test]
    fn test_null_link_parses_as_absent() {
        let parsed =
            parse_reply(r#"{"title":"T","content":"C","excerpt":"E","caseStudyLink":null}"#)
                .unwrap();
        assert_eq!(parsed.case_study_link, None);
    }
}
