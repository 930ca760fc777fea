//! Contact-form and lead intake payloads.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Message submitted through the public contact form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// Every field is required and the address must look deliverable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("subject", &self.subject)?;
        require("message", &self.message)?;
        check_email(&self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Website,
    Chatbot,
    Consulting,
    Fullstack,
    #[default]
    Other,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::Website => "website",
            ProjectType::Chatbot => "chatbot",
            ProjectType::Consulting => "consulting",
            ProjectType::Fullstack => "fullstack",
            ProjectType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
    Starter,
    Professional,
    Enterprise,
    #[default]
    Custom,
}

impl Budget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Budget::Starter => "starter",
            Budget::Professional => "professional",
            Budget::Enterprise => "enterprise",
            Budget::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "asap")]
    Asap,
    #[serde(rename = "1-3months")]
    OneToThreeMonths,
    #[serde(rename = "3-6months")]
    ThreeToSixMonths,
    #[default]
    #[serde(rename = "flexible")]
    Flexible,
}

impl Timeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Asap => "asap",
            Timeline::OneToThreeMonths => "1-3months",
            Timeline::ThreeToSixMonths => "3-6months",
            Timeline::Flexible => "flexible",
        }
    }
}

/// Triage bucket for an incoming lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeadPriority {
    High,
    Medium,
    Standard,
}

impl LeadPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::High => "HIGH",
            LeadPriority::Medium => "MEDIUM",
            LeadPriority::Standard => "STANDARD",
        }
    }
}

/// Project inquiry captured by the site's lead form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub company: Option<String>,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub description: String,
    pub phone: Option<String>,
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("description", &self.description)?;
        check_email(&self.email)
    }

    pub fn priority(&self) -> LeadPriority {
        match (self.budget, self.timeline) {
            (Budget::Enterprise, Timeline::Asap) => LeadPriority::High,
            (Budget::Professional, Timeline::Asap | Timeline::OneToThreeMonths) => {
                LeadPriority::Medium
            }
            _ => LeadPriority::Standard,
        }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "email",
            reason: "expected an address like name@example.com".to_string(),
        })
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
