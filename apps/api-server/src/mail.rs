//! Email composition for the contact and lead endpoints.
//!
//! Every user-supplied value passes through `ammonia::clean_text` before it
//! lands in markup.

use std::sync::Arc;

use ammonia::clean_text;
use chrono::{DateTime, Utc};

use folio_core::domain::{ContactMessage, LeadPriority, LeadSubmission};
use folio_core::ports::{EmailMessage, Mailer};

/// Configured mailer plus the fixed sender and owner addresses.
#[derive(Clone)]
pub struct Outbox {
    pub mailer: Arc<dyn Mailer>,
    pub from: String,
    pub owner: String,
}

impl Outbox {
    pub fn new(mailer: Arc<dyn Mailer>, from: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            mailer,
            from: from.into(),
            owner: owner.into(),
        }
    }

    /// Notification to the owner; replies go straight to the sender.
    pub fn contact_notification(&self, msg: &ContactMessage, at: DateTime<Utc>) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: vec![self.owner.clone()],
            subject: format!("New Potential Client: {}", msg.subject.trim()),
            html: render_contact(msg, at),
            reply_to: Some(msg.email.trim().to_string()),
        }
    }

    pub fn lead_notification(
        &self,
        lead: &LeadSubmission,
        priority: LeadPriority,
        at: DateTime<Utc>,
    ) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: vec![self.owner.clone()],
            subject: format!(
                "{} Priority Lead: {} wants {} services",
                priority.as_str(),
                lead.name.trim(),
                lead.project_type.as_str()
            ),
            html: render_lead(lead, priority, at),
            reply_to: Some(lead.email.trim().to_string()),
        }
    }

    /// Acknowledgement sent back to the prospect.
    pub fn lead_welcome(&self, lead: &LeadSubmission) -> EmailMessage {
        EmailMessage {
            from: self.from.clone(),
            to: vec![lead.email.trim().to_string()],
            subject: format!("Thanks for your inquiry, {}!", lead.name.trim()),
            html: render_welcome(lead),
            reply_to: None,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_contact(msg: &ContactMessage, at: DateTime<Utc>) -> String {
    let email = clean_text(msg.email.trim());
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="color: #0033A0;">New Contact Form Submission</h1>
  <h3>Contact Details</h3>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
  <p><strong>Subject:</strong> {subject}</p>
  <h3>Message</h3>
  <div style="white-space: pre-wrap;">{message}</div>
  <p style="color: #666; font-size: 14px;">Sent from the portfolio contact form at {time}</p>
</body>
</html>"#,
        name = clean_text(msg.name.trim()),
        subject = clean_text(msg.subject.trim()),
        message = clean_text(msg.message.trim()),
        time = at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn priority_colour(priority: LeadPriority) -> &'static str {
    match priority {
        LeadPriority::High => "#dc3545",
        LeadPriority::Medium => "#ffc107",
        LeadPriority::Standard => "#28a745",
    }
}

fn render_lead(lead: &LeadSubmission, priority: LeadPriority, at: DateTime<Utc>) -> String {
    let email = clean_text(lead.email.trim());
    let optional_row = |label: &str, value: &Option<String>| match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => format!("<p><strong>{label}:</strong> {}</p>\n  ", clean_text(v)),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>New {priority} Lead!</h1>
  <p>{project} Project Inquiry</p>
  <span style="padding: 8px 16px; background-color: {colour}; color: #ffffff; border-radius: 20px;">{priority} Priority</span>
  <h2>Lead Information</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
  {phone}{company}<h2>Project Details</h2>
  <p><strong>Project Type:</strong> {project_type}</p>
  <p><strong>Budget:</strong> {budget}</p>
  <p><strong>Timeline:</strong> {timeline}</p>
  <h2>Project Description</h2>
  <p style="white-space: pre-wrap;">{description}</p>
  <p style="color: #a0aec0; font-size: 12px;">Lead received {time}</p>
</body>
</html>"#,
        priority = priority.as_str(),
        project = capitalize(lead.project_type.as_str()),
        colour = priority_colour(priority),
        name = clean_text(lead.name.trim()),
        phone = optional_row("Phone", &lead.phone),
        company = optional_row("Company", &lead.company),
        project_type = lead.project_type.as_str(),
        budget = lead.budget.as_str(),
        timeline = lead.timeline.as_str(),
        description = clean_text(lead.description.trim()),
        time = at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn render_welcome(lead: &LeadSubmission) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto;">
  <h1>Hello {name}!</h1>
  <p>Thank you for reaching out.</p>
  <h2>Your {project} Project Inquiry</h2>
  <p>I've received your message and will review your project needs carefully. I'll be in touch shortly with next steps.</p>
  <p><strong>Best regards</strong></p>
</body>
</html>"#,
        name = clean_text(lead.name.trim()),
        project = capitalize(lead.project_type.as_str()),
    )
}
