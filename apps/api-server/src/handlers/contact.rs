//! Contact form and lead intake.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;

use folio_core::domain::{ContactMessage, LeadSubmission};
use folio_shared::dto::{ContactResponse, LeadResponse};

use crate::mail::Outbox;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLeadRequest {
    pub lead_data: Option<LeadSubmission>,
}

fn outbox(state: &AppState) -> AppResult<&Outbox> {
    state
        .outbox
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Email service not configured".to_string()))
}

/// POST /api/contact
pub async fn submit_contact(
    state: web::Data<AppState>,
    body: web::Json<ContactMessage>,
) -> AppResult<HttpResponse> {
    let outbox = outbox(&state)?;
    let message = body.into_inner();
    message.validate()?;

    let email_id = outbox
        .mailer
        .send(outbox.contact_notification(&message, Utc::now()))
        .await?;

    tracing::info!(email_id = %email_id, "Contact form forwarded");

    Ok(HttpResponse::Ok().json(ContactResponse {
        success: true,
        message: "Form submitted successfully".to_string(),
        email_id,
    }))
}

/// POST /api/send-lead
pub async fn submit_lead(
    state: web::Data<AppState>,
    body: web::Json<SendLeadRequest>,
) -> AppResult<HttpResponse> {
    let outbox = outbox(&state)?;
    let lead = body.into_inner().lead_data.ok_or_else(|| {
        AppError::BadRequest(
            "Missing required fields: name, email, and description are required".to_string(),
        )
    })?;
    lead.validate()?;

    let priority = lead.priority();
    let notification = outbox.lead_notification(&lead, priority, Utc::now());
    let welcome = outbox.lead_welcome(&lead);

    let (lead_notification_id, welcome_email_id) = futures::try_join!(
        outbox.mailer.send(notification),
        outbox.mailer.send(welcome)
    )?;

    tracing::info!(
        priority = priority.as_str(),
        lead_notification_id = %lead_notification_id,
        welcome_email_id = %welcome_email_id,
        "Lead submitted"
    );

    Ok(HttpResponse::Ok().json(LeadResponse {
        success: true,
        message: "Lead submitted successfully".to_string(),
        lead_notification_id,
        welcome_email_id,
    }))
}
