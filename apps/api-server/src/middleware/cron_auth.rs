//! Bearer-secret guard for the scheduled generation trigger.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use subtle::ConstantTimeEq;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Proof that the request carried `Authorization: Bearer <CRON_SECRET>`.
///
/// Every request is rejected when no secret is configured.
#[derive(Debug, Clone, Copy)]
pub struct CronCaller;

impl FromRequest for CronCaller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AppError::Internal("missing application state".into())));
        };

        let Some(secret) = state.cron_secret.as_deref() else {
            tracing::warn!("Cron trigger refused: no secret configured");
            return ready(Err(AppError::Unauthorized));
        };

        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match presented {
            Some(token) if secrets_match(token, secret) => ready(Ok(CronCaller)),
            _ => {
                tracing::warn!("Cron trigger refused: bad or missing bearer token");
                ready(Err(AppError::Unauthorized))
            }
        }
    }
}

fn secrets_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("s3cret", "s3cret"));
        assert!(!secrets_match("s3cret", "s3cre"));
        assert!(!secrets_match("", "s3cret"));
        assert!(!secrets_match("S3CRET", "s3cret"));
    }
}
