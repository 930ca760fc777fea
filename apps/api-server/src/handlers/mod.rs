//! HTTP handlers and route configuration.

mod blog;
mod contact;
mod cron;
mod health;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimit;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/blog")
                    .route("", web::get().to(blog::list_posts))
                    .route("/generate", web::post().to(blog::generate_post))
                    .route("/{id}", web::get().to(blog::get_post)),
            )
            .route(
                "/cron/generate-content",
                web::get().to(cron::generate_content),
            )
            // Public forms, rate limited per client IP
            .service(
                web::resource("/contact")
                    .wrap(RateLimit)
                    .route(web::post().to(contact::submit_contact)),
            )
            .service(
                web::resource("/send-lead")
                    .wrap(RateLimit)
                    .route(web::post().to(contact::submit_lead)),
            ),
    );
}
