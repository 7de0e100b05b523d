use crate::{
    api::{
        attendance, department, employee,
        error::{json_error_handler, path_error_handler},
    },
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{Scope, web};
use anyhow::anyhow;
use std::sync::Arc;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per peer IP, spread over a minute with the whole allowance as burst.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let per_ms = (60_000 / requests_per_min.max(1) as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests per minute"))?;
    Ok(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Arc<Limiter>) {
    extractors(cfg);
    cfg.service(api_scope(&config.api_prefix).wrap(limiter));
}

/// Same routes without the rate limiter, which needs a peer address.
#[cfg(test)]
pub fn configure_unlimited(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    extractors(cfg);
    cfg.service(api_scope(api_prefix));
}

fn extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}

fn api_scope(api_prefix: &str) -> Scope {
    web::scope(api_prefix)
        .service(
            web::scope("/departments")
                // /departments
                .service(
                    web::resource("")
                        .route(web::post().to(department::create_department))
                        .route(web::get().to(department::list_departments)),
                )
                // /departments/{id}
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(department::get_department))
                        .route(web::delete().to(department::delete_department)),
                ),
        )
        .service(
            web::scope("/employees")
                // /employees
                .service(
                    web::resource("")
                        .route(web::post().to(employee::create_employee))
                        .route(web::get().to(employee::list_employees)),
                )
                // /employees/{id}, no delete
                .service(web::resource("/{id}").route(web::get().to(employee::get_employee)))
                // /employees/{employee_id}/attendance
                .service(
                    web::resource("/{employee_id}/attendance")
                        .route(web::post().to(attendance::create_attendance))
                        .route(web::get().to(attendance::list_attendance)),
                )
                // /employees/{employee_id}/attendance/{id}
                .service(
                    web::resource("/{employee_id}/attendance/{id}")
                        .route(web::delete().to(attendance::delete_attendance)),
                ),
        )
}
