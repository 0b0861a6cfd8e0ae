use crate::{
    api::{alert, attendance, employee, geofence, policy},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let attendance_limiter = Arc::new(build_limiter(config.rate_attendance_per_min));
    let admin_limiter = Arc::new(build_limiter(config.rate_admin_per_min));
    let query_limiter = Arc::new(build_limiter(config.rate_query_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    // event endpoints share the tighter attendance budget
                    .service(
                        web::resource("/check-in")
                            .wrap(attendance_limiter.clone())
                            .route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out")
                            .wrap(attendance_limiter.clone())
                            .route(web::put().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/break/start")
                            .wrap(attendance_limiter.clone())
                            .route(web::post().to(attendance::break_start)),
                    )
                    .service(
                        web::resource("/break/end")
                            .wrap(attendance_limiter.clone())
                            .route(web::post().to(attendance::break_end)),
                    )
                    // /attendance/status is a pure read, looser budget
                    .service(
                        web::resource("/status")
                            .wrap(query_limiter.clone())
                            .route(web::get().to(attendance::current_status)),
                    ),
            )
            .service(
                web::scope("/employees")
                    .wrap(admin_limiter.clone())
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            .service(
                web::scope("/policies")
                    .wrap(admin_limiter.clone())
                    .service(
                        web::resource("")
                            .route(web::get().to(policy::list_policies))
                            .route(web::post().to(policy::create_policy)),
                    )
                    .service(web::resource("/{id}").route(web::put().to(policy::update_policy))),
            )
            .service(
                web::scope("/geofences")
                    .wrap(admin_limiter)
                    .service(
                        web::resource("")
                            .route(web::get().to(geofence::list_geofences))
                            .route(web::post().to(geofence::create_geofence)),
                    )
                    .service(
                        web::resource("/{id}").route(web::put().to(geofence::update_geofence)),
                    ),
            )
            .service(
                web::scope("/alerts")
                    .wrap(query_limiter)
                    // /alerts
                    .service(web::resource("").route(web::get().to(alert::alert_list)))
                    // /alerts/{id}/resolve
                    .service(
                        web::resource("/{id}/resolve")
                            .route(web::put().to(alert::resolve_alert)),
                    ),
            ),
    );
}
