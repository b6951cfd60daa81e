use crate::{
    api::{manager, notification, vacation_request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
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

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/auth/me").route(web::get().to(handlers::me)))
            .service(
                web::scope("/vacation-requests")
                    // /vacation-requests
                    .service(
                        web::resource("")
                            .route(web::get().to(vacation_request::list_requests))
                            .route(web::post().to(vacation_request::create_request)),
                    )
                    // /vacation-requests/validate (before the {id} matcher)
                    .service(
                        web::resource("/validate")
                            .route(web::post().to(vacation_request::validate_request)),
                    )
                    // /vacation-requests/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(vacation_request::get_request))
                            .route(web::put().to(vacation_request::update_request))
                            .route(web::delete().to(vacation_request::cancel_request)),
                    )
                    // /vacation-requests/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(manager::approve_request)),
                    )
                    // /vacation-requests/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(manager::reject_request)),
                    ),
            )
            .service(
                web::scope("/manager")
                    .service(
                        web::resource("/pending-requests")
                            .route(web::get().to(manager::pending_requests)),
                    )
                    .service(
                        web::resource("/team-calendar")
                            .route(web::get().to(manager::team_calendar)),
                    )
                    .service(
                        web::resource("/team-stats").route(web::get().to(manager::team_stats)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .service(
                        web::resource("")
                            .route(web::get().to(notification::list_notifications)),
                    )
                    .service(
                        web::resource("/read-all")
                            .route(web::put().to(notification::mark_all_read)),
                    )
                    .service(
                        web::resource("/{id}/read").route(web::put().to(notification::mark_read)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ returns new access_token
