use actix_web::web;

pub mod account;
pub mod health;
pub mod listing;
pub mod pricing;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .route("/pricing/quote", web::post().to(pricing::create_quote))
                .service(
                    web::scope("/listings")
                        .route("", web::get().to(listing::get_listings))
                        .route("/normalize", web::post().to(listing::normalize_listings))
                        .route("/search", web::post().to(listing::search_listings)),
                )
                .service(
                    web::scope("/account/{user_id}/saved")
                        .route("", web::get().to(account::saved_items::get_saved))
                        .route(
                            "/listings",
                            web::get().to(account::saved_items::get_saved_listings),
                        )
                        .route(
                            "/{item_id}",
                            web::get().to(account::saved_items::is_saved),
                        )
                        .route(
                            "/{item_id}/toggle",
                            web::post().to(account::saved_items::toggle_saved),
                        ),
                ),
        );
}
