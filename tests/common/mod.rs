#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use serde_json::{json, Value};

use voyage_api::models::listing::RawListing;
use voyage_api::routes;
use voyage_api::services::catalog_service::InMemoryCatalog;
use voyage_api::state::AppState;

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_listings(Vec::new())
    }

    pub fn with_listings(values: Vec<Value>) -> Self {
        let catalog = InMemoryCatalog::new(RawListing::from_values(values));
        Self {
            state: AppState::in_memory(catalog),
        }
    }

    pub fn with_sample_listings() -> Self {
        Self::with_listings(sample_listings())
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    }
}

/// Five listings with departures far enough out that the early-bird windows
/// and date sorting do not depend on when the tests run.
///
/// Discounted prices: rishikesh 300, stargazing 600, goa 900, ladakh 1400, surf 12000.
pub fn sample_listings() -> Vec<Value> {
    vec![
        json!({
            "_id": "trip-ladakh",
            "itemType": "trip",
            "title": "Ladakh Bike Expedition",
            "destination": "Leh",
            "tripType": "Adventure",
            "startDate": "2099-06-10",
            "endDate": "2099-06-18",
            "accommodationItems": [{ "cost": 1000 }],
            "transportationItems": [{ "cost": 500 }],
            "bufferPercentage": 10,
            "yourFee": 100,
            "allowEarlyBooking": true,
            "discountPercentage": 20,
            "endDateInclusive": "2099-01-01",
            "ratings": [{ "rating": 5 }, { "rating": 4 }]
        }),
        json!({
            "_id": "trip-goa",
            "itemType": "trip",
            "title": "Goa Beach Escape",
            "destination": "Goa",
            "tripType": "Leisure",
            "startDate": "2099-03-05",
            "endDate": "2099-03-08",
            "totalPrice": 900
        }),
        json!({
            "_id": "event-stargazing",
            "itemType": "event",
            "title": "Spiti Stargazing Night",
            "guide": "Tenzin",
            "location": "Kaza",
            "category": "Astronomy",
            "price": 600,
            "eventDate": "2099-09-20T19:00:00Z"
        }),
        json!({
            "_id": "school-surf",
            "name": "Kovalam Surf School",
            "tags": ["Surfing", "Beginner"],
            "packages": [{
                "title": "Learn to Surf",
                "price": 12000,
                "duration": "5 Days / 4 Nights",
                "location": "Kovalam",
                "startDate": "2099-11-01"
            }]
        }),
        json!({
            "_id": "trip-rishikesh",
            "itemType": "trip",
            "title": "Rishikesh Retreat",
            "destination": "Rishikesh",
            "tripType": "Wellness",
            "flexibleDates": true,
            "durationDays": 3,
            "accommodationItems": [{ "cost": 300 }]
        }),
    ]
}

pub fn ids(body: &Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
