use actix_web::{web, HttpResponse, Responder};
use mongodb::Client;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::mongo::ping;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    /health
*/
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: state.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let database_result = match &state.mongo {
        Some(client) => check_mongodb(client).await,
        None => ServiceStatus {
            status: "ok".to_string(),
            details: Some("In-memory storage".to_string()),
        },
    };
    health
        .services
        .insert("database".to_string(), database_result.clone());

    if database_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &Client) -> ServiceStatus {
    match ping(client).await {
        Ok(()) => ServiceStatus {
            status: "ok".to_string(),
            details: None,
        },
        Err(e) => {
            log::warn!("MongoDB health check failed: {}", e);
            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}
