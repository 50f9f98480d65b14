use actix_web::{web, HttpResponse, Responder};
use mongodb::{bson::doc, Client};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use crate::db::mongo::DATABASE;

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

pub async fn health_check(client: web::Data<Arc<Client>>) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let mongo_result = check_mongodb(&client).await;
    health
        .services
        .insert("mongodb".to_string(), mongo_result.clone());

    let gateway_result = check_razorpay();
    health
        .services
        .insert("razorpay".to_string(), gateway_result.clone());

    let smtp_result = check_smtp();
    health.services.insert("smtp".to_string(), smtp_result.clone());

    if mongo_result.status != "ok"
        || gateway_result.status != "ok"
        || smtp_result.status != "ok"
    {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

async fn check_mongodb(client: &web::Data<Arc<Client>>) -> ServiceStatus {
    match client.database(DATABASE).run_command(doc! {"ping": 1}).await {
        Ok(_) => ServiceStatus {
            status: "ok".to_string(),
            details: Some("Connected successfully to MongoDB".to_string()),
        },
        Err(e) => {
            log::error!("MongoDB health check failed: {}", e);

            ServiceStatus {
                status: "error".to_string(),
                details: Some(format!("Failed to connect: {}", e)),
            }
        }
    }
}

fn check_razorpay() -> ServiceStatus {
    // Key presence only; an API round trip on every probe would be noisy
    match (env::var("RAZORPAY_KEY_ID"), env::var("RAZORPAY_KEY_SECRET")) {
        (Ok(key_id), Ok(_)) => {
            let masked_key = if key_id.len() > 8 {
                format!("{}***{}", &key_id[0..4], &key_id[key_id.len() - 4..])
            } else {
                "***".to_string()
            };

            ServiceStatus {
                status: "ok".to_string(),
                details: Some(format!("Razorpay keys configured ({})", masked_key)),
            }
        }
        _ => ServiceStatus {
            status: "error".to_string(),
            details: Some("RAZORPAY_KEY_ID / RAZORPAY_KEY_SECRET not configured".to_string()),
        },
    }
}

fn check_smtp() -> ServiceStatus {
    let mut missing = Vec::new();

    if env::var("SMTP_SERVER").is_err() {
        missing.push("SMTP_SERVER");
    }
    if env::var("SMTP_USERNAME").is_err() {
        missing.push("SMTP_USERNAME");
    }
    if env::var("SMTP_PASSWORD").is_err() {
        missing.push("SMTP_PASSWORD");
    }
    if env::var("SMTP_FROM").is_err() {
        missing.push("SMTP_FROM");
    }

    if missing.is_empty() {
        ServiceStatus {
            status: "ok".to_string(),
            details: Some("SMTP configured".to_string()),
        }
    } else {
        ServiceStatus {
            status: "error".to_string(),
            details: Some(format!("Missing configuration: {}", missing.join(", "))),
        }
    }
}
