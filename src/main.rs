use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use kshetra_api::db;
use kshetra_api::routes;
use kshetra_api::services::coupon_service::CouponService;
use kshetra_api::services::email_service::EmailService;
use kshetra_api::services::razorpay::provider::RazorpayProvider;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| HOST.to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| PORT.to_string())
        .parse()
        .unwrap_or(PORT);
    println!("Attempting to bind to {}:{}", host, port);

    let mongo_uri = std::env::var("MONGODB_URI").expect("MONGODB_URI must be set");
    let client = db::mongo::create_mongo_client(&mongo_uri).await;

    let gateway =
        RazorpayProvider::from_env().expect("RAZORPAY_KEY_ID and RAZORPAY_KEY_SECRET must be set");
    let coupons = CouponService::from_env();
    let mailer = EmailService::from_env();

    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(coupons.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .route("/health", web::get().to(routes::health::health_check))
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/bookings")
                            .route(
                                "/public",
                                web::post().to(routes::booking::create_public_booking),
                            )
                            .route("/{id}", web::get().to(routes::booking::get_by_id)),
                    )
                    .service(
                        web::scope("/drafts")
                            .route(
                                "/{session_id}",
                                web::put().to(routes::draft::upsert_draft),
                            )
                            .route("/{session_id}", web::get().to(routes::draft::get_draft))
                            .route(
                                "/{session_id}",
                                web::delete().to(routes::draft::delete_draft),
                            ),
                    )
                    .service(
                        web::scope("/payments")
                            .route("/order", web::post().to(routes::payment::create_order))
                            .route("/verify", web::post().to(routes::payment::verify_payment))
                            .route("/failed", web::post().to(routes::payment::payment_failed)),
                    ),
            )
    })
    .bind((host, port))?
    .run()
    .await
}
