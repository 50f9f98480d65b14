use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use mongodb::options::ClientOptions;
use std::sync::Arc;
use std::time::Duration;

use kshetra_api::routes;
use kshetra_api::services::coupon_service::CouponService;
use kshetra_api::services::email_service::EmailService;
use kshetra_api::services::razorpay::provider::RazorpayProvider;

pub const TEST_GATEWAY_KEY_ID: &str = "rzp_test_key";
pub const TEST_GATEWAY_SECRET: &str = "test_secret";

/// Tests that drive the full persistence path need a reachable database;
/// they bail out early instead of failing where none is available.
#[allow(dead_code)]
pub async fn mongo_available(client: &mongodb::Client) -> bool {
    client
        .database(kshetra_api::db::mongo::DATABASE)
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
        .is_ok()
}

pub struct TestApp {
    pub client: Arc<mongodb::Client>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mongo_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        // Short timeouts so tests that never reach the database stay fast
        let mut options = ClientOptions::parse(&mongo_uri)
            .await
            .expect("invalid test MongoDB URI");
        options.connect_timeout = Some(Duration::from_secs(1));
        options.server_selection_timeout = Some(Duration::from_secs(1));
        let client = mongodb::Client::with_options(options).expect("failed to build test client");

        Self {
            client: Arc::new(client),
        }
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
        let gateway =
            RazorpayProvider::new(TEST_GATEWAY_KEY_ID.into(), TEST_GATEWAY_SECRET.into())
                .expect("failed to build test gateway");
        let coupons = CouponService::new(None);
        let mailer = EmailService::from_env();

        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(web::Data::new(self.client.clone()))
            .app_data(web::Data::new(gateway))
            .app_data(web::Data::new(coupons))
            .app_data(web::Data::new(mailer))
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
                            .route("/{session_id}", web::put().to(routes::draft::upsert_draft))
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
    }
}
