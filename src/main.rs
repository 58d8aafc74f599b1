use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use eventease::web::routes::{attendance, events, leaderboard, participants};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());
    println!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Cannot connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Migrations failed");

    let app = Router::new()
        .route("/events", post(events::create_event_handler))
        .route("/events/:event_id/register", post(events::register_handler))
        .route("/events/:event_id/cancel", post(events::cancel_handler))
        .route("/events/:event_id/slots", get(events::slots_handler))
        .route(
            "/registrations/:registration_id/attend",
            post(attendance::attend_handler),
        )
        .route("/leaderboard", get(leaderboard::leaderboard_handler))
        .route(
            "/participants",
            post(participants::create_participant_handler),
        )
        .route(
            "/participants/:participant_id",
            get(participants::get_participant_handler),
        )
        .route(
            "/participants/:participant_id/transactions",
            get(participants::list_transactions_handler),
        )
        .route(
            "/participants/:participant_id/registrations",
            get(participants::list_registrations_handler),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "Could not bind {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                fallback_port(port)
            );
            let fallback: SocketAddr = format!("{}:{}", host, fallback_port(port))
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().expect("No local address");
    println!("Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.expect("Server failed");
}

// PORT=65535 must not wrap the fallback to port 0.
fn fallback_port(port: u16) -> u16 {
    port.saturating_add(1)
}
