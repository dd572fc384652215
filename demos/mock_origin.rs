use axum::{routing::get, Router};
use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/", get(|| async { "Hello from the pretend origin!" }))
        .route(
            "/page",
            get(|| async { "<html><body>A page crawlers ask to have rendered</body></html>" }),
        );

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    println!("Pretend origin is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
