use tokio::net::TcpListener;

/// Serves the client test fixtures on `127.0.0.1:$PORT` (default 3000):
///
/// - `ANY /echo` reflects method, query, headers and body as JSON
/// - `GET /status/{code}` answers with the given status
/// - `GET /slow/{ms}` answers after a delay
/// - `GET /flaky/{key}?failures=N` fails with 503 N times, then succeeds
/// - `GET /hits/{key}` reports how often `/flaky/{key}` was hit
/// - `GET /items/{id}` and `GET /malformed` serve decodable and undecodable 200s
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock server listening on http://{addr}");
    mock_server::run(listener).await
}
