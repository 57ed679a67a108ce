use std::io;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter(Arc::clone(&self.0))
    }
}

impl io::Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(f: impl FnOnce()) -> Vec<serde_json::Value> {
    let sink = SharedBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(sink.clone())
        .json()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = sink.0.lock().expect("lock output").clone();
    let text = String::from_utf8(bytes).expect("utf8 log output");
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("json log line"))
        .collect()
}

#[test]
fn request_span_fields_are_structured_json() {
    let lines = capture(|| {
        let span = tracing::info_span!(
            "http.request",
            request_id = "req-0000000000000001",
            method = "POST",
            route = "/api/generate-pix",
        );
        let _guard = span.enter();
        tracing::info!(status = 200_u16, latency_ms = 3_u64, "request completed");
    });
    let line = lines.first().expect("log line");
    assert_eq!(line.get("level").and_then(|v| v.as_str()), Some("INFO"));
    let fields = line.get("fields").expect("fields object");
    assert_eq!(fields.get("status").and_then(|v| v.as_u64()), Some(200));
    let span = line.get("span").expect("span object");
    assert_eq!(
        span.get("request_id").and_then(|v| v.as_str()),
        Some("req-0000000000000001")
    );
    assert_eq!(
        span.get("route").and_then(|v| v.as_str()),
        Some("/api/generate-pix")
    );
}

#[test]
fn pix_issuance_log_carries_payment_id() {
    let lines = capture(|| {
        let payee = doacao_model::Payee::new("k", "N", "C");
        let clock = doacao_core::ManualClock::new(chrono::Utc::now());
        let random = doacao_core::SeededRandom::new(3);
        let amount = doacao_model::Amount::from_cents(100).expect("amount");
        doacao_pix::issue(
            &payee,
            "d",
            amount,
            doacao_pix::DEFAULT_INSTRUCTION_TTL,
            &clock,
            &random,
        )
        .expect("instruction");
    });
    let issued = lines
        .iter()
        .find(|l| l.pointer("/fields/payment_id").is_some())
        .expect("issuance line");
    let id = issued
        .pointer("/fields/payment_id")
        .and_then(|v| v.as_str())
        .expect("payment id");
    assert_eq!(id.len(), 32);
}

#[test]
fn generate_pix_logs_issuance_once_without_donor_data() {
    let lines = capture(|| {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        runtime.block_on(async {
            let catalog = doacao_catalog::load_builtin().expect("catalog");
            let state = doacao_server::AppState::new(
                catalog,
                doacao_server::ServerConfig::default(),
                std::sync::Arc::new(doacao_server::FakeCheckout::default()),
            )
            .expect("state");
            let app = doacao_server::build_router(state);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind");
            let addr = listener.local_addr().expect("addr");
            tokio::spawn(async move {
                let _ = axum::serve(
                    listener,
                    app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
                )
                .await;
            });

            use tokio::io::{AsyncReadExt, AsyncWriteExt};
            let body = r#"{"amount": 10, "donorName": "Maria Silva"}"#;
            let request = format!(
                "POST /api/generate-pix HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            );
            let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
            stream.write_all(request.as_bytes()).await.expect("write");
            let mut response = String::new();
            stream.read_to_string(&mut response).await.expect("read");
            assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        });
    });
    let issued = lines
        .iter()
        .filter(|l| {
            l.pointer("/fields/message").and_then(|v| v.as_str()) == Some("pix instruction issued")
        })
        .count();
    assert_eq!(issued, 1);
    assert!(lines.iter().all(|l| !l.to_string().contains("Maria Silva")));
}
