use storage::remote::HttpQuestionBank;
use storage::repository::{QuestionBankLoader, Storage, StorageError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use exam_core::model::BankSource;

const BANK_JSON: &str = r#"[
    {"qid": 3, "question_text": "Cheapest archive tier?", "options": {"C": "Glacier", "A": "Standard"}, "correct_answer": "C"},
    {"qid": "q-1", "question_text": "Pick two databases.", "options": {"A": "RDS", "B": "EC2", "C": "DynamoDB"}, "correct_answer": ["A", "C"]}
]"#;

/// One-shot HTTP server answering a single request with `status` and `body`.
/// The join handle yields the request line.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/bank.json", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        let request = String::from_utf8_lossy(&buf).into_owned();
        request.lines().next().unwrap_or_default().to_string()
    });
    (url, handle)
}

fn bank_at(url: &str) -> HttpQuestionBank {
    HttpQuestionBank::new(url.parse().unwrap())
}

#[tokio::test]
async fn remote_bank_loads_questions_in_document_order() {
    let (url, server) = serve_once("200 OK", BANK_JSON).await;
    let bank = bank_at(&url).load().await.expect("load");

    assert_eq!(bank.len(), 2);
    assert_eq!(bank[0].id().as_str(), "3");
    assert_eq!(bank[1].id().as_str(), "q-1");
    let keys: Vec<_> = bank[0].options().iter().map(|o| o.key().as_str()).collect();
    assert_eq!(keys, ["C", "A"]);
    assert!(bank[1].correct().is_multiple());

    assert_eq!(server.await.unwrap(), "GET /bank.json HTTP/1.1");
}

#[tokio::test]
async fn remote_bank_maps_missing_object_to_not_found() {
    let (url, server) = serve_once("404 Not Found", "{}").await;
    let err = bank_at(&url).load().await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound), "got {err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn remote_bank_reports_other_status_codes() {
    let (url, server) = serve_once("500 Internal Server Error", "oops").await;
    let err = bank_at(&url).load().await.unwrap_err();
    assert!(matches!(err, StorageError::HttpStatus(500)), "got {err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn remote_bank_rejects_malformed_body() {
    let (url, server) = serve_once("200 OK", r#"[{"qid": 1, "question_text": "#).await;
    let err = bank_at(&url).load().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(_)), "got {err:?}");
    server.await.unwrap();
}

#[tokio::test]
async fn remote_bank_fails_whole_load_on_one_bad_record() {
    let body = r#"[
        {"qid": 1, "question_text": "Fine?", "options": {"A": "yes"}, "correct_answer": "A"},
        {"qid": 2, "question_text": "Broken?", "options": {"A": "yes"}, "correct_answer": "Z"}
    ]"#;
    let (url, server) = serve_once("200 OK", body).await;
    let err = bank_at(&url).load().await.unwrap_err();
    assert!(
        matches!(err, StorageError::InvalidQuestion { ref qid, .. } if qid == "2"),
        "got {err:?}"
    );
    server.await.unwrap();
}

#[tokio::test]
async fn remote_bank_reports_unreachable_host() {
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        format!("http://{}/bank.json", listener.local_addr().unwrap())
    };
    let err = bank_at(&url).load().await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)), "got {err:?}");
}

#[tokio::test]
async fn storage_from_source_picks_the_loader() {
    let (url, server) = serve_once("200 OK", BANK_JSON).await;
    let source: BankSource = url.parse().unwrap();
    let storage = Storage::from_source(&source).await.expect("http source");
    assert_eq!(storage.bank.describe(), format!("url {url}"));
    assert_eq!(storage.bank.load().await.unwrap().len(), 2);
    server.await.unwrap();

    let source: BankSource = "questions.json".parse().unwrap();
    let storage = Storage::from_source(&source).await.expect("file source");
    assert_eq!(storage.bank.describe(), "file questions.json");

    let source: BankSource = "sqlite:file:from_source?mode=memory&cache=shared"
        .parse()
        .unwrap();
    let storage = Storage::from_source(&source).await.expect("sqlite source");
    assert_eq!(storage.bank.describe(), "sqlite bank");
}
