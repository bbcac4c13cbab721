//! Integration tests for the API client.
//!
//! These tests run a throwaway local HTTP server that answers one request
//! with a canned response, then inspect what the client sent.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_test::assert_ok;

use chrono::NaiveDate;

use daybook_api::{
    ApiClient, Cycle, DiaryQuery, DiaryUpdate, Error, HistoryEntry, MediaKind, NewPlan, PlanUpdate,
};

/// Serves exactly one request and returns the raw request text.
async fn serve_once(status: &str, content_type: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (format!("http://{addr}"), handle)
}

/// The body of a raw request.
fn body_of(request: &str) -> &str {
    request.split_once("\r\n\r\n").map_or("", |(_, body)| body)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_chat_streams_reply() {
    let body = concat!(
        "data: {\"token\": \"Sounds \"}\n\n",
        "data: {\"token\": \"lovely\"}\n\n",
        "data: [DONE]\n\n",
    );
    let (base, server) = serve_once("200 OK", "text/event-stream", body).await;
    let client = ApiClient::new(&base).unwrap().with_token("tok-1");

    let history = vec![HistoryEntry::user("I baked bread")];
    let mut tokens = Vec::new();
    let reply = assert_ok!(
        client
            .chat(5, "It came out well", &history, |t| tokens.push(t.to_string()))
            .await
    );

    assert_eq!(reply, "Sounds lovely");
    assert_eq!(tokens, vec!["Sounds ", "lovely"]);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/chat HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: bearer tok-1"));
    assert!(request.contains(r#""userContent":"It came out well""#));
    assert!(request.contains(r#""assistantHistory":[{"role":"user","content":"I baked bread"}]"#));
    assert!(request.contains(r#""userId":5"#));
}

#[tokio::test]
async fn test_chat_stream_error_event() {
    let body = "data: {\"token\": \"Hm\"}\ndata: {\"error\": \"model busy\"}\n";
    let (base, server) = serve_once("200 OK", "text/event-stream", body).await;
    let client = ApiClient::new(&base).unwrap();

    let result = client.chat(1, "hello", &[], |_| {}).await;
    assert!(matches!(result, Err(Error::StreamAborted(reason)) if reason == "model busy"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_generate_diary_without_done_keeps_text() {
    let body = "data: {\"token\": \"Today I \"}\ndata: {\"token\": \"rested.\"}";
    let (base, server) = serve_once("200 OK", "text/event-stream", body).await;
    let client = ApiClient::new(&base).unwrap();

    let text = client
        .generate_diary(3, &[HistoryEntry::user("tired")], |_| {})
        .await
        .unwrap();
    assert_eq!(text, "Today I rested.");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/diary/save HTTP/1.1"));
    assert!(request.contains(r#""conversation":[{"role":"user","content":"tired"}]"#));
}

#[tokio::test]
async fn test_list_plans() {
    let body = r#"{"code": 200, "data": [
        {"id": 1, "name": "Run", "cycle": "week", "times": 3, "is_top": 0, "state": 0,
         "records": [{"id": 10, "plan_id": 1, "gmt_create": "2024-05-06 07:00:00"}]},
        {"id": 2, "name": "Read", "cycle": "no", "times": 1, "is_top": true, "state": 0, "records": []}
    ]}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let plans = client.list_plans(42).await.unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].cycle, Cycle::Week);
    assert_eq!(plans[0].records.len(), 1);
    assert!(plans[1].is_top);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/plans?userId=42 HTTP/1.1"));
}

#[tokio::test]
async fn test_list_diaries_empty_data() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 0}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let diaries = client
        .list_diaries(&DiaryQuery::month(7, 2024, 6))
        .await
        .unwrap();
    assert!(diaries.is_empty());

    let request = server.await.unwrap();
    assert!(request.contains(r#""year":2024"#));
    assert!(request.contains(r#""month":6"#));
}

#[tokio::test]
async fn test_envelope_error_code() {
    let body = r#"{"code": 404, "msg": "plan not found"}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    match client.get_plan(99).await {
        Err(Error::Api { code, message }) => {
            assert_eq!(code, 404);
            assert_eq!(message, "plan not found");
        }
        other => panic!("unexpected: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_http_error_status() {
    let (base, server) = serve_once("502 Bad Gateway", "text/plain", "upstream gone").await;
    let client = ApiClient::new(&base).unwrap();

    match client.delete_diary(1).await {
        Err(Error::Status { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream gone");
        }
        other => panic!("unexpected: {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn test_unauthorized_with_envelope() {
    let body = r#"{"code": 401, "msg": "token expired"}"#;
    let (base, server) = serve_once("401 Unauthorized", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let err = client.current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_data() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 200}"#).await;
    let client = ApiClient::new(&base).unwrap();

    assert!(matches!(
        client.get_diary(3).await,
        Err(Error::MissingData("diary"))
    ));
    server.await.unwrap();
}

#[tokio::test]
async fn test_check_in() {
    let body = r#"{"code": 200, "data": {"id": 77, "plan_id": 4, "user_id": 2, "gmt_create": "2024-07-01 08:00:00"}}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let record = client.check_in(4, 2).await.unwrap();
    assert_eq!(record.id, 77);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/plans/4/records HTTP/1.1"));
    assert!(request.contains(r#""planId":4"#));
}

#[tokio::test]
async fn test_transcribe_and_vision() {
    let (base, server) =
        serve_once("200 OK", "application/json", r#"{"code": 200, "data": {"text": "hello"}}"#).await;
    let client = ApiClient::new(&base).unwrap();
    assert_eq!(client.transcribe("https://cdn/a.m4a").await.unwrap(), "hello");
    let request = server.await.unwrap();
    assert!(request.contains(r#""audioUrl":"https://cdn/a.m4a""#));

    let (base, server) = serve_once(
        "200 OK",
        "application/json",
        r#"{"code": 200, "data": {"content": "a cat on a sofa"}}"#,
    )
    .await;
    let client = ApiClient::new(&base).unwrap();
    assert_eq!(
        client.understand_image(1, "https://cdn/cat.jpg").await.unwrap(),
        "a cat on a sofa"
    );
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/vl HTTP/1.1"));
}

#[tokio::test]
async fn test_login() {
    let body = r#"{"code": 200, "data": {"user": {"id": 8, "username": "ann"}, "token": "tok-8"}}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let response = client.login("ann", "hunter2").await.unwrap();
    assert_eq!(response.user.id, 8);
    assert_eq!(response.token, "tok-8");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/login HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(body_of(&request)).unwrap();
    assert_eq!(sent, serde_json::json!({"username": "ann", "password": "hunter2"}));
}

#[tokio::test]
async fn test_reverse_geocode() {
    let body = r#"{"code": 200, "data": {"address": "West Lake, Hangzhou"}}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let address = client.reverse_geocode(30.25, 120.5).await.unwrap();
    assert_eq!(address, "West Lake, Hangzhou");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/location?lat=30.25&lng=120.5 HTTP/1.1"));
}

#[tokio::test]
async fn test_upload_image_multipart() {
    let dir = std::env::temp_dir().join(format!("daybook-upload-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let path = dir.join("sunset.png");
    tokio::fs::write(&path, b"not really a png").await.unwrap();

    let body = r#"{"code": 200, "data": {"url": "https://cdn.example/u/sunset.png"}}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap().with_token("tok-2");

    let url = client.upload(&path, MediaKind::Image).await.unwrap();
    assert_eq!(url, "https://cdn.example/u/sunset.png");

    let request = server.await.unwrap();
    let lower = request.to_lowercase();
    assert!(request.starts_with("POST /api/upload/image HTTP/1.1"));
    assert!(lower.contains("content-type: multipart/form-data; boundary="));
    assert!(request.contains(r#"name="file"; filename="sunset.png""#));
    assert!(lower.contains("content-type: image/png"));
    assert!(request.contains("not really a png"));

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_upload_missing_file() {
    let client = ApiClient::new("http://127.0.0.1:9").unwrap();
    let path = std::env::temp_dir().join("daybook-no-such-file.m4a");
    assert!(matches!(
        client.upload(&path, MediaKind::Audio).await,
        Err(Error::Io(_))
    ));
}

#[tokio::test]
async fn test_create_plan() {
    let body = r#"{"code": 200, "data": {"id": 31, "name": "Swim", "cycle": "month", "times": 4,
        "gmt_limit": "2024-12-31 23:59:59", "is_top": 1, "state": 0}}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let limit = NaiveDate::from_ymd_opt(2024, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    let new_plan = NewPlan::new(6, "Swim", Cycle::Month)
        .with_times(4)
        .with_limit(limit)
        .pinned();
    let plan = client.create_plan(&new_plan).await.unwrap();
    assert_eq!(plan.id, 31);
    assert!(plan.is_top);
    assert!(plan.records.is_empty());

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/plans HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(body_of(&request)).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({
            "userId": 6,
            "name": "Swim",
            "cycle": "month",
            "times": 4,
            "gmtLimit": "2024-12-31 23:59:59",
            "isTop": true,
        })
    );
}

#[tokio::test]
async fn test_update_plan_sends_only_changes() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 200}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let update = PlanUpdate {
        times: Some(2),
        is_top: Some(false),
        ..PlanUpdate::default()
    };
    assert_ok!(client.update_plan(31, &update).await);

    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /api/plans/31 HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(body_of(&request)).unwrap();
    assert_eq!(sent, serde_json::json!({"times": 2, "isTop": false}));
}

#[tokio::test]
async fn test_update_diary() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 0}"#).await;
    let client = ApiClient::new(&base).unwrap();

    let update = DiaryUpdate::new("Rainy, stayed in", &["u/1.jpg".to_string()]);
    assert_ok!(client.update_diary(12, &update).await);

    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /api/diaries/12 HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(body_of(&request)).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"context": "Rainy, stayed in", "pic": "[\"u/1.jpg\"]"})
    );
}

#[tokio::test]
async fn test_list_recycled_diaries() {
    let body = r#"{"code": 200, "data": [
        {"id": 5, "context": "old entry", "gmt_create": "2024-04-01 20:00:00",
         "gmt_delete": "2024-05-01 09:00:00"}
    ]}"#;
    let (base, server) = serve_once("200 OK", "application/json", body).await;
    let client = ApiClient::new(&base).unwrap();

    let deleted = client.list_recycled_diaries(9).await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(deleted[0].diary.id, 5);
    assert_eq!(deleted[0].diary.context, "old entry");
    assert_eq!(
        deleted[0].purge_at().date(),
        NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()
    );

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/diaries/recycle?userId=9 HTTP/1.1"));
}

#[tokio::test]
async fn test_restore_and_purge_diary() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 200}"#).await;
    let client = ApiClient::new(&base).unwrap();
    assert_ok!(client.restore_diary(5).await);
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/diaries/5/restore HTTP/1.1"));

    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 200}"#).await;
    let client = ApiClient::new(&base).unwrap();
    assert_ok!(client.purge_diary(5).await);
    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /api/diaries/5/permanent HTTP/1.1"));
}

#[tokio::test]
async fn test_save_chat_record() {
    let (base, server) = serve_once("200 OK", "application/json", r#"{"code": 200}"#).await;
    let client = ApiClient::new(&base).unwrap();

    assert_ok!(client.save_chat_record(4, "hi", "hello there").await);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/chat/record HTTP/1.1"));
    let sent: serde_json::Value = serde_json::from_str(body_of(&request)).unwrap();
    assert_eq!(
        sent,
        serde_json::json!({"userId": 4, "userContent": "hi", "assistantContent": "hello there"})
    );
}
