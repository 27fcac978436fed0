use lesson_core::model::ChatId;
use serde_json::json;
use services::{ChatTransport, OutboundMessage, ReplyKeyboard, TransportError};
use telegram::{Poller, TelegramClient, TelegramError};
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123:secret";

async fn client() -> (MockServer, TelegramClient) {
    let server = MockServer::start().await;
    let client = TelegramClient::with_base_url(TOKEN, server.uri());
    (server, client)
}

#[tokio::test]
async fn get_me_reads_bot_identity() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getMe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "id": 99, "is_bot": true, "first_name": "Lessons", "username": "lesson_bot" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let me = client.get_me().await.unwrap();
    assert_eq!(me.id, 99);
    assert_eq!(me.username.as_deref(), Some("lesson_bot"));
}

#[tokio::test]
async fn rejected_token_surfaces_api_error() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getMe"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = client.get_me().await.unwrap_err();
    assert!(matches!(
        err,
        TelegramError::Api { code: Some(401), ref description } if description == "Unauthorized"
    ));
}

#[tokio::test]
async fn non_json_failure_reports_status() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getMe"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.get_me().await.unwrap_err();
    assert!(matches!(err, TelegramError::HttpStatus(status) if status.as_u16() == 502));
}

#[tokio::test]
async fn transport_sends_text_with_keyboard() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/sendMessage"))
        .and(body_json(json!({
            "chat_id": 5,
            "text": "Choose a programming language:",
            "reply_markup": {
                "keyboard": [[{ "text": "Java" }], [{ "text": "SQL" }]],
                "one_time_keyboard": true,
                "resize_keyboard": true
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "message_id": 1, "chat": { "id": 5 }, "text": "Choose a programming language:" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = OutboundMessage::text("Choose a programming language:")
        .with_keyboard(ReplyKeyboard::one_time(["Java", "SQL"]));
    client.send(ChatId::new(5), &message).await.unwrap();
}

#[tokio::test]
async fn transport_maps_blocked_chat_to_rejection() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/sendMessage"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&server)
        .await;

    let err = client
        .send(ChatId::new(5), &OutboundMessage::text("hi"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Rejected {
            code: Some(403),
            description: "Forbidden: bot was blocked by the user".into(),
        }
    );
}

#[tokio::test]
async fn poller_advances_offset_past_every_update() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getUpdates"))
        .and(body_partial_json(json!({ "offset": null, "timeout": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                { "update_id": 40, "message": { "message_id": 1, "chat": { "id": 5 }, "text": "/start" } },
                { "update_id": 41, "message": { "message_id": 2, "chat": { "id": 6 }, "sticker": {} } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getUpdates"))
        .and(body_partial_json(json!({ "offset": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let mut poller = Poller::new(client, 0);
    let first = poller.poll().await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].chat_id, ChatId::new(5));
    assert_eq!(first[0].text, "/start");
    assert_eq!(poller.offset(), Some(42));

    let second = poller.poll().await.unwrap();
    assert!(second.is_empty());
    assert_eq!(poller.offset(), Some(42));
}

#[tokio::test]
async fn failed_poll_keeps_offset() {
    let (server, client) = client().await;
    Mock::given(method("POST"))
        .and(path("/bot123:secret/getUpdates"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "ok": false,
            "error_code": 409,
            "description": "Conflict: terminated by other getUpdates request"
        })))
        .mount(&server)
        .await;

    let mut poller = Poller::new(client, 0);
    assert!(poller.poll().await.is_err());
    assert_eq!(poller.offset(), None);
}
