use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_chat_conversation_carries_history() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"message": "Hello", "video_id": "vid1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi!"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({
            "message": "More?",
            "history": [
                {"sender": "user", "message": "Hello"},
                {"sender": "bot", "message": "Hi!"},
                {"sender": "user", "message": "More?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Sure."})))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("vidchat")
        .env("VIDCHAT_HOME", home.path())
        .env("VIDCHAT_BACKEND_URL", server.uri())
        .arg("chat")
        .write_stdin(":nav https://www.youtube.com/watch?v=vid1\nHello\n   \nMore?\n:q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("user> Hello"))
        .stdout(predicate::str::contains("bot> Hi!"))
        .stdout(predicate::str::contains("bot> Sure."))
        .stderr(predicate::str::contains("Thinking..."));
}

#[tokio::test]
async fn test_chat_hidden_widget_does_not_send() {
    let server = MockServer::start().await;
    let home = tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Hi!"})))
        .expect(0)
        .mount(&server)
        .await;

    cargo_bin_cmd!("vidchat")
        .env("VIDCHAT_HOME", home.path())
        .env("VIDCHAT_BACKEND_URL", server.uri())
        .arg("chat")
        .write_stdin(":host {\"action\":\"toggle-chat\"}\nHello\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("chat hidden"))
        .stderr(predicate::str::contains("Chat is hidden"));
}

#[test]
fn test_chat_shows_greeting_and_failure_apology() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("vidchat")
        .env("VIDCHAT_HOME", home.path())
        .args(["chat", "--url", "http://127.0.0.1:9"])
        .write_stdin("Hello\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("bot> Hello! I can help you"))
        .stdout(predicate::str::contains(
            "bot> Sorry, there was an error processing your request.",
        ));
}
