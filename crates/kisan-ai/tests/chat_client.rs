use kisan_ai::{AiError, ChatClient, ChatSession, Language, ReplyOutcome, Role};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Local mock servers only; keep any system proxy out of the way.
fn http() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

fn sse(fragments: &[&str], done: bool) -> String {
    let mut body = String::new();
    for fragment in fragments {
        let payload = json!({"choices": [{"delta": {"content": fragment}}]});
        body.push_str(&format!("data: {payload}\n\n"));
    }
    if done {
        body.push_str("data: [DONE]\n\n");
    }
    body
}

fn session_for(server: &MockServer, language: Language) -> ChatSession {
    let client = ChatClient::new(http(), &server.uri());
    ChatSession::new(client, language)
}

#[tokio::test]
async fn streams_three_fragments_into_one_assistant_message() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "messages": [{"role": "user", "content": "hi"}],
            "language": "en"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse(&["Hello", " there", "!"], true), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server, Language::English);
    let mut seen = Vec::new();
    let outcome = session
        .send("  hi  ", &CancellationToken::new(), |_, message| {
            seen.push(message.content.clone())
        })
        .await?;

    assert_eq!(outcome, Some(ReplyOutcome::Completed));
    assert!(!session.is_loading());

    let messages = session.conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "Hello there!");

    assert_eq!(seen, vec!["Hello", "Hello there", "Hello there!"]);
    Ok(())
}

#[tokio::test]
async fn close_without_sentinel_keeps_full_content() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse(&["Sow ", "after rain"], false), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let mut session = session_for(&server, Language::English);
    let outcome = session.send("when?", &CancellationToken::new(), |_, _| {}).await?;

    assert_eq!(outcome, Some(ReplyOutcome::Closed));
    assert_eq!(session.conversation().messages()[1].content, "Sow after rain");
    Ok(())
}

#[tokio::test]
async fn proxy_error_surfaces_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({"error": "Rate limit exceeded. Please try again later."})),
        )
        .mount(&server)
        .await;

    let mut session = session_for(&server, Language::Hindi);
    let err = session
        .send("भाव?", &CancellationToken::new(), |_, _| {})
        .await
        .unwrap_err();

    match err {
        AiError::Rejected { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "Rate limit exceeded. Please try again later.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_loading());
    assert_eq!(session.conversation().len(), 1);
}

#[tokio::test]
async fn non_json_error_body_falls_back_to_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut session = session_for(&server, Language::English);
    let err = session
        .send("hello", &CancellationToken::new(), |_, _| {})
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Rejected { status: 502, ref message } if message == "Request failed"));
}

#[tokio::test]
async fn connection_failure_appends_no_assistant_message() -> anyhow::Result<()> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let client = ChatClient::new(http(), &format!("http://{addr}"));
    let mut session = ChatSession::new(client, Language::English);
    let err = session
        .send("anyone there?", &CancellationToken::new(), |_, _| {})
        .await
        .unwrap_err();

    assert!(matches!(err, AiError::Connection(_)));
    assert!(!session.is_loading());
    assert_eq!(session.conversation().len(), 1);
    assert_eq!(session.conversation().messages()[0].role, Role::User);
    Ok(())
}

#[tokio::test]
async fn cancelled_before_send_leaves_only_the_user_turn() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut session = session_for(&server, Language::English);
    let outcome = session.send("hello", &cancel, |_, _| {}).await?;

    assert_eq!(outcome, Some(ReplyOutcome::Cancelled));
    assert_eq!(session.conversation().len(), 1);
    Ok(())
}

#[tokio::test]
async fn blank_input_sends_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = session_for(&server, Language::English);
    let outcome = session.send("   ", &CancellationToken::new(), |_, _| {}).await?;

    assert_eq!(outcome, None);
    assert!(session.conversation().is_empty());
    Ok(())
}

#[tokio::test]
async fn presents_bearer_token_to_proxy() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer client-token"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse(&["ok"], true), "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(http(), &server.uri())
        .with_token(Some("client-token".to_string()));
    let mut session = ChatSession::new(client, Language::Telugu);
    session.send("hi", &CancellationToken::new(), |_, _| {}).await?;

    assert_eq!(session.conversation().messages()[1].content, "ok");
    Ok(())
}
