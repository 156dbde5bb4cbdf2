//! Editor-extension endpoints driven through the full router.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

use common::{FakeChat, KEY_HEADER, SECRET, app_with_chat, post_json, send, send_json};

// ---------------------------------------------------------------------------
// Access gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hard_gate_rejects_missing_and_wrong_keys_without_calling_model() {
    for uri in ["/api/extension/impact", "/api/extension/narrate"] {
        for key in [None, Some("wrong"), Some("")] {
            let chat = FakeChat::replying("unused");
            let body = r#"{"codeSnippet":"x","fileContent":"x"}"#;
            let (status, json) = send_json(app_with_chat(chat.clone()), post_json(uri, key, body)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri} with {key:?}");
            assert_eq!(json, json!({ "error": "Unauthorized" }));
            assert_eq!(chat.calls(), 0);
        }
    }
}

#[tokio::test]
async fn risk_gate_answers_soft_unauthorized() {
    let chat = FakeChat::replying("unused");
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/risk", Some("nope"), r#"{"functionCode":"f()"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "score": 0, "reason": "Unauthorized access." }));
    assert_eq!(chat.calls(), 0);
}

#[tokio::test]
async fn search_gate_answers_auth_failed_with_cors() {
    let chat = FakeChat::replying("unused");
    let resp = send(
        app_with_chat(chat.clone()),
        post_json("/api/extension/search", None, r#"{"query":"where?"}"#),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(chat.calls(), 0);

    let (_, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/search", None, r#"{"query":"where?"}"#),
    )
    .await;
    assert_eq!(json, json!({ "answer": "Auth Failed" }));
}

// ---------------------------------------------------------------------------
// Impact
// ---------------------------------------------------------------------------

#[tokio::test]
async fn impact_combines_model_verdict_with_complexity_score() {
    let chat = FakeChat::replying(
        r##"{"riskLabel":"Database Writes","riskColor":"#ff5500","summary":"Inserts rows."}"##,
    );
    let mut snippet: String = (0..4).map(|i| format!("import m{i}\n")).collect();
    snippet.push_str(&"x".repeat(3_000 - snippet.len()));
    let body = json!({ "codeSnippet": snippet }).to_string();

    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/impact", Some(SECRET), &body),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "riskLabel": "Database Writes",
            "riskColor": "#ff5500",
            "summary": "Inserts rows.",
            "score": 92
        })
    );
    assert_eq!(chat.calls(), 1);
    let req = chat.last_request().unwrap();
    assert_eq!(req.config.max_tokens, Some(150));
    assert_eq!(req.messages[0].id, "impact-prompt");
}

#[tokio::test]
async fn impact_falls_back_to_raw_text() {
    let chat = FakeChat::replying("It writes to the DB.");
    let (status, json) = send_json(
        app_with_chat(chat),
        post_json("/api/extension/impact", Some(SECRET), r#"{"codeSnippet":"db.save()"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["riskLabel"], "Unknown");
    assert_eq!(json["riskColor"], "#888888");
    assert_eq!(json["summary"], "It writes to the DB.");
}

#[tokio::test]
async fn impact_requires_a_string_snippet() {
    for body in [r#"{}"#, r#"{"codeSnippet":""}"#, r#"{"codeSnippet":12}"#] {
        let chat = FakeChat::replying("unused");
        let (status, json) = send_json(
            app_with_chat(chat.clone()),
            post_json("/api/extension/impact", Some(SECRET), body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json, json!({ "error": "Missing codeSnippet" }));
        assert_eq!(chat.calls(), 0);
    }
}

#[tokio::test]
async fn impact_model_failure_is_500() {
    let (status, json) = send_json(
        app_with_chat(FakeChat::failing()),
        post_json("/api/extension/impact", Some(SECRET), r#"{"codeSnippet":"x"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn malformed_json_on_hard_endpoints_is_500_with_message() {
    for uri in ["/api/extension/impact", "/api/extension/narrate"] {
        let chat = FakeChat::replying("unused");
        let (status, json) = send_json(
            app_with_chat(chat.clone()),
            post_json(uri, Some(SECRET), "{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert!(
            json["error"]
                .as_str()
                .is_some_and(|m| m.starts_with("Invalid JSON body: ")),
            "{json}"
        );
        assert_eq!(chat.calls(), 0);
    }
}

#[tokio::test]
async fn json_sent_as_text_plain_reaches_every_extension_model() {
    let cases = [
        ("/api/extension/impact", r#"{"codeSnippet":"db.users.insert(x)"}"#),
        ("/api/extension/narrate", r#"{"fileContent":"fn main() {}"}"#),
        ("/api/extension/risk", r#"{"functionCode":"eval(x)"}"#),
        ("/api/extension/search", r#"{"query":"q"}"#),
    ];
    for (uri, body) in cases {
        let chat = FakeChat::replying(r#"{"score": 7, "reason": "eval"}"#);
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/plain;charset=UTF-8")
            .header(KEY_HEADER, SECRET)
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send_json(app_with_chat(chat.clone()), req).await;

        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(chat.calls(), 1, "{uri}");
    }
}

// ---------------------------------------------------------------------------
// Narrate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn narrate_returns_raw_completion() {
    let chat = FakeChat::replying("<br>• <b>Purpose:</b> Parses config.");
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json(
            "/api/extension/narrate",
            Some(SECRET),
            r#"{"fileContent":"fn main() {}","filePath":"src/main.rs"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "summary": "<br>• <b>Purpose:</b> Parses config." }));

    let req = chat.last_request().unwrap();
    assert_eq!(req.config.max_tokens, Some(1000));
    assert!(req.messages[0].content.contains("File: src/main.rs"));
}

#[tokio::test]
async fn narrate_requires_file_content() {
    let chat = FakeChat::replying("unused");
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/narrate", Some(SECRET), r#"{"filePath":"a.rs"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Missing fileContent" }));
    assert_eq!(chat.calls(), 0);
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn risk_parses_fenced_completion() {
    let chat = FakeChat::replying(
        "```json\n{\"score\": 9, \"reason\": \"uses eval, high injection risk\"}\n```",
    );
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/risk", Some(SECRET), r#"{"functionCode":"eval(x)"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "score": 9, "reason": "uses eval, high injection risk" }));
    assert_eq!(chat.last_request().unwrap().config.max_tokens, Some(1000));
}

#[tokio::test]
async fn risk_prose_completion_uses_fallback() {
    let (status, json) = send_json(
        app_with_chat(FakeChat::replying("This function looks risky.")),
        post_json("/api/extension/risk", Some(SECRET), r#"{"functionCode":"eval(x)"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "score": 5, "reason": "AI returned invalid format. Check server logs." })
    );
}

#[tokio::test]
async fn risk_clamps_out_of_range_scores() {
    let (_, json) = send_json(
        app_with_chat(FakeChat::replying(r#"{"score": 15, "reason": "r"}"#)),
        post_json("/api/extension/risk", Some(SECRET), r#"{"functionCode":"f()"}"#),
    )
    .await;
    assert_eq!(json["score"], 10);
}

#[tokio::test]
async fn risk_soft_failures_stay_200() {
    let cases = [
        ("{broken", "Invalid request body."),
        (r#"{"functionCode":""}"#, "No code selected."),
        (r#"{"functionCode":null}"#, "No code selected."),
    ];
    for (body, reason) in cases {
        let chat = FakeChat::replying("unused");
        let (status, json) = send_json(
            app_with_chat(chat.clone()),
            post_json("/api/extension/risk", Some(SECRET), body),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(json, json!({ "score": 0, "reason": reason }));
        assert_eq!(chat.calls(), 0);
    }
}

#[tokio::test]
async fn risk_model_failure_is_reported_in_body() {
    let (status, json) = send_json(
        app_with_chat(FakeChat::failing()),
        post_json("/api/extension/risk", Some(SECRET), r#"{"functionCode":"f()"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 0);
    assert!(
        json["reason"]
            .as_str()
            .is_some_and(|r| r.starts_with("AI service error: "))
    );
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_answers_with_trimmed_completion() {
    let chat = FakeChat::replying("  Auth lives in middleware.ts.\n");
    let resp = send(
        app_with_chat(chat.clone()),
        post_json(
            "/api/extension/search",
            Some(SECRET),
            r#"{"query":"Where is auth?","context":"export function middleware() {}"}"#,
        ),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let (_, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/search", Some(SECRET), r#"{"query":"Where is auth?"}"#),
    )
    .await;
    assert_eq!(json, json!({ "answer": "Auth lives in middleware.ts." }));
    assert_eq!(chat.last_request().unwrap().config.max_tokens, Some(200));
}

#[tokio::test]
async fn search_empty_query_skips_model() {
    let chat = FakeChat::replying("unused");
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/search", Some(SECRET), r#"{"query":""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "answer": "Ask something." }));
    assert_eq!(chat.calls(), 0);
}

#[tokio::test]
async fn search_numeric_query_is_asked() {
    let chat = FakeChat::replying("Line 42 defines the router.");
    let (status, json) = send_json(
        app_with_chat(chat.clone()),
        post_json("/api/extension/search", Some(SECRET), r#"{"query":42}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "answer": "Line 42 defines the router." }));
    let prompt = &chat.last_request().unwrap().messages[0].content;
    assert!(prompt.contains("42"));
}

#[tokio::test]
async fn search_failures_are_overload() {
    let (status, json) = send_json(
        app_with_chat(FakeChat::failing()),
        post_json("/api/extension/search", Some(SECRET), r#"{"query":"q"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "answer": "System Overload. Try again." }));

    let (status, json) = send_json(
        app_with_chat(FakeChat::replying("unused")),
        post_json("/api/extension/search", Some(SECRET), "{oops"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "answer": "System Overload. Try again." }));
}

fn header_list(resp: &axum::response::Response, name: &str) -> Vec<String> {
    resp.headers()[name]
        .to_str()
        .unwrap()
        .split(',')
        .map(|v| v.trim().to_ascii_lowercase())
        .collect()
}

#[tokio::test]
async fn search_bare_options_is_200_with_cors_headers() {
    let chat = FakeChat::replying("unused");
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/extension/search")
        .body(Body::empty())
        .unwrap();
    let resp = send(app_with_chat(chat.clone()), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(header_list(&resp, "access-control-allow-methods"), ["post", "options"]);
    assert_eq!(
        header_list(&resp, "access-control-allow-headers"),
        ["content-type", "x-gitlore-extension-key"]
    );
    assert_eq!(chat.calls(), 0);
}

#[tokio::test]
async fn search_browser_preflight_is_answered_without_key() {
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/extension/search")
        .header("origin", "vscode-webview://abc")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", KEY_HEADER)
        .body(Body::empty())
        .unwrap();
    let resp = send(app_with_chat(FakeChat::replying("unused")), req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
}
