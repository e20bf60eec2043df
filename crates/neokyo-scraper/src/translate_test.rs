use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use neokyo_core::Config;

use super::*;

const GTX_BODY: &str = r#"[[["figure box","フィギュア 箱",null,null,10]],null,"ja"]"#;

async fn translator(server: &MockServer) -> Translator {
    Translator::with_base_url(5, &server.uri()).expect("translator should build")
}

fn config() -> Config {
    let mut config = Config::default();
    // Keep unit tests from touching the real error log.
    config.debug.log_errors = false;
    config
}

#[tokio::test]
async fn translate_concatenates_segments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("tl", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[[["figure ","フィギュア",null],["box","箱",null]],null,"ja"]"#,
        ))
        .mount(&server)
        .await;

    let translated = translator(&server)
        .await
        .translate("フィギュア 箱", "en")
        .await
        .expect("translation should succeed");
    assert_eq!(translated, "figure box");
}

#[tokio::test]
async fn translate_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error":"nope"}"#))
        .mount(&server)
        .await;

    let err = translator(&server)
        .await
        .translate("text", "en")
        .await
        .expect_err("shape error expected");
    assert!(matches!(err, ScrapeError::TranslationShape { .. }));
}

#[tokio::test]
async fn normalize_title_never_translates_the_sentinel() {
    let server = MockServer::start().await;
    // Zero expected requests: the sentinel must short-circuit.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GTX_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let normalized = translator(&server)
        .await
        .normalize_title("n/a", &config())
        .await;
    assert_eq!(normalized, "n/a");
}

#[tokio::test]
async fn normalize_title_translates_and_lowercases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("tl", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[[["Figure Box","フィギュア 箱",null]],null,"ja"]"#,
        ))
        .mount(&server)
        .await;

    let normalized = translator(&server)
        .await
        .normalize_title("フィギュア 箱", &config())
        .await;
    assert_eq!(normalized, "figure box");
}

#[tokio::test]
async fn normalize_title_retries_fallback_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("tl", "en"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .and(query_param("tl", "ja"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GTX_BODY))
        .mount(&server)
        .await;

    let normalized = translator(&server)
        .await
        .normalize_title("フィギュア 箱", &config())
        .await;
    assert_eq!(normalized, "figure box");
}

#[tokio::test]
async fn normalize_title_passes_original_through_when_both_fail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let normalized = translator(&server)
        .await
        .normalize_title("Figure Box", &config())
        .await;
    assert_eq!(normalized, "figure box");
}

#[tokio::test]
async fn normalize_title_skips_translation_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GTX_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let mut cfg = config();
    cfg.scraping.translate_title = false;
    let normalized = translator(&server)
        .await
        .normalize_title("Figure Box", &cfg)
        .await;
    assert_eq!(normalized, "figure box");
}

#[tokio::test]
async fn normalize_title_skips_translation_without_target_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(GTX_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let mut cfg = config();
    cfg.default_language = Some("none".to_owned());
    let normalized = translator(&server)
        .await
        .normalize_title("Figure Box", &cfg)
        .await;
    assert_eq!(normalized, "figure box");
}
