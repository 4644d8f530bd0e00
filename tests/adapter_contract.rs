//! Contract tests for the Gemini background-removal adapter
//!
//! These run the adapter over the recording mock transport and check the
//! request it sends and the way each kind of response is surfaced.

use gemini_bgremove::{
    adapter::{
        test_utils::MockTransport, Candidate, Content, GenerateContentResponse, Modality, Part,
    },
    config::DEFAULT_INSTRUCTION,
    services::{decode_base64, encode_base64},
    BgRemovalError, ErrorKind, GeminiBackgroundRemover, RemovalConfig, RemoveBackground,
};

fn config_with_key() -> RemovalConfig {
    RemovalConfig::builder()
        .api_key("integration-key")
        .build()
        .unwrap()
}

fn candidate(parts: Vec<Part>) -> Candidate {
    Candidate {
        content: Some(Content {
            role: Some("model".to_string()),
            parts,
        }),
        finish_reason: Some("STOP".to_string()),
    }
}

fn response(candidates: Vec<Candidate>) -> GenerateContentResponse {
    GenerateContentResponse {
        candidates,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_image_part_becomes_png_data_url() {
    let payloads = ["iVBORw0KGgo=", "AAAA", "/9j/4AAQSkZJRg=="];

    for payload in payloads {
        let transport = MockTransport::new().with_response(response(vec![candidate(vec![
            Part::text("Here is your image."),
            Part::inline_data("image/png", payload),
        ])]));
        let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

        let url = remover
            .remove_background(b"source", "image/jpeg")
            .await
            .unwrap();
        let url = url.as_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(&url["data:image/png;base64,".len()..], payload);
    }
}

#[tokio::test]
async fn test_first_inline_part_across_candidates_wins() {
    let transport = MockTransport::new().with_response(response(vec![
        candidate(vec![Part::text("thinking")]),
        candidate(vec![
            Part::inline_data("image/png", "Rmlyc3Q="),
            Part::inline_data("image/png", "U2Vjb25k"),
        ]),
    ]));
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

    let url = remover.remove_background(b"x", "image/png").await.unwrap();
    assert_eq!(url.payload(), "Rmlyc3Q=");
}

#[tokio::test]
async fn test_request_shape() {
    let transport = MockTransport::new();
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport.clone());

    // Default mock reply is empty, so the call itself fails.
    let _ = remover.remove_background(b"\x89PNG", "image/webp").await;

    let request = transport.last_request().unwrap();
    assert_eq!(transport.call_count(), 1);
    assert_eq!(
        transport.last_api_key().as_deref(),
        Some("integration-key")
    );

    let parts = &request.contents[0].parts;
    let inline = parts[0].inline_data.as_ref().unwrap();
    assert_eq!(inline.mime_type, "image/webp");
    assert_eq!(decode_base64(&inline.data).unwrap(), b"\x89PNG");
    assert_eq!(parts[1].text.as_deref(), Some(DEFAULT_INSTRUCTION));
    assert_eq!(
        request.generation_config.unwrap().response_modalities,
        vec![Modality::Image, Modality::Text]
    );
}

#[tokio::test]
async fn test_missing_credential_makes_no_call() {
    let transport = MockTransport::new();
    let remover =
        GeminiBackgroundRemover::with_transport(RemovalConfig::default(), transport.clone());

    let err = remover.remove_background(b"x", "image/png").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err.to_string(),
        "API_KEY environment variable is not set. Please configure it to use this service."
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_blank_credential_counts_as_missing() {
    let transport = MockTransport::new();
    let config = RemovalConfig::builder().api_key("   ").build().unwrap();
    let remover = GeminiBackgroundRemover::with_transport(config, transport.clone());

    let err = remover.remove_background(b"x", "image/png").await.unwrap_err();
    assert!(matches!(err, BgRemovalError::MissingCredential(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_text_only_response_surfaces_model_text() {
    let transport = MockTransport::new().with_response(response(vec![candidate(vec![
        Part::text("Sorry, I can't process this."),
    ])]));
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

    let err = remover.remove_background(b"x", "image/png").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModelRejection);
    assert!(err.to_string().contains("Sorry, I can't process this."));
}

#[tokio::test]
async fn test_empty_response_is_generic_failure() {
    let transport = MockTransport::new().with_response(GenerateContentResponse::default());
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

    let err = remover.remove_background(b"x", "image/png").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyResponse);
    assert!(err.to_string().contains("No image was returned"));
}

#[tokio::test]
async fn test_http_status_is_transport_error() {
    let transport = MockTransport::new().with_status(429, "RESOURCE_EXHAUSTED");
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

    let err = remover.remove_background(b"x", "image/png").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("429"));
    assert!(err.to_string().contains("RESOURCE_EXHAUSTED"));
}

#[tokio::test]
async fn test_declared_jpeg_result_still_labeled_png() {
    // Known quirk: the declared MIME type of the returned part is not honored.
    let transport = MockTransport::new().with_response(response(vec![candidate(vec![
        Part::inline_data("image/jpeg", "/9j/4AAQ"),
    ])]));
    let remover = GeminiBackgroundRemover::with_transport(config_with_key(), transport);

    let url = remover.remove_background(b"x", "image/jpeg").await.unwrap();
    assert_eq!(url.mime_type(), "image/png");
}

#[test]
fn test_base64_round_trip_of_file_bytes() {
    let original: Vec<u8> = (0..=255u8).cycle().take(4099).collect();
    assert_eq!(decode_base64(&encode_base64(&original)).unwrap(), original);
}
