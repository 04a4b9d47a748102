use aiornot::{
    AnalysisFilter, AsyncClient, BatchOptions, Config, Error, MediaKind, MediaSource, Report,
    TextOptions, Verdict, VideoAnalysisType, VideoOptions,
};
use mockito::Matcher;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fs;
use tempfile::tempdir;

const IMAGE: &str = include_str!("fixtures/image_report.json");
const VIDEO: &str = include_str!("fixtures/video_report.json");
const VOICE: &str = include_str!("fixtures/voice_report.json");
const MUSIC: &str = include_str!("fixtures/music_report.json");
const TEXT: &str = include_str!("fixtures/text_report.json");

fn client_for(server: &mockito::Server) -> AsyncClient {
    AsyncClient::new(Config {
        api_key: "test_api_key".to_string(),
        base_url: Some(server.url()),
        timeout_seconds: Some(10),
    })
    .unwrap()
}

/// Printable random content, so multipart bodies can be matched as text
fn random_content(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[tokio::test]
async fn test_client_new() {
    let client = AsyncClient::new(Config {
        api_key: "test_api_key".to_string(),
        ..Default::default()
    });
    assert!(client.is_ok());

    let client = AsyncClient::new(Config::default());
    assert!(matches!(client, Err(Error::InvalidConfig(_))));
}

#[tokio::test]
async fn test_voice_report_uploads_named_file() {
    let mut server = mockito::Server::new_async().await;
    let content = random_content(64);
    let mock = server
        .mock("POST", "/v1/reports/voice")
        .match_header("authorization", "Bearer test_api_key")
        .match_header("accept", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="clip.mp3""#.to_string()),
            Matcher::Regex("audio/mpeg".to_string()),
            Matcher::Regex(content.clone()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VOICE)
        .create_async()
        .await;

    let source = MediaSource::Bytes {
        data: content.into_bytes(),
        file_name: Some("clip.mp3".to_string()),
    };
    let report = client_for(&server)
        .voice_report_from_source(source)
        .await
        .unwrap();

    assert_eq!(report.verdict(), Verdict::Ai);
    assert_eq!(report.confidence(), Some(0.78));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unnamed_audio_gets_default_name() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/reports/music")
        .match_body(Matcher::Regex(r#"filename="audio.mp3""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MUSIC)
        .create_async()
        .await;

    let report = client_for(&server)
        .music_report(random_content(32).into_bytes())
        .await
        .unwrap();

    assert_eq!(report.verdict(), Verdict::Human);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_video_report_from_file_with_exclusions() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/video/sync")
        .match_query(Matcher::Exact(
            "excluding=ai_music&excluding=ai_voice".into(),
        ))
        .match_body(Matcher::Regex(r#"name="video"; filename="clip.mp4""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VIDEO)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    fs::write(&path, random_content(128)).unwrap();

    let options = VideoOptions {
        filter: AnalysisFilter::Excluding(vec![
            VideoAnalysisType::AiMusic,
            VideoAnalysisType::AiVoice,
        ]),
        external_id: None,
    };
    let report = client_for(&server)
        .video_report_from_file(&path, &options)
        .await
        .unwrap();

    assert!(report.ai_video_detected());
    assert_eq!(report.report.meta.duration, 45);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_filter_is_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let options = VideoOptions {
        filter: AnalysisFilter::Only(Vec::new()),
        external_id: None,
    };
    let result = client_for(&server)
        .video_report(b"video".to_vec(), &options)
        .await;

    assert!(matches!(result, Err(Error::Validation { .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_text_report_with_annotations() {
    let mut server = mockito::Server::new_async().await;
    let text = "The rapid advancement of artificial intelligence has transformed many industries.";
    let mock = server
        .mock("POST", "/v2/text/sync")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("include_annotations".into(), "true".into()),
            Matcher::UrlEncoded("external_id".into(), "essay-7".into()),
        ]))
        .match_body(Matcher::UrlEncoded("text".into(), text.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TEXT)
        .create_async()
        .await;

    let options = TextOptions {
        include_annotations: true,
        external_id: Some("essay-7".to_string()),
    };
    let report = client_for(&server).text_report(text, &options).await.unwrap();

    assert!(report.is_detected());
    assert_eq!(report.external_id.as_deref(), Some("essay-7"));
    assert_eq!(report.annotations().map(|a| a.len()), Some(3));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_url_source_is_downloaded_without_credentials() {
    let mut server = mockito::Server::new_async().await;
    let download = server
        .mock("GET", "/media/cat.jpg")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("jpeg bytes")
        .create_async()
        .await;
    let report_mock = server
        .mock("POST", "/v2/image/sync")
        .match_header("authorization", "Bearer test_api_key")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"filename="cat.jpg""#.to_string()),
            Matcher::Regex("jpeg bytes".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(IMAGE)
        .create_async()
        .await;

    let url = format!("{}/media/cat.jpg", server.url());
    let report = client_for(&server)
        .image_report_from_source(MediaSource::parse(&url), &Default::default())
        .await
        .unwrap();

    assert_eq!(report.id(), "a1b2c3d4-e5f6-7890-abcd-ef1234567890");
    download.assert_async().await;
    report_mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_download_skips_report_call() {
    let mut server = mockito::Server::new_async().await;
    let _download = server
        .mock("GET", "/media/gone.jpg")
        .with_status(404)
        .create_async()
        .await;
    let report_mock = server
        .mock("POST", "/v2/image/sync")
        .expect(0)
        .create_async()
        .await;

    let url = format!("{}/media/gone.jpg", server.url());
    let result = client_for(&server)
        .image_report_from_source(MediaSource::Url(url), &Default::default())
        .await;

    match result {
        Err(Error::InvalidRequest(message)) => assert!(message.contains("404")),
        other => panic!("Expected InvalidRequest, got {other:?}"),
    }
    report_mock.assert_async().await;
}

#[tokio::test]
async fn test_voice_report_from_csv() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v1/reports/voice")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(VOICE)
        .expect(2)
        .create_async()
        .await;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), "a").unwrap();
    fs::write(dir.path().join("b.mp3"), "b").unwrap();
    let csv = dir.path().join("voices.csv");
    fs::write(&csv, "speaker,file_path\nann,a.mp3\nbob,b.mp3\ncarl,missing.mp3\n").unwrap();

    let summary = client_for(&server)
        .voice_report_from_csv(
            &csv,
            "file_path",
            Some(dir.path()),
            &BatchOptions::for_kind(MediaKind::Voice),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert!(summary.results[2].input.ends_with("missing.mp3"));
    assert_eq!(
        summary.results[2].error().map(|e| e.kind()),
        Some("FileNotFoundError")
    );
}

#[tokio::test]
async fn test_text_report_batch_isolates_short_texts() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("POST", "/v2/text/sync")
        .match_query(Matcher::UrlEncoded(
            "include_annotations".into(),
            "false".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TEXT)
        .expect(2)
        .create_async()
        .await;

    let texts = vec![
        "A long enough first text.".to_string(),
        "short".to_string(),
        "A long enough third text.".to_string(),
    ];
    let summary = client_for(&server)
        .text_report_batch(
            texts,
            &TextOptions::default(),
            &BatchOptions::for_kind(MediaKind::Text),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.results[1].input, "short");
    assert_eq!(
        summary.results[1].error().map(|e| e.kind()),
        Some("ValidationError")
    );
}

#[tokio::test]
async fn test_is_live_false_when_unhealthy() {
    let mut server = mockito::Server::new_async().await;
    let _m = server
        .mock("GET", "/v1/system/live")
        .with_status(503)
        .create_async()
        .await;

    assert!(!client_for(&server).is_live().await);
}
