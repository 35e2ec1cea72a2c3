mod common;

// std
use std::time::Instant;
// crates.io
use httpmock::prelude::*;
// self
use common::*;
use gluon::{
	auth::{AssetUid, AttachmentId, InstanceId},
	config::GuardConfig,
	error::{AuthError, Error, LocalIoError, TransportError},
};

fn asset() -> AssetUid {
	AssetUid::new("5678").expect("Asset uid should be valid.")
}

fn instance() -> InstanceId {
	InstanceId::new("9").expect("Instance id should be valid.")
}

fn attachment() -> AttachmentId {
	AttachmentId::new("0").expect("Attachment id should be valid.")
}

#[tokio::test]
async fn refresh_exchanges_basic_credentials_for_token() {
	let server = MockServer::start_async().await;
	let token_mock = mock_kobo_token(&server).await;
	let client = kobo_client(&server, GuardConfig::default());

	assert!(client.tokens().token().is_none());
	assert!(client.tokens().refreshed_at().is_none());

	let header = client.refresh_token().await.expect("Token exchange should succeed.");

	assert_eq!(header.expose(), KOBO_AUTHORIZATION);
	assert_eq!(client.tokens().token().expect("Token should be cached.").expose(), TOKEN);
	assert!(client.tokens().refreshed_at().is_some());
	assert!(!client.tokens().is_stale());

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn fetch_records_returns_results_with_token_header() {
	let server = MockServer::start_async().await;
	let token_mock = mock_kobo_token(&server).await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/assets/5678/data.json")
				.header("authorization", KOBO_AUTHORIZATION);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"count\":2,\"results\":[\"some\",\"data\"]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let records = client.fetch_records(&asset()).await.expect("Record listing should succeed.");

	assert_eq!(records, [serde_json::json!("some"), serde_json::json!("data")]);

	let records = client.fetch_records(&asset()).await.expect("Second listing should succeed.");

	assert_eq!(records.len(), 2);

	token_mock.assert_calls_async(1).await;
	data_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn stale_token_is_refreshed_before_next_call() {
	let server = MockServer::start_async().await;
	let token_mock = mock_kobo_token(&server).await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/assets/5678/data.json")
				.header("authorization", KOBO_AUTHORIZATION);
			then.status(200).body("{\"results\":[]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default().with_stale_after_secs(1));

	assert!(client.tokens().is_stale());

	client.fetch_records(&asset()).await.expect("First listing should succeed.");

	let first_refresh =
		client.tokens().refreshed_at().expect("First call should have refreshed the token.");

	assert!(!client.tokens().is_stale());

	tokio::time::sleep(std::time::Duration::from_millis(1_100)).await;

	assert!(client.tokens().is_stale());

	client.fetch_records(&asset()).await.expect("Second listing should succeed.");

	let second_refresh =
		client.tokens().refreshed_at().expect("Second call should have refreshed the token.");

	assert!(second_refresh > first_refresh);
	assert_eq!(client.tokens().metrics().attempts(), 2);

	token_mock.assert_calls_async(2).await;
	data_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn attachment_is_written_to_file() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let image_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/assets/5678/data/9/attachments/0/")
				.header("authorization", KOBO_AUTHORIZATION);
			then.status(200).header("content-type", "image/png").body("a pretty picture");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");
	let path = dir.path().join("test_pull_image.png");

	client
		.fetch_attachment_to_file(&path, &asset(), &instance(), &attachment())
		.await
		.expect("Attachment download should succeed.");

	let content = std::fs::read_to_string(&path).expect("Downloaded file should be readable.");

	assert_eq!(content, "a pretty picture");

	let bytes = client
		.fetch_attachment_bytes(&asset(), &instance(), &attachment())
		.await
		.expect("Attachment bytes should download.");

	assert_eq!(bytes, b"a pretty picture");

	image_mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn attachment_write_failure_is_local_io_error() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let _image_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data/9/attachments/0/");
			then.status(200).body("a pretty picture");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");
	let path = dir.path().join("missing").join("picture.png");
	let err = client
		.fetch_attachment_to_file(&path, &asset(), &instance(), &attachment())
		.await
		.expect_err("Writing into a missing directory must fail.");

	assert!(matches!(err, Error::Io(LocalIoError::Write { .. })));
}

#[tokio::test]
async fn failed_download_leaves_no_file() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let _image_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data/9/attachments/0/");
			then.status(404).body("{\"detail\":\"Not found.\"}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");
	let path = dir.path().join("picture.png");
	let err = client
		.fetch_attachment_to_file(&path, &asset(), &instance(), &attachment())
		.await
		.expect_err("404 must surface as an error.");

	assert!(matches!(err, Error::Transport(TransportError::Status { status: 404, .. })));
	assert!(!path.exists());
}

#[tokio::test]
async fn delete_record_accepts_empty_success() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/api/v2/assets/5678/data/9")
				.header("authorization", KOBO_AUTHORIZATION);
			then.status(204);
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());

	client.delete_record(&asset(), &instance()).await.expect("Delete should succeed.");

	delete_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn auth_failure_aborts_domain_call() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(401).body("{\"detail\":\"Invalid username/password.\"}");
		})
		.await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data.json");
			then.status(200).body("{\"results\":[]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let err = client.fetch_records(&asset()).await.expect_err("Rejected auth must fail the call.");

	assert!(matches!(err, Error::Auth(AuthError::Rejected { status: 401, .. })));
	assert!(client.tokens().token().is_none());
	assert!(client.tokens().is_stale());

	token_mock.assert_calls_async(1).await;
	data_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn token_response_without_token_fails_closed() {
	let server = MockServer::start_async().await;
	let _token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).body("{\"detail\":\"ok\"}");
		})
		.await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data.json");
			then.status(200).body("{\"results\":[]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let err = client.fetch_records(&asset()).await.expect_err("Tokenless auth must fail the call.");

	assert!(matches!(err, Error::Auth(AuthError::MissingToken { field: "token", .. })));

	data_mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn concurrent_first_calls_share_one_exchange() {
	let server = MockServer::start_async().await;
	let token_mock = mock_kobo_token(&server).await;
	let _data_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data.json");
			then.status(200).body("{\"results\":[\"some\",\"data\"]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let uid = asset();
	let (a, b, c) = tokio::join!(
		client.fetch_records(&uid),
		client.fetch_records(&uid),
		client.fetch_records(&uid)
	);

	for records in [a, b, c] {
		assert_eq!(records.expect("Concurrent listing should succeed.").len(), 2);
	}

	token_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rate_limit_spaces_consecutive_calls() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data.json");
			then.status(200).body("{\"results\":[]}");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default().with_rate_limit(5.0));
	let started = Instant::now();

	for _ in 0..3 {
		client.fetch_records(&asset()).await.expect("Rate-limited listing should succeed.");
	}

	assert!(started.elapsed() >= std::time::Duration::from_millis(400));

	data_mock.assert_calls_async(3).await;
}

#[tokio::test]
async fn non_success_domain_status_is_not_retried() {
	let server = MockServer::start_async().await;
	let _token_mock = mock_kobo_token(&server).await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/5678/data.json");
			then.status(500).body("upstream exploded");
		})
		.await;
	let client = kobo_client(&server, GuardConfig::default());
	let err = client.fetch_records(&asset()).await.expect_err("500 must surface as an error.");
	let Error::Transport(TransportError::Status { status, endpoint, body_preview }) = err else {
		panic!("Expected a status error.");
	};

	assert_eq!(status, 500);
	assert_eq!(endpoint, "GET /api/v2/assets/5678/data.json");
	assert_eq!(body_preview, "upstream exploded");

	data_mock.assert_calls_async(1).await;
}
