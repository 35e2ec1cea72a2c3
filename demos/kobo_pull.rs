//! Pulls submissions and one attachment from a mocked KoboToolbox server, showing the lazy
//! token exchange and the per-client rate guard.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use gluon::{
	auth::{AssetUid, AttachmentId, BasicCredentials, InstanceId},
	client::KoboClient,
	config::{GuardConfig, KoboConfig},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token").query_param("format", "json");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token\":\"demo-token\"}");
		})
		.await;
	let data_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v2/assets/aHkq9/data.json")
				.header("authorization", "Token demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"count\":1,\"results\":[{\"_id\":9,\"species\":\"heron\"}]}");
		})
		.await;
	let _image_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v2/assets/aHkq9/data/9/attachments/0/");
			then.status(200).header("content-type", "image/png").body("a pretty picture");
		})
		.await;
	let config = KoboConfig::default()
		.with_url(server.base_url())?
		.with_guard(GuardConfig::default().with_rate_limit(2.0));
	let kobo = KoboClient::new(config, BasicCredentials::new("surveyor", "hunter2"))?;
	let asset = AssetUid::new("aHkq9")?;
	let records = kobo.fetch_records(&asset).await?;

	println!("Pulled {} record(s): {records:?}.", records.len());

	let picture = kobo
		.fetch_attachment_bytes(&asset, &InstanceId::new("9")?, &AttachmentId::new("0")?)
		.await?;

	println!("Downloaded {} attachment byte(s).", picture.len());

	token_mock.assert_async().await;
	data_mock.assert_async().await;

	Ok(())
}
