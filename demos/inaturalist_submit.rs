//! Submits an observation, a photo, and a field value to a mocked iNaturalist deployment.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use gluon::{
	auth::PasswordGrant,
	client::{InaturalistClient, NewObservation},
	config::InaturalistConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\"}");
		})
		.await;
	let _observation_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/observations").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("{\"id\":11}");
		})
		.await;
	let _photo_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/observation_photos");
			then.status(200).body("{}");
		})
		.await;
	let _field_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/observation_field_values");
			then.status(200).body("{}");
		})
		.await;
	let config = InaturalistConfig::default()
		.with_app_url(server.base_url())?
		.with_api_url(server.base_url())?;
	let credentials = PasswordGrant::new("naturalist", "hunter2", "demo-app", "demo-secret");
	let inaturalist = InaturalistClient::new(config, credentials)?;
	let id = inaturalist
		.submit_observation(&NewObservation {
			taxon_id: 2,
			longitude: -71.157109,
			latitude: 42.462211,
			observed_on_string: "2022-08-17T10:04:00-04:00".into(),
			positional_accuracy: 5,
			description: "Hello World!".into(),
		})
		.await?;

	println!("Created observation {id}.");

	let dir = tempfile::tempdir()?;
	let photo = dir.path().join("heron.png");

	std::fs::write(&photo, "a pretty picture")?;
	inaturalist.attach_photo(id, &photo).await?;
	inaturalist.attach_field(id, 42, "cloudy").await?;

	println!("Attached a photo and a field value to observation {id}.");

	token_mock.assert_async().await;

	Ok(())
}
