use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use artconnect_common::test_utils::blue_pottery_bowl;
use client::domain::auth::Credentials;
use client::domain::guard::{ActivityEvent, GuardState};
use client::domain::session::{Navigator, Route};
use client::domain::upload::{DEFAULT_IMAGE_URL, UploadForm};
use client::{AppState, AppStateImpl, Settings};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Default)]
struct RecordingNavigator {
    visited: Arc<Mutex<Vec<Route>>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.visited.lock().unwrap().push(route);
    }
}

async fn memory_state(base_url: &str, idle_timeout_seconds: u64) -> AppStateImpl {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.yaml"),
        format!(
            "auth:\n  base_url: {base_url}\nsession:\n  idle_timeout_seconds: {idle_timeout_seconds}\nstorage:\n  backend: memory\n"
        ),
    )
    .unwrap();

    let settings = Settings::load(dir.path(), "test").unwrap();
    AppStateImpl::from_settings(&settings).await.unwrap()
}

#[tokio::test]
async fn draft_then_publish_end_to_end() {
    let state = memory_state("http://localhost:5000", 600).await;
    let drafts = state.drafts();

    let saved = drafts.save_draft(blue_pottery_bowl()).await.unwrap();

    let listed = drafts.list_drafts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].fields.title, "Blue Pottery Bowl");
    assert!(listed[0].is_draft);

    drafts.publish_draft(&saved.id).await.unwrap().unwrap();

    assert!(drafts.list_drafts().await.unwrap().is_empty());
    let published = drafts.list_published().await.unwrap();
    assert_eq!(published.len(), 1);
    assert!(!published[0].is_draft);
    assert_eq!(published[0].fields.title, "Blue Pottery Bowl");
}

#[tokio::test]
async fn validated_upload_is_published_with_default_image() {
    let state = memory_state("http://localhost:5000", 600).await;

    let form = UploadForm {
        title: "Madhubani Painting".to_string(),
        description: "Folk art on handmade paper".to_string(),
        region: "Madhubani, Bihar".to_string(),
        category: "Painting".to_string(),
        ..Default::default()
    };
    let craft = state.drafts().publish_craft(form.validate().unwrap()).await.unwrap();

    let published = state.drafts().list_published().await.unwrap();
    assert_eq!(published, vec![craft]);
    assert_eq!(published[0].fields.image_url, DEFAULT_IMAGE_URL);
    assert_eq!(published[0].fields.artisan_name, "Kamala Devi");

    let incomplete = UploadForm {
        title: "Untitled".to_string(),
        ..Default::default()
    };
    assert!(incomplete.validate().is_err());
}

#[tokio::test]
async fn sign_in_then_idle_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "jwt-e2e",
            "message": "Signin successful."
        })))
        .mount(&server)
        .await;

    let state = memory_state(&server.uri(), 1).await;
    state
        .auth()
        .sign_in(&Credentials::new("raj", "secret").unwrap())
        .await
        .unwrap();
    assert!(state.session().is_authenticated().await.unwrap());

    let navigator = RecordingNavigator::default();
    let guard = state.inactivity_guard(navigator.clone());
    assert_eq!(guard.idle_threshold(), Duration::from_secs(1));
    guard.start();
    guard.on_activity(ActivityEvent::KeyPress);

    tokio::time::sleep(Duration::from_millis(1_500)).await;

    assert_eq!(guard.state(), GuardState::Stopped);
    assert!(!state.session().is_authenticated().await.unwrap());
    assert_eq!(*navigator.visited.lock().unwrap(), vec![Route::Landing]);
}
