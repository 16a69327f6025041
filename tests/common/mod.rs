//! Shared fakes for the host collaborators, the rendering backend and the mission API.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use mission_dashboard::api::MissionApiClient;
use mission_dashboard::category::Category;
use mission_dashboard::charts::backend::{ChartConfig, ThemeColors, UpdateMode};
use mission_dashboard::charts::{ChartBackend, ChartHandle};
use mission_dashboard::collaborators::{
    AuthGate, LoadingIndicator, Notifier, PageReloader, PanelView,
};
use mission_dashboard::config::Config;
use mission_dashboard::dashboard::{Collaborators, Dashboard};
use mission_dashboard::error::{FetchError, RenderError};
use mission_dashboard::preferences::MemoryPreferenceStore;
use mission_dashboard::sync::staleness::{CacheSnapshot, CacheStatusSource};

pub const MISSION: &str = "m203";

// ----- rendering backend -----

#[derive(Default)]
pub struct FakeBackend {
    next: AtomicU64,
    pub live: Mutex<HashMap<u64, String>>,
    pub created: Mutex<Vec<(String, ChartConfig)>>,
    pub destroyed: Mutex<Vec<u64>>,
    pub updates: Mutex<Vec<(u64, ThemeColors, UpdateMode)>>,
    pub placeholders: Mutex<Vec<(String, String)>>,
    /// Colors each handle was last drawn with.
    pub themes: Mutex<HashMap<u64, ThemeColors>>,
}

impl FakeBackend {
    pub fn live_on(&self, canvas_id: &str) -> usize {
        self.live.lock().values().filter(|c| *c == canvas_id).count()
    }

    pub fn placeholders_on(&self, canvas_id: &str) -> usize {
        self.placeholders
            .lock()
            .iter()
            .filter(|(c, _)| c == canvas_id)
            .count()
    }

    /// Colors of every live chart, keyed by handle.
    pub fn live_themes(&self) -> Vec<(u64, ThemeColors)> {
        let live = self.live.lock();
        let themes = self.themes.lock();
        live.keys()
            .filter_map(|h| themes.get(h).map(|t| (*h, t.clone())))
            .collect()
    }

    pub fn created_on(&self, canvas_id: &str) -> Vec<ChartConfig> {
        self.created
            .lock()
            .iter()
            .filter(|(c, _)| c == canvas_id)
            .map(|(_, cfg)| cfg.clone())
            .collect()
    }
}

impl ChartBackend for FakeBackend {
    fn create(&self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        let id = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        self.live.lock().insert(id, canvas_id.to_string());
        self.themes.lock().insert(id, config.theme.clone());
        self.created
            .lock()
            .push((canvas_id.to_string(), config.clone()));
        Ok(ChartHandle(id))
    }

    fn destroy(&self, handle: ChartHandle) {
        self.live.lock().remove(&handle.0);
        self.destroyed.lock().push(handle.0);
    }

    fn update(&self, handle: ChartHandle, config: &ChartConfig, mode: UpdateMode) {
        self.themes.lock().insert(handle.0, config.theme.clone());
        self.updates
            .lock()
            .push((handle.0, config.theme.clone(), mode));
    }

    fn draw_placeholder(&self, canvas_id: &str, message: &str) {
        self.placeholders
            .lock()
            .push((canvas_id.to_string(), message.to_string()));
    }
}

// ----- host collaborators -----

pub struct FakeAuth {
    pub authenticated: AtomicBool,
    pub sign_outs: AtomicUsize,
}

impl Default for FakeAuth {
    fn default() -> Self {
        Self {
            authenticated: AtomicBool::new(true),
            sign_outs: AtomicUsize::new(0),
        }
    }
}

impl FakeAuth {
    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

impl AuthGate for FakeAuth {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn force_sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub toasts: Mutex<Vec<String>>,
    pub inline: Mutex<Vec<(Category, String)>>,
}

impl Notifier for FakeNotifier {
    fn toast(&self, message: &str) {
        self.toasts.lock().push(message.to_string());
    }

    fn inline_validation(&self, category: Category, message: &str) {
        self.inline.lock().push((category, message.to_string()));
    }
}

#[derive(Default)]
pub struct FakeSpinner {
    pub events: Mutex<Vec<(String, bool)>>,
}

impl LoadingIndicator for FakeSpinner {
    fn set_loading(&self, canvas_id: &str, loading: bool) {
        self.events.lock().push((canvas_id.to_string(), loading));
    }
}

#[derive(Default)]
pub struct FakePanels {
    pub visible: Mutex<HashSet<Category>>,
}

impl PanelView for FakePanels {
    fn show(&self, category: Category) {
        self.visible.lock().insert(category);
    }

    fn hide(&self, category: Category) {
        self.visible.lock().remove(&category);
    }
}

#[derive(Default)]
pub struct FakeReloader {
    pub reasons: Mutex<Vec<String>>,
}

impl FakeReloader {
    pub fn count(&self) -> usize {
        self.reasons.lock().len()
    }
}

impl PageReloader for FakeReloader {
    fn hard_reload(&self, reason: &str) {
        self.reasons.lock().push(reason.to_string());
    }
}

/// Cache-status source replaying a fixed sequence of poll results.
#[derive(Default)]
pub struct ScriptedCacheStatus {
    pub polls: Mutex<VecDeque<Result<CacheSnapshot, FetchError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedCacheStatus {
    pub fn new(polls: Vec<Result<CacheSnapshot, FetchError>>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl CacheStatusSource for ScriptedCacheStatus {
    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<CacheSnapshot, FetchError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .polls
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Transient("script exhausted".to_string())));
        Box::pin(async move { next })
    }
}

/// Build a snapshot from `(report_type, cache_timestamp)` pairs.
pub fn snapshot(entries: &[(&str, &str)]) -> CacheSnapshot {
    let value: serde_json::Map<String, Value> = entries
        .iter()
        .map(|(k, ts)| {
            (
                (*k).to_string(),
                json!({ "cache_timestamp": ts, "last_data_timestamp": ts }),
            )
        })
        .collect();
    serde_json::from_value(Value::Object(value)).expect("valid snapshot")
}

// ----- mock mission API -----

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub key: String,
    pub query: HashMap<String, String>,
}

#[derive(Default)]
struct MockInner {
    responses: HashMap<String, (u16, Value)>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockInner>>,
}

impl MockApi {
    /// Respond to `key` (e.g. `data/power`, `cache-status`, `wave_spectrum`).
    pub fn respond(&self, key: &str, status: u16, body: Value) {
        self.inner
            .lock()
            .responses
            .insert(key.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().requests.clone()
    }

    pub fn requests_for(&self, key: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.key == key).collect()
    }

    fn handle(&self, key: String, query: HashMap<String, String>) -> (StatusCode, Json<Value>) {
        let mut inner = self.inner.lock();
        inner.requests.push(RecordedRequest {
            key: key.clone(),
            query,
        });
        let (status, body) = inner
            .responses
            .get(&key)
            .cloned()
            .unwrap_or((404, json!({ "detail": "not found" })));
        (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        )
    }
}

async fn data_handler(
    State(api): State<MockApi>,
    Path((report_type, _mission_id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    api.handle(format!("data/{report_type}"), query)
}

fn keyed(key: &'static str) -> axum::routing::MethodRouter<MockApi> {
    get(
        move |State(api): State<MockApi>,
              Path(_mission_id): Path<String>,
              Query(query): Query<HashMap<String, String>>| async move {
            api.handle(key.to_string(), query)
        },
    )
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn spawn_mock_api(api: MockApi) -> String {
    let app = Router::new()
        .route("/api/data/{report_type}/{mission_id}", get(data_handler))
        .route("/api/cache-status/{mission_id}", keyed("cache-status"))
        .route("/api/forecast/{mission_id}", keyed("forecast"))
        .route("/api/marine_forecast/{mission_id}", keyed("marine_forecast"))
        .route("/api/wave_spectrum/{mission_id}", keyed("wave_spectrum"))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock api");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock api");
    });
    format!("http://{addr}")
}

pub fn test_config(base_url: &str) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("MISSION_API_BASE_URL", base_url.to_string()),
        ("MISSION_ID", MISSION.to_string()),
        ("MISSION_REQUEST_TIMEOUT_SECONDS", "5".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// All fakes plus the dashboard built on them.
pub struct Harness {
    pub api: MockApi,
    pub backend: Arc<FakeBackend>,
    pub auth: Arc<FakeAuth>,
    pub notifier: Arc<FakeNotifier>,
    pub spinner: Arc<FakeSpinner>,
    pub panels: Arc<FakePanels>,
    pub reloader: Arc<FakeReloader>,
    pub dashboard: Dashboard,
}

impl Harness {
    pub async fn start() -> Self {
        let api = MockApi::default();
        let base_url = spawn_mock_api(api.clone()).await;
        let config = test_config(&base_url);

        let backend = Arc::new(FakeBackend::default());
        let auth = Arc::new(FakeAuth::default());
        let notifier = Arc::new(FakeNotifier::default());
        let spinner = Arc::new(FakeSpinner::default());
        let panels = Arc::new(FakePanels::default());
        let reloader = Arc::new(FakeReloader::default());

        let collaborators = Collaborators {
            auth: auth.clone(),
            notifier: notifier.clone(),
            spinner: spinner.clone(),
            panels: panels.clone(),
            reloader: reloader.clone(),
            charts: backend.clone(),
            preferences: Arc::new(MemoryPreferenceStore::default()),
        };
        let dashboard = Dashboard::new(config, collaborators).expect("dashboard");

        Self {
            api,
            backend,
            auth,
            notifier,
            spinner,
            panels,
            reloader,
            dashboard,
        }
    }

    pub fn api_client(base_url: &str) -> MissionApiClient {
        MissionApiClient::new(&test_config(base_url)).expect("api client")
    }
}
