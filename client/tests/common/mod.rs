#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use client::notice::{Notice, Notify};
use kernel::{Category, CategoryStats, FileId, FileStats, MediaFile, PermanentRequest};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const STORAGE_ROOT: &str = "/srv/media/uploads";

#[derive(Debug, Clone)]
pub struct UploadedPart {
    pub field: String,
    pub file_name: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct UploadRecord {
    pub authorization: Option<String>,
    pub parts: Vec<UploadedPart>,
}

/// In-memory stand-in for the storage service.
#[derive(Default)]
pub struct MockState {
    pub files: Vec<MediaFile>,
    pub contents: HashMap<String, Vec<u8>>,
    /// Served verbatim by the list endpoint instead of `files` when set
    pub raw_listing: Option<serde_json::Value>,
    pub next_id: u64,
    pub list_requests: Vec<Option<String>>,
    pub stats_requests: usize,
    pub uploads: Vec<UploadRecord>,
    pub knowledge_requests: Vec<String>,
    pub delete_requests: Vec<String>,
    pub reject_upload: bool,
    /// Listings answered with 500, keyed by category or `all`
    pub reject_list: HashSet<String>,
    pub reject_delete: HashSet<String>,
    pub reject_retention: HashSet<String>,
    /// Retention policy overrides, the service answers with these values
    pub forced_retention: HashMap<String, bool>,
    /// Response delays keyed by `list:<category|all>`, `upload`, `delete`,
    /// `permanent` or `knowledge`
    pub delays: HashMap<String, Duration>,
}

impl MockState {
    pub fn seeded() -> Self {
        let files = vec![
            media("1", "Cat.png", "image/png", Category::Images, 1_048_576, false),
            media("2", "dog.jpg", "image/jpeg", Category::Images, 1_048_576, true),
            media("3", "report.pdf", "application/pdf", Category::Documents, 1_048_576, false),
            media("4", "intro.mp4", "video/mp4", Category::Videos, 4_194_304, false),
            media("5", "memo.ogg", "audio/ogg", Category::Audios, 524_288, false),
        ];
        Self {
            files,
            next_id: 6,
            ..Self::default()
        }
    }

    fn stats(&self) -> FileStats {
        let mut stats = FileStats::default();
        for f in &self.files {
            stats.total_files += 1;
            stats.total_size += f.file_size;
            let entry = stats
                .by_category
                .entry(f.category_name.clone())
                .or_insert_with(CategoryStats::default);
            entry.count += 1;
            entry.size += f.file_size;
        }
        stats
    }

    fn delay(&self, key: &str) -> Option<Duration> {
        self.delays.get(key).copied()
    }
}

pub fn media(
    id: &str,
    name: &str,
    mime: &str,
    category: Category,
    size: u64,
    permanent: bool,
) -> MediaFile {
    MediaFile {
        id: FileId::new(id),
        filename: format!("{id}_{name}"),
        original_name: name.to_owned(),
        mime_type: mime.to_owned(),
        category_name: category.as_str().to_owned(),
        file_size: size,
        platform: None,
        chat_id: None,
        processed: false,
        created_at: "2026-10-12T09:30:00Z".to_owned(),
        is_permanent: permanent,
    }
}

type Shared = Arc<Mutex<MockState>>;

pub struct MockServer {
    pub uri: String,
    pub state: Shared,
    shutdown: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(state: MockState) -> MockServer {
        let state = Arc::new(Mutex::new(state));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (send, recv) = oneshot::channel::<()>();

        let app = routes(Arc::clone(&state));
        let join = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    recv.await.unwrap_or_default();
                })
                .await
                .unwrap();
        });

        MockServer {
            uri: format!("http://{addr}"),
            state,
            shutdown: send,
            join,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    /// Simulates the knowledge pipeline finishing.
    pub fn finish_processing(&self, id: &str) {
        self.with(|s| {
            if let Some(f) = s.files.iter_mut().find(|f| f.id.as_str() == id) {
                f.processed = true;
            }
        });
    }

    pub async fn stop(self) {
        self.shutdown.send(()).unwrap_or_default();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.join).await;
    }
}

fn routes(state: Shared) -> Router {
    Router::new()
        .route("/api/files", get(list_files))
        .route("/api/files/stats", get(stats))
        .route("/api/files/path", get(storage_path))
        .route("/api/files/upload", post(upload))
        .route("/api/files/:id", delete(delete_file))
        .route("/api/files/:id/permanent", put(set_permanent))
        .route("/api/files/:id/process-knowledge", post(process_knowledge))
        .route("/api/files/:id/content", get(content))
        .with_state(state)
}

async fn pause(delay: Option<Duration>) {
    if let Some(d) = delay {
        tokio::time::sleep(d).await;
    }
}

async fn list_files(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let category = query.get("category").cloned();
    let (delay, body) = {
        let mut s = state.lock().unwrap();
        s.list_requests.push(category.clone());
        let partition = category.as_deref().unwrap_or("all");
        let body = if s.reject_list.contains(partition) {
            None
        } else {
            Some(match &s.raw_listing {
                Some(raw) => raw.clone(),
                None => {
                    let files: Vec<&MediaFile> = s
                        .files
                        .iter()
                        .filter(|f| category.as_deref().map_or(true, |c| f.category_name == c))
                        .collect();
                    serde_json::to_value(files).unwrap()
                }
            })
        };
        (s.delay(&format!("list:{partition}")), body)
    };
    pause(delay).await;
    match body {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "listing failed").into_response(),
    }
}

async fn stats(State(state): State<Shared>) -> Response {
    let mut s = state.lock().unwrap();
    s.stats_requests += 1;
    Json(s.stats()).into_response()
}

async fn storage_path() -> Response {
    Json(serde_json::json!({ "path": STORAGE_ROOT })).into_response()
}

fn category_of(mime: &str) -> Category {
    match mime.split('/').next().unwrap_or_default() {
        "image" => Category::Images,
        "video" => Category::Videos,
        "audio" => Category::Audios,
        _ => Category::Documents,
    }
}

async fn upload(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut parts = Vec::new();
    let mut received = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let data = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(UploadedPart {
            field: name,
            file_name: file_name.clone(),
            size: data.len(),
        });
        received.push((file_name, mime, data));
    }

    let delay = {
        let mut s = state.lock().unwrap();
        s.uploads.push(UploadRecord {
            authorization,
            parts,
        });
        s.delay("upload")
    };
    pause(delay).await;

    let mut s = state.lock().unwrap();
    if s.reject_upload {
        return (StatusCode::INTERNAL_SERVER_ERROR, "storage full").into_response();
    }
    for (file_name, mime, data) in received {
        let id = s.next_id.to_string();
        s.next_id += 1;
        let mut file = media(&id, &file_name, &mime, category_of(&mime), data.len() as u64, false);
        file.created_at = "2026-10-16T10:00:00Z".to_owned();
        s.contents.insert(id, data);
        s.files.push(file);
    }
    (StatusCode::CREATED, Json(serde_json::json!({ "success": true }))).into_response()
}

async fn delete_file(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let delay = {
        let mut s = state.lock().unwrap();
        s.delete_requests.push(id.clone());
        s.delay("delete")
    };
    pause(delay).await;

    let mut s = state.lock().unwrap();
    if s.reject_delete.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "delete failed").into_response();
    }
    let before = s.files.len();
    s.files.retain(|f| f.id.as_str() != id);
    if s.files.len() == before {
        return (StatusCode::NOT_FOUND, "no such file").into_response();
    }
    s.contents.remove(&id);
    Json(serde_json::json!({ "success": true })).into_response()
}

async fn set_permanent(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(request): Json<PermanentRequest>,
) -> Response {
    let delay = state.lock().unwrap().delay("permanent");
    pause(delay).await;

    let mut s = state.lock().unwrap();
    if s.reject_retention.contains(&id) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "retention not changed").into_response();
    }
    let applied = s
        .forced_retention
        .get(&id)
        .copied()
        .unwrap_or(request.is_permanent);
    match s.files.iter_mut().find(|f| f.id.as_str() == id) {
        Some(file) => {
            file.is_permanent = applied;
            Json(serde_json::json!({ "is_permanent": i32::from(applied) })).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such file").into_response(),
    }
}

async fn process_knowledge(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let delay = state.lock().unwrap().delay("knowledge");
    pause(delay).await;

    let mut s = state.lock().unwrap();
    if !s.files.iter().any(|f| f.id.as_str() == id) {
        return (StatusCode::NOT_FOUND, "no such file").into_response();
    }
    s.knowledge_requests.push(id);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "message": "processing started" })),
    )
        .into_response()
}

async fn content(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let s = state.lock().unwrap();
    match s.contents.get(&id) {
        Some(data) => (StatusCode::OK, data.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no such file").into_response(),
    }
}

/// Collects notices for assertions.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<Notice>>);

impl Recorder {
    pub fn notices(&self) -> Vec<Notice> {
        self.0.lock().unwrap().clone()
    }
}

impl Notify for Recorder {
    fn notify(&self, notice: Notice) {
        self.0.lock().unwrap().push(notice);
    }
}
