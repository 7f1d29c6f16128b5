//! In-process stand-in for the hosted backend: just enough of the data API
//! and the auth API for the services to talk to.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;

use moodspace::auth::jwt::read_claims;
use moodspace::auth::{AuthClient, AuthGate, Session, SessionStore};
use moodspace::config::Config;
use moodspace::db::Backend;

pub const ANON_KEY: &str = "anon-key";
pub const PASSWORD: &str = "correct horse";

#[derive(Clone)]
pub struct FakeUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Clone)]
pub struct StoredEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood_type_id: Option<i64>,
    pub realtalk_mode: Option<bool>,
    pub journal: Option<String>,
    pub visibility_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub struct FakeBackend {
    pub mood_types: Vec<(i64, String, String)>,
    pub visibility_levels: Vec<(i64, String)>,
    pub entries: Vec<StoredEntry>,
    pub users: Vec<FakeUser>,
    pub refresh_tokens: HashMap<String, Uuid>,
    /// When set, every entry insert is refused with this message.
    pub reject_inserts: Option<String>,
    /// When set, reference reads fail with a 500.
    pub fail_reference_reads: bool,
    pub signup_requires_confirmation: bool,
    pub token_ttl_secs: i64,
    pub hits: HashMap<String, usize>,
    /// Query string of the most recent request, keyed like `hits`.
    pub last_query: HashMap<String, HashMap<String, String>>,
    clock: DateTime<Utc>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            mood_types: vec![
                (1, "Happy".into(), "😊".into()),
                (2, "Sad".into(), "😢".into()),
                (3, "Excited".into(), "🤩".into()),
                (4, "Angry".into(), "😠".into()),
            ],
            visibility_levels: vec![
                (1, "Private".into()),
                (2, "Friends Only".into()),
                (3, "Public".into()),
            ],
            entries: Vec::new(),
            users: Vec::new(),
            refresh_tokens: HashMap::new(),
            reject_inserts: None,
            fail_reference_reads: false,
            signup_requires_confirmation: false,
            token_ttl_secs: 3600,
            hits: HashMap::new(),
            last_query: HashMap::new(),
            clock: Utc::now() - Duration::days(1),
        }
    }
}

impl FakeBackend {
    pub fn add_user(&mut self, email: &str, username: &str) -> FakeUser {
        let user = FakeUser {
            id: Uuid::new_v4(),
            email: email.into(),
            password: PASSWORD.into(),
            username: username.into(),
        };
        self.users.push(user.clone());
        user
    }

    pub fn hits(&self, key: &str) -> usize {
        self.hits.get(key).copied().unwrap_or(0)
    }

    /// A query parameter from the most recent request to `key`.
    pub fn last_param(&self, key: &str, param: &str) -> Option<String> {
        self.last_query.get(key)?.get(param).cloned()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.values().sum()
    }

    /// Strictly increasing timestamps so newest-first ordering is stable.
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::seconds(1);
        self.clock
    }

    pub fn insert_entry(&mut self, user_id: Uuid, mood_type_id: i64) -> Uuid {
        let created_at = self.tick();
        let id = Uuid::new_v4();
        self.entries.push(StoredEntry {
            id,
            user_id,
            mood_type_id: Some(mood_type_id),
            realtalk_mode: Some(false),
            journal: None,
            visibility_id: None,
            created_at,
        });
        id
    }

    /// Row as the data API renders it; the mood type is embedded only when
    /// `select` asks for it.
    fn entry_json(&self, e: &StoredEntry, select: Option<&str>) -> Value {
        let mut row = json!({
            "id": e.id,
            "user_id": e.user_id,
            "mood_type_id": e.mood_type_id,
            "realtalk_mode": e.realtalk_mode,
            "journal": e.journal,
            "visibility_id": e.visibility_id,
            "created_at": e.created_at,
        });
        if select.map_or(false, |s| s.contains("mood_types(")) {
            row["mood_types"] = e
                .mood_type_id
                .and_then(|id| {
                    self.mood_types
                        .iter()
                        .find(|(mid, _, _)| *mid == id)
                        .map(|(id, name, emoji)| json!({ "id": id, "name": name, "emoji": emoji }))
                })
                .unwrap_or(Value::Null);
        }
        row
    }

    fn issue(&mut self, user: &FakeUser) -> Value {
        let exp = Utc::now().timestamp() + self.token_ttl_secs;
        let access_token = encode(
            &Header::default(),
            &json!({ "sub": user.id, "email": user.email, "exp": exp, "aud": "authenticated" }),
            &EncodingKey::from_secret(b"fake-backend-secret"),
        )
        .unwrap();
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        self.refresh_tokens.insert(refresh_token.clone(), user.id);
        json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": self.token_ttl_secs,
            "expires_at": exp,
            "refresh_token": refresh_token,
            "user": user_json(user),
        })
    }
}

fn user_json(user: &FakeUser) -> Value {
    json!({
        "id": user.id,
        "email": user.email,
        "user_metadata": { "username": user.username },
    })
}

pub type Shared = Arc<Mutex<FakeBackend>>;

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn bearer_user(headers: &HeaderMap) -> Option<Uuid> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    read_claims(token).ok().map(|c| c.sub)
}

fn wants_object(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("vnd.pgrst.object"))
        .unwrap_or(false)
}

fn eq_filter(params: &HashMap<String, String>, column: &str) -> Option<String> {
    params
        .get(column)
        .and_then(|v| v.strip_prefix("eq."))
        .map(str::to_string)
}

/// `order=<column>.<asc|desc>` split into the column and whether it ascends.
fn order_by(params: &HashMap<String, String>) -> Option<(String, bool)> {
    let (column, direction) = params.get("order")?.rsplit_once('.')?;
    Some((column.to_string(), direction != "desc"))
}

fn count(state: &Shared, key: &str) {
    *state.lock().unwrap().hits.entry(key.to_string()).or_default() += 1;
}

fn record(state: &Shared, key: &str, params: &HashMap<String, String>) {
    count(state, key);
    state
        .lock()
        .unwrap()
        .last_query
        .insert(key.to_string(), params.clone());
}

// Rows come back in storage order unless the request names an `order`.
async fn list_mood_types(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "mood_types", &params);
    let s = state.lock().unwrap();
    if s.fail_reference_reads {
        return error(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    }
    let mut rows = s.mood_types.clone();
    if let Some((column, ascending)) = order_by(&params) {
        match column.as_str() {
            "id" => rows.sort_by_key(|r| r.0),
            "name" => rows.sort_by(|a, b| a.1.cmp(&b.1)),
            _ => {}
        }
        if !ascending {
            rows.reverse();
        }
    }
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|(id, name, emoji)| json!({ "id": id, "name": name, "emoji": emoji }))
        .collect();
    Json(rows).into_response()
}

async fn list_visibility_levels(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "visibility_levels", &params);
    let s = state.lock().unwrap();
    if s.fail_reference_reads {
        return error(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    }
    let mut rows = s.visibility_levels.clone();
    if let Some((column, ascending)) = order_by(&params) {
        match column.as_str() {
            "id" => rows.sort_by_key(|r| r.0),
            "level_name" => rows.sort_by(|a, b| a.1.cmp(&b.1)),
            _ => {}
        }
        if !ascending {
            rows.reverse();
        }
    }
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|(id, level_name)| json!({ "id": id, "level_name": level_name }))
        .collect();
    Json(rows).into_response()
}

async fn list_entries(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "mood_entries:get", &params);
    let s = state.lock().unwrap();
    let caller = bearer_user(&headers);
    let owner = eq_filter(&params, "user_id").and_then(|v| v.parse::<Uuid>().ok());

    let mut rows: Vec<&StoredEntry> = s
        .entries
        .iter()
        .filter(|e| Some(e.user_id) == caller)
        .filter(|e| owner.map_or(true, |o| e.user_id == o))
        .collect();
    if let Some((column, ascending)) = order_by(&params) {
        if column == "created_at" {
            rows.sort_by_key(|e| e.created_at);
            if !ascending {
                rows.reverse();
            }
        }
    }
    let select = params.get("select").map(String::as_str);
    let rows: Vec<Value> = rows.into_iter().map(|e| s.entry_json(e, select)).collect();
    Json(rows).into_response()
}

async fn create_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "mood_entries:post", &params);
    let mut s = state.lock().unwrap();
    let Some(caller) = bearer_user(&headers) else {
        return error(StatusCode::UNAUTHORIZED, json!({ "message": "JWT required" }));
    };
    if let Some(message) = s.reject_inserts.clone() {
        return error(
            StatusCode::CONFLICT,
            json!({ "code": "23505", "message": message, "details": null, "hint": null }),
        );
    }
    let user_id = body["user_id"].as_str().and_then(|v| v.parse::<Uuid>().ok());
    if user_id != Some(caller) {
        return error(
            StatusCode::FORBIDDEN,
            json!({ "code": "42501", "message": "new row violates row-level security policy" }),
        );
    }

    let created_at = s.tick();
    let entry = StoredEntry {
        id: Uuid::new_v4(),
        user_id: caller,
        mood_type_id: body["mood_type_id"].as_i64(),
        realtalk_mode: body["realtalk_mode"].as_bool(),
        journal: body["journal"].as_str().map(str::to_string),
        visibility_id: body["visibility_id"].as_i64(),
        created_at,
    };
    let json = s.entry_json(&entry, params.get("select").map(String::as_str));
    s.entries.push(entry);

    let json = if wants_object(&headers) { json } else { json!([json]) };
    (StatusCode::CREATED, Json(json)).into_response()
}

async fn update_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "mood_entries:patch", &params);
    let mut s = state.lock().unwrap();
    let caller = bearer_user(&headers);
    let id = eq_filter(&params, "id").and_then(|v| v.parse::<Uuid>().ok());
    let owner = eq_filter(&params, "user_id").and_then(|v| v.parse::<Uuid>().ok());

    let matching: Vec<usize> = s
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| Some(e.id) == id && Some(e.user_id) == owner && Some(e.user_id) == caller)
        .map(|(i, _)| i)
        .collect();

    if wants_object(&headers) && matching.len() != 1 {
        return error(
            StatusCode::NOT_ACCEPTABLE,
            json!({
                "code": "PGRST116",
                "message": "JSON object requested, multiple (or no) rows returned",
                "details": format!("The result contains {} rows", matching.len()),
                "hint": null,
            }),
        );
    }

    let mut updated = Vec::new();
    for i in matching {
        let entry = &mut s.entries[i];
        if let Some(v) = body.get("mood_type_id") {
            entry.mood_type_id = v.as_i64();
        }
        if let Some(v) = body.get("realtalk_mode") {
            entry.realtalk_mode = v.as_bool();
        }
        if let Some(v) = body.get("journal") {
            entry.journal = v.as_str().map(str::to_string);
        }
        if let Some(v) = body.get("visibility_id") {
            entry.visibility_id = v.as_i64();
        }
        updated.push(entry.clone());
    }

    let select = params.get("select").map(String::as_str);
    let rows: Vec<Value> = updated.iter().map(|e| s.entry_json(e, select)).collect();
    if wants_object(&headers) {
        Json(rows.into_iter().next().unwrap_or(Value::Null)).into_response()
    } else {
        Json(rows).into_response()
    }
}

async fn delete_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "mood_entries:delete", &params);
    let mut s = state.lock().unwrap();
    let caller = bearer_user(&headers);
    let id = eq_filter(&params, "id").and_then(|v| v.parse::<Uuid>().ok());
    let owner = eq_filter(&params, "user_id").and_then(|v| v.parse::<Uuid>().ok());
    s.entries
        .retain(|e| !(Some(e.id) == id && Some(e.user_id) == owner && Some(e.user_id) == caller));
    StatusCode::NO_CONTENT.into_response()
}

async fn token(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    count(&state, "auth:token");
    let mut s = state.lock().unwrap();
    let user = match params.get("grant_type").map(String::as_str) {
        Some("password") => {
            let email = body["email"].as_str().unwrap_or_default();
            let password = body["password"].as_str().unwrap_or_default();
            s.users
                .iter()
                .find(|u| u.email == email && u.password == password)
                .cloned()
        }
        Some("refresh_token") => {
            let presented = body["refresh_token"].as_str().unwrap_or_default();
            match s.refresh_tokens.remove(presented) {
                Some(id) => s.users.iter().find(|u| u.id == id).cloned(),
                None => None,
            }
        }
        _ => None,
    };

    match user {
        Some(user) => Json(s.issue(&user)).into_response(),
        None => error(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }),
        ),
    }
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    count(&state, "auth:signup");
    let mut s = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let username = body["data"]["username"].as_str().unwrap_or_default().to_string();

    if password.len() < 6 {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "code": 422, "msg": "Password should be at least 6 characters" }),
        );
    }
    if s.users.iter().any(|u| u.email == email) {
        return error(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "code": 422, "msg": "User already registered" }),
        );
    }

    let user = FakeUser {
        id: Uuid::new_v4(),
        email,
        password,
        username,
    };
    s.users.push(user.clone());

    if s.signup_requires_confirmation {
        Json(user_json(&user)).into_response()
    } else {
        Json(s.issue(&user)).into_response()
    }
}

async fn logout(State(state): State<Shared>) -> Response {
    count(&state, "auth:logout");
    StatusCode::NO_CONTENT.into_response()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    count(&state, "auth:user");
    let s = state.lock().unwrap();
    match bearer_user(&headers).and_then(|id| s.users.iter().find(|u| u.id == id)) {
        Some(user) => Json(user_json(user)).into_response(),
        None => error(
            StatusCode::UNAUTHORIZED,
            json!({ "code": 401, "msg": "invalid JWT: unable to parse or verify signature" }),
        ),
    }
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/rest/v1/mood_types", get(list_mood_types))
        .route("/rest/v1/visibility_levels", get(list_visibility_levels))
        .route(
            "/rest/v1/mood_entries",
            get(list_entries)
                .post(create_entry)
                .patch(update_entry)
                .delete(delete_entry),
        )
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/user", get(current_user))
        .with_state(state)
}

/// Start the fake on an ephemeral port and return a config pointing at it.
pub async fn spawn(fake: FakeBackend) -> (Shared, Config) {
    let state: Shared = Arc::new(Mutex::new(fake));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, Config::new(format!("http://{}", addr), ANON_KEY))
}

pub fn backend(config: &Config) -> Backend {
    Backend::new(Arc::new(config.clone())).unwrap()
}

pub fn gate(config: &Config, store: Option<SessionStore>) -> AuthGate {
    AuthGate::new(AuthClient::new(backend(config)), store, config)
}

pub async fn sign_in(config: &Config, email: &str) -> Session {
    AuthClient::new(backend(config))
        .sign_in(email, PASSWORD)
        .await
        .unwrap()
}
