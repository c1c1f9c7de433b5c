//! In-memory stand-in for the admin console backend.
//!
//! Serves every endpoint the console consumes under `/api/v1`. List
//! endpoints deliberately answer in different envelopes (users wrapped in
//! `data`, categories under `categories`, services as a bare array). OTPs
//! are always `MOCK_OTP`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

pub const MOCK_OTP: &str = "123456";
pub const ADMIN_PHONE: &str = "0912345678";
pub const ADMIN_PASSWORD: &str = "secret1";
pub const ADMIN_EMAIL: &str = "admin@example.com";

const ROLE_ADMIN: u8 = 1;
const ROLE_CUSTOMER: u8 = 3;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub role_id: u8,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub item_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub duration: Option<u32>,
    pub price: f64,
    pub category_id: Option<u64>,
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
}

#[derive(Deserialize)]
pub struct VerifyInput {
    pub otp: String,
    #[serde(rename = "numberPhone")]
    pub number_phone: String,
}

#[derive(Deserialize)]
pub struct EmailInput {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetOtpInput {
    pub email: String,
    pub otp: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordInput {
    pub reset_token: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub role_id: Option<u8>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
pub struct ToggleUser {
    pub is_active: bool,
}

#[derive(Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct ServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub duration: Option<u32>,
    pub price: f64,
    /// Accepts a number or a numeric string.
    pub category_id: Option<Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone)]
struct PendingSignup {
    email: String,
    password: String,
    full_name: String,
}

#[derive(Default)]
pub struct Store {
    users: BTreeMap<u64, User>,
    categories: BTreeMap<u64, Category>,
    services: BTreeMap<u64, Service>,
    /// token → user id
    tokens: HashMap<String, u64>,
    /// phone → signup awaiting OTP
    pending: HashMap<String, PendingSignup>,
    /// emails that requested a reset OTP
    reset_requests: HashMap<String, u64>,
    /// reset token → user id
    reset_tokens: HashMap<String, u64>,
    next_id: u64,
}

impl Store {
    /// A store holding one active admin.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        let id = store.allocate_id();
        store.users.insert(
            id,
            User {
                id,
                full_name: "Administrator".to_string(),
                email: ADMIN_EMAIL.to_string(),
                phone_number: ADMIN_PHONE.to_string(),
                role_id: ROLE_ADMIN,
                is_active: true,
                password: ADMIN_PASSWORD.to_string(),
            },
        );
        store
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn issue_token(&mut self, user_id: u64) -> String {
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    fn category_view(&self, category: &Category) -> Category {
        let item_count = self
            .services
            .values()
            .filter(|service| service.category_id == Some(category.id))
            .count() as u64;
        Category {
            item_count,
            ..category.clone()
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

/// An error answered as JSON. The field name varies like the real backend's.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    field: &'static str,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            field: "message",
            message: message.into(),
        }
    }

    fn with_field(mut self, field: &'static str) -> Self {
        self.field = field;
        self
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let Failure {
            status,
            field,
            message,
        } = self;
        (status, Json(json!({ field: message }))).into_response()
    }
}

type Reply = Result<(StatusCode, Json<Value>), Failure>;

pub fn app() -> Router {
    app_with(Arc::new(RwLock::new(Store::seeded())))
}

pub fn app_with(db: Db) -> Router {
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/verify", post(verify))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-otp", post(verify_reset_otp))
        .route("/auth/reset-password", post(reset_password))
        .route("/admin-user/get-admin", get(list_users))
        .route("/admin-user/update-admin/{id}", put(update_user))
        .route("/admin-user/delete-admin/{id}", delete(delete_user))
        .route("/admin-user/toggle-admin/{id}", patch(toggle_user))
        .route("/category/get-all", get(list_categories))
        .route("/category/create", post(create_category))
        .route("/category/update/{id}", put(update_category))
        .route("/category/delete/{id}", delete(delete_category))
        .route("/service/get-all", get(list_services))
        .route("/service/create", post(create_service))
        .route("/service/update/{id}", put(update_service))
        .route("/service/delete/{id}", delete(delete_service));
    Router::new().nest("/api/v1", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

/// Resolve the bearer token to an active admin.
fn authorize(store: &Store, headers: &HeaderMap) -> Result<u64, Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "missing token"))?;
    let user_id = *store
        .tokens
        .get(token)
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "invalid or expired token"))?;
    match store.users.get(&user_id) {
        Some(user) if user.is_active && user.role_id == ROLE_ADMIN => Ok(user_id),
        Some(_) => Err(Failure::new(StatusCode::FORBIDDEN, "admin only")),
        None => Err(Failure::new(StatusCode::UNAUTHORIZED, "invalid or expired token")),
    }
}

fn parse_id(raw: &str) -> Result<u64, Failure> {
    raw.parse().map_err(|_| Failure::not_found())
}

fn id_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// --- auth ---

async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Reply {
    let mut store = db.write().await;
    let user = store
        .users
        .values()
        .find(|user| user.phone_number == input.number_phone && user.password == input.password)
        .cloned()
        .ok_or_else(|| Failure::new(StatusCode::UNAUTHORIZED, "wrong phone number or password"))?;
    if !user.is_active {
        return Err(Failure::new(StatusCode::FORBIDDEN, "account is locked"));
    }
    let token = store.issue_token(user.id);
    Ok((StatusCode::OK, Json(json!({ "data": { "token": token, "user": user } }))))
}

async fn register(State(db): State<Db>, Json(input): Json<RegisterInput>) -> Reply {
    let mut store = db.write().await;
    let taken = store
        .users
        .values()
        .any(|user| user.email == input.email || user.phone_number == input.number_phone);
    if taken {
        return Err(Failure::new(StatusCode::CONFLICT, "account already exists").with_field("mes"));
    }
    store.pending.insert(
        input.number_phone,
        PendingSignup {
            email: input.email,
            password: input.password,
            full_name: input.full_name,
        },
    );
    Ok((StatusCode::CREATED, Json(json!({ "data": { "message": "otp sent" } }))))
}

async fn verify(State(db): State<Db>, Json(input): Json<VerifyInput>) -> Reply {
    let mut store = db.write().await;
    if input.otp != MOCK_OTP {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "invalid otp"));
    }
    let signup = store
        .pending
        .remove(&input.number_phone)
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "no pending registration"))?;
    let id = store.allocate_id();
    let user = User {
        id,
        full_name: signup.full_name,
        email: signup.email,
        phone_number: input.number_phone,
        role_id: ROLE_CUSTOMER,
        is_active: true,
        password: signup.password,
    };
    store.users.insert(id, user.clone());
    let token = store.issue_token(id);
    Ok((StatusCode::OK, Json(json!({ "data": { "token": token, "user": user } }))))
}

async fn forgot_password(State(db): State<Db>, Json(input): Json<EmailInput>) -> Reply {
    let mut store = db.write().await;
    let user_id = store
        .users
        .values()
        .find(|user| user.email == input.email)
        .map(|user| user.id)
        .ok_or_else(|| Failure::new(StatusCode::NOT_FOUND, "email not registered"))?;
    store.reset_requests.insert(input.email, user_id);
    Ok((StatusCode::OK, Json(json!({ "data": { "message": "otp sent" } }))))
}

async fn verify_reset_otp(State(db): State<Db>, Json(input): Json<ResetOtpInput>) -> Reply {
    let mut store = db.write().await;
    if input.otp != MOCK_OTP {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "invalid otp"));
    }
    let user_id = store
        .reset_requests
        .remove(&input.email)
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "no reset requested"))?;
    let reset_token = Uuid::new_v4().to_string();
    store.reset_tokens.insert(reset_token.clone(), user_id);
    Ok((StatusCode::OK, Json(json!({ "data": { "reset_token": reset_token } }))))
}

async fn reset_password(State(db): State<Db>, Json(input): Json<ResetPasswordInput>) -> Reply {
    let mut store = db.write().await;
    if input.new_password.len() < 6 {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "password too short").with_field("error"));
    }
    let user_id = store
        .reset_tokens
        .remove(&input.reset_token)
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "invalid reset token"))?;
    if let Some(user) = store.users.get_mut(&user_id) {
        user.password = input.new_password;
    }
    store.tokens.retain(|_, owner| *owner != user_id);
    Ok((StatusCode::OK, Json(json!({ "data": { "message": "password updated" } }))))
}

// --- admin users ---

async fn list_users(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    authorize(&store, &headers)?;
    let users: Vec<&User> = store.users.values().collect();
    Ok((StatusCode::OK, Json(json!({ "data": users }))))
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateUser>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    let user = store.users.get_mut(&id).ok_or_else(Failure::not_found)?;
    if let Some(full_name) = input.full_name {
        user.full_name = full_name;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(phone_number) = input.phone_number {
        user.phone_number = phone_number;
    }
    if let Some(role_id) = input.role_id {
        user.role_id = role_id;
    }
    if let Some(is_active) = input.is_active {
        user.is_active = is_active;
    }
    Ok((StatusCode::OK, Json(json!({ "data": user }))))
}

async fn delete_user(State(db): State<Db>, headers: HeaderMap, Path(id): Path<String>) -> Reply {
    let mut store = db.write().await;
    let caller = authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    if id == caller {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "cannot delete yourself"));
    }
    store.users.remove(&id).ok_or_else(Failure::not_found)?;
    store.tokens.retain(|_, owner| *owner != id);
    Ok((StatusCode::OK, Json(json!({ "message": "deleted" }))))
}

async fn toggle_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ToggleUser>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    let user = store.users.get_mut(&id).ok_or_else(Failure::not_found)?;
    user.is_active = input.is_active;
    Ok((StatusCode::OK, Json(json!({ "data": user }))))
}

// --- categories ---

async fn list_categories(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    authorize(&store, &headers)?;
    let categories: Vec<Category> = store
        .categories
        .values()
        .map(|category| store.category_view(category))
        .collect();
    Ok((StatusCode::OK, Json(json!({ "categories": categories }))))
}

async fn create_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CategoryInput>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    if input.name.trim().is_empty() {
        return Err(Failure::new(StatusCode::BAD_REQUEST, "name is required").with_field("error"));
    }
    if store.categories.values().any(|c| c.name == input.name) {
        return Err(Failure::new(StatusCode::CONFLICT, "category already exists").with_field("mes"));
    }
    let id = store.allocate_id();
    let category = Category {
        id,
        name: input.name,
        description: input.description,
        item_count: 0,
    };
    store.categories.insert(id, category.clone());
    Ok((StatusCode::CREATED, Json(json!({ "message": "created", "data": category }))))
}

async fn update_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    let category = store.categories.get_mut(&id).ok_or_else(Failure::not_found)?;
    category.name = input.name;
    category.description = input.description;
    let category = category.clone();
    Ok((StatusCode::OK, Json(json!({ "data": store.category_view(&category) }))))
}

async fn delete_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    store.categories.remove(&id).ok_or_else(Failure::not_found)?;
    Ok(StatusCode::NO_CONTENT)
}

// --- services ---

async fn list_services(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let store = db.read().await;
    authorize(&store, &headers)?;
    let services: Vec<&Service> = store.services.values().collect();
    Ok((StatusCode::OK, Json(json!(services))))
}

fn service_category(store: &Store, input: &ServiceInput) -> Result<Option<u64>, Failure> {
    let Some(raw) = input.category_id.as_ref().filter(|raw| !raw.is_null()) else {
        return Ok(None);
    };
    match id_from_value(raw) {
        Some(id) if store.categories.contains_key(&id) => Ok(Some(id)),
        _ => Err(Failure::new(StatusCode::BAD_REQUEST, "unknown category").with_field("error")),
    }
}

async fn create_service(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ServiceInput>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let category_id = service_category(&store, &input)?;
    let id = store.allocate_id();
    let service = Service {
        id,
        name: input.name,
        description: input.description,
        duration: input.duration,
        price: input.price,
        category_id,
        is_active: input.is_active,
    };
    store.services.insert(id, service.clone());
    Ok((StatusCode::CREATED, Json(json!({ "data": service }))))
}

async fn update_service(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<ServiceInput>,
) -> Reply {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    let category_id = service_category(&store, &input)?;
    let service = store.services.get_mut(&id).ok_or_else(Failure::not_found)?;
    service.name = input.name;
    service.description = input.description;
    service.duration = input.duration;
    service.price = input.price;
    service.category_id = category_id;
    service.is_active = input.is_active;
    Ok((StatusCode::OK, Json(json!({ "data": service }))))
}

async fn delete_service(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    authorize(&store, &headers)?;
    let id = parse_id(&id)?;
    store.services.remove(&id).ok_or_else(Failure::not_found)?;
    Ok(StatusCode::NO_CONTENT)
}
