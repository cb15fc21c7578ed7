// JSON API of the stub EaaS application

use super::state::{AppState, PLANS, RegisterError};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

type Shared = State<Arc<AppState>>;

/// Error body: `{ "message": ... }` with a status code
pub struct ApiError(StatusCode, String);

impl ApiError {
    fn unauthorized() -> Self {
        ApiError(StatusCode::UNAUTHORIZED, "Please log in again".into())
    }

    fn not_found(what: &str) -> Self {
        ApiError(StatusCode::NOT_FOUND, format!("{what} not found"))
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError(StatusCode::BAD_REQUEST, message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "message": self.1 }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorize(state: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    bearer(headers)
        .and_then(|token| state.session(token))
        .ok_or_else(ApiError::unauthorized)
}

#[derive(Deserialize)]
pub struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn login(State(state): Shared, Json(body): Json<LoginBody>) -> ApiResult<Json<Value>> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::invalid("Email and password are required"));
    }
    let (token, user) = state
        .login(body.email.trim(), &body.password)
        .ok_or_else(|| ApiError(StatusCode::UNAUTHORIZED, "Invalid email or password".into()))?;
    Ok(Json(json!({ "token": token, "user": user })))
}

#[derive(Deserialize)]
pub struct RegisterBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    address: String,
}

pub async fn register(
    State(state): Shared,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    match state.register(
        &body.name,
        body.email.trim(),
        &body.phone,
        &body.password,
        &body.address,
    ) {
        Ok((token, user)) => Ok((
            StatusCode::CREATED,
            Json(json!({ "token": token, "user": user })),
        )),
        Err(RegisterError::Duplicate) => Err(ApiError(
            StatusCode::CONFLICT,
            "Email already registered".into(),
        )),
        Err(RegisterError::Invalid(message)) => Err(ApiError::invalid(message)),
    }
}

pub async fn logout(State(state): Shared, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer(&headers) {
        state.logout(token);
    }
    StatusCode::NO_CONTENT
}

pub async fn me(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    let user = state.user(&email).ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(json!(user)))
}

#[derive(Deserialize)]
pub struct ProfileBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    address: String,
}

fn valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit())
}

pub async fn update_me(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<ProfileBody>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    if body.name.trim().is_empty() {
        return Err(ApiError::invalid("Name is required"));
    }
    if !valid_phone(&body.phone) {
        return Err(ApiError::invalid("Invalid phone number: enter 10 digits"));
    }
    let user = state
        .update_user(&email, &body.name, &body.phone, &body.address)
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok(Json(json!(user)))
}

/// Readings drift with wall-clock time so live tiles change between polls.
pub async fn metrics(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    authorize(&state, &headers)?;
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let wobble = secs % 37;
    Ok(Json(json!({
        "livePowerW": 1200 + wobble * 13,
        "consumptionKwh": 14.2 + (secs % 11) as f64 / 10.0,
        "solarKwh": 9.8 + (secs % 7) as f64 / 10.0,
        "savings": 312 + wobble,
    })))
}

pub async fn notifications(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    Ok(Json(json!(state.notifications(&email))))
}

pub async fn mark_all_read(State(state): Shared, headers: HeaderMap) -> ApiResult<StatusCode> {
    let email = authorize(&state, &headers)?;
    state.mark_all_read(&email);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bills(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    Ok(Json(json!(state.bills(&email))))
}

pub async fn bill(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    let bill = state
        .bill(&email, &id)
        .ok_or_else(|| ApiError::not_found("Bill"))?;
    Ok(Json(json!(bill)))
}

pub async fn pay_bill(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    let bill = state
        .pay_bill(&email, &id)
        .ok_or_else(|| ApiError::not_found("Bill"))?;
    Ok(Json(json!(bill)))
}

#[derive(Deserialize)]
pub struct InvoiceQuery {
    token: Option<String>,
}

/// Invoices are fetched by plain links, so the token rides in the query.
pub async fn invoice(
    State(state): Shared,
    Path(id): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Response> {
    let email = query
        .token
        .as_deref()
        .and_then(|token| state.session(token))
        .ok_or_else(ApiError::unauthorized)?;
    let bill = state
        .bill(&email, &id)
        .ok_or_else(|| ApiError::not_found("Bill"))?;

    let body = format!(
        "%PDF-1.4\n% EaaS invoice {}\n% Period: {}\n% Units: {} kWh\n% Amount: INR {}\n%%EOF\n",
        bill.id, bill.period, bill.units_kwh, bill.amount
    );
    let disposition = format!("attachment; filename=\"invoice-{}.pdf\"", bill.id);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn plans() -> Json<Value> {
    Json(json!(PLANS))
}

pub async fn subscription(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    Ok(Json(json!({ "plan": state.subscription(&email) })))
}

#[derive(Deserialize)]
pub struct SubscribeBody {
    #[serde(rename = "planId")]
    plan_id: String,
}

pub async fn subscribe(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<SubscribeBody>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    let plan = state
        .subscribe(&email, &body.plan_id)
        .ok_or_else(|| ApiError::not_found("Plan"))?;
    Ok(Json(json!({ "plan": plan })))
}

pub async fn cancel_subscription(
    State(state): Shared,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let email = authorize(&state, &headers)?;
    state.cancel_subscription(&email);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn tickets(State(state): Shared, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    Ok(Json(json!(state.tickets(&email))))
}

#[derive(Deserialize)]
pub struct TicketBody {
    #[serde(default)]
    subject: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    description: String,
}

pub async fn create_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<TicketBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let email = authorize(&state, &headers)?;
    if body.subject.trim().is_empty() {
        return Err(ApiError::invalid("Subject is required"));
    }
    if body.description.trim().is_empty() {
        return Err(ApiError::invalid("Description is required"));
    }
    let ticket = state
        .create_ticket(
            &email,
            &body.subject,
            &body.category,
            &body.priority,
            &body.description,
        )
        .ok_or_else(|| ApiError::not_found("User"))?;
    Ok((StatusCode::CREATED, Json(json!(ticket))))
}

pub async fn ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    let ticket = state
        .ticket(&email, id)
        .ok_or_else(|| ApiError::not_found("Ticket"))?;
    Ok(Json(json!(ticket)))
}

#[derive(Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    comment: String,
}

pub async fn comment(
    State(state): Shared,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<CommentBody>,
) -> ApiResult<Json<Value>> {
    let email = authorize(&state, &headers)?;
    if body.comment.trim().is_empty() {
        return Err(ApiError::invalid("Comment is required"));
    }
    let ticket = state
        .comment(&email, id, &body.comment)
        .ok_or_else(|| ApiError::not_found("Ticket"))?;
    Ok(Json(json!(ticket)))
}

#[derive(Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    message: String,
}

pub async fn chat(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> ApiResult<Json<Value>> {
    authorize(&state, &headers)?;
    Ok(Json(json!({ "reply": advisor_reply(&body.message) })))
}

fn advisor_reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    if message.contains("bill") || message.contains("cost") {
        "Your last bill covered 312 kWh. Moving laundry and dishwashing into \
         daytime solar hours could lower next month's bill by about 12%."
    } else if message.contains("solar") || message.contains("panel") {
        "Your solar panels produced 18 kWh yesterday, covering roughly 60% of \
         your household consumption."
    } else if message.contains("plan") || message.contains("upgrade") {
        "With your current usage, the Solar Plus plan would add battery backup \
         and raise expected savings to about ₹450 per month."
    } else {
        "Your energy usage peaks between 7 and 10 pm. Shifting part of that \
         consumption to solar hours is the quickest way to increase savings."
    }
}

