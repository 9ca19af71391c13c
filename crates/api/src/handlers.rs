//! HTTP API handlers
//!
//! Request handlers for authorization, availability, directory, and
//! scheduling endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use openslot_domain::{DaySlots, Horizon, MeetingLink, OpenSlotError};
use openslot_infra::integrations::google::oauth::extract_email_from_id_token;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::context::AppContext;
use crate::error::ApiResult;

// ============================================================================
// Request/Response types
// ============================================================================

/// JSON envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Successful envelope carrying a payload.
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self { error: false, message: message.into(), data: Some(data) }
    }
}

impl ApiEnvelope<()> {
    /// Successful envelope without a payload.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self { error: false, message: message.into(), data: None }
    }

    /// Failure envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self { error: true, message: message.into(), data: None }
    }
}

/// OAuth redirect query parameters.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

/// Availability query parameters.
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub email: String,
}

/// One free slot on the wire, with both structured and label forms.
#[derive(Debug, Serialize)]
pub struct SlotDto {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub label: String,
}

/// Free slots for one day on the wire.
#[derive(Debug, Serialize)]
pub struct DaySlotsDto {
    pub date: NaiveDate,
    pub slots: Vec<SlotDto>,
}

impl From<DaySlots> for DaySlotsDto {
    fn from(day: DaySlots) -> Self {
        Self {
            date: day.date,
            slots: day
                .slots
                .into_iter()
                .map(|slot| SlotDto { start: slot.start, end: slot.end, label: slot.label() })
                .collect(),
        }
    }
}

/// Group membership request payload.
#[derive(Debug, Deserialize)]
pub struct AddUserToGroupRequest {
    pub user_email: String,
    pub group_name: String,
}

/// Meeting scheduling request payload.
#[derive(Debug, Deserialize)]
pub struct ScheduleMeetingRequest {
    pub user_email: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

// ============================================================================
// Handler functions
// ============================================================================

/// Heartbeat endpoint.
pub async fn ping() -> &'static str {
    "ok"
}

/// Initiate user authorization: respond with the Google authorization URL.
pub async fn add_user(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<ApiEnvelope<String>>> {
    let state = Uuid::new_v4().to_string();
    let url = ctx.oauth.authorization_url(&state)?;
    ctx.register_oauth_state(state);

    Ok(Json(ApiEnvelope::success("Click the link to authorize the app", url)))
}

/// Handle the OAuth2 redirect: exchange the code and persist the credential.
///
/// The authorizing user is identified by the email claim of the ID token
/// returned alongside the access token.
pub async fn oauth_callback(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<OAuthCallbackParams>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    let code = params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OpenSlotError::InvalidInput("no code in request".to_string()))?;

    let state = params.state.unwrap_or_default();
    if !ctx.take_oauth_state(&state) {
        return Err(OpenSlotError::Auth("unknown or expired OAuth state".to_string()).into());
    }

    let tokens = ctx.oauth.exchange_code(&code).await?;
    let id_token = tokens.id_token.as_deref().ok_or_else(|| {
        OpenSlotError::Auth("authorization response carried no ID token".to_string())
    })?;
    let email = extract_email_from_id_token(id_token)?;

    ctx.tokens.put(&email, &tokens).await?;
    info!(user_email = %email, "user authorized calendar access");

    Ok(Json(ApiEnvelope::message_only("Authorization successful")))
}

/// Report the user's free slots over the configured lookahead.
pub async fn check_availability(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<AvailabilityParams>,
) -> ApiResult<Json<ApiEnvelope<Vec<DaySlotsDto>>>> {
    let horizon = Horizon::next_days(Utc::now(), ctx.config.availability.horizon_days);

    ctx.ensure_fresh_token(&params.email).await?;
    let days = ctx.availability.check_availability(&params.email, &horizon).await?;

    let data = days.into_iter().map(DaySlotsDto::from).collect();
    Ok(Json(ApiEnvelope::success("Availability data", data)))
}

/// Add a user to a group, creating either as needed.
pub async fn add_user_to_group(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<AddUserToGroupRequest>,
) -> ApiResult<Json<ApiEnvelope<()>>> {
    ctx.directory.add_user_to_group(&req.user_email, &req.group_name).await?;

    let message =
        format!("User {} added to group {}", req.user_email.trim(), req.group_name.trim());
    Ok(Json(ApiEnvelope::message_only(message)))
}

/// List all registered users.
pub async fn list_users(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<ApiEnvelope<Vec<String>>>> {
    let users = ctx.directory.list_users().await?;
    Ok(Json(ApiEnvelope::success("List of users", users)))
}

/// List all groups.
pub async fn list_groups(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<ApiEnvelope<Vec<String>>>> {
    let groups = ctx.directory.list_groups().await?;
    Ok(Json(ApiEnvelope::success("List of groups", groups)))
}

/// Issue a meeting link for the requested slot.
pub async fn schedule_meeting(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<ScheduleMeetingRequest>,
) -> ApiResult<Json<ApiEnvelope<MeetingLink>>> {
    let link = ctx.scheduler.schedule(req.start, req.end)?;
    info!(user_email = %req.user_email, url = %link.url, "meeting link issued");

    Ok(Json(ApiEnvelope::success("Meeting scheduled", link)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_serializes_payload() {
        let envelope = ApiEnvelope::success("Availability data", vec!["09:00 to 17:00"]);
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["error"], false);
        assert_eq!(json["message"], "Availability data");
        assert_eq!(json["data"][0], "09:00 to 17:00");
    }

    #[test]
    fn failure_envelope_omits_data() {
        let envelope = ApiEnvelope::<()>::failure("Not found: nobody home");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["error"], true);
        assert!(json.get("data").is_none());
    }
}
