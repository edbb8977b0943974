use axum::{
	Json, Router,
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::{StatusCode, header},
	response::IntoResponse,
	routing::{get, post, put},
};
use tower_cookies::{CookieManagerLayer, Cookies};

use crate::{
	auth::{self, AdminUser, CurrentUser},
	error::ApiError,
	state::AppState,
};
use crm_service::{
	AddUserRequest, CallLogView, DeleteAllRequest, DeleteLeadsRequest, DeleteLeadsResponse,
	ImportCsvRequest, ImportReport, ImportUrlRequest, LeadFilters, LeadView, ListLeadsRequest,
	ListLeadsResponse, LoginRequest, LoginResponse, MarkDoneRequest, MarkDoneResponse,
	MasterResetRequest, PendingReminderView, PendingRemindersRequest, PitchRequest, PitchView,
	RecordOutcomeRequest, RecordOutcomeResponse, ReportRequest, ReportResponse, SetActiveRequest,
	UserView, WipeReport,
};

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/auth/login", post(login))
		.route("/v1/auth/logout", post(logout))
		.route("/v1/auth/me", get(me))
		.route("/v1/auth/reset_admin_password", post(reset_admin_password))
		.route("/v1/leads", get(list_leads))
		.route("/v1/leads/filters", get(lead_filters))
		.route("/v1/leads/export", get(export_leads))
		.route("/v1/leads/{id}", get(lead_summary))
		.route("/v1/leads/{id}/calls", get(call_history))
		.route("/v1/leads/{id}/outcome", post(record_outcome))
		.route("/v1/reminders", get(pending_reminders))
		.route("/v1/reminders/{id}/done", post(mark_reminder_done))
		.route("/v1/reports", get(report))
		.route("/v1/pitches", get(list_pitches).post(create_pitch))
		.route("/v1/pitches/mine", get(my_pitches))
		.route("/v1/pitches/{id}", put(update_pitch).delete(delete_pitch))
		.route("/v1/admin/leads/import", post(import_csv))
		.route("/v1/admin/leads/import_url", post(import_url))
		.route("/v1/admin/leads/delete", post(delete_leads))
		.route("/v1/admin/users", get(list_users).post(add_user))
		.route("/v1/admin/users/{id}/active", post(set_user_active))
		.route("/v1/admin/delete_all", post(delete_all))
		.route("/v1/admin/master_reset", post(master_reset))
		.layer(CookieManagerLayer::new())
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn login(
	State(state): State<AppState>,
	cookies: Cookies,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
	let Json(req) = payload?;
	let response = state.service.login(req).await?;

	cookies.add(auth::session_cookie(&state.service.cfg.security, response.session_id));

	Ok(Json(response))
}

async fn logout(State(state): State<AppState>, cookies: Cookies) -> ApiResult<StatusCode> {
	if let Some(session_id) = auth::session_id(&cookies) {
		state.service.logout(session_id).await?;
	}

	cookies.remove(auth::expired_session_cookie());

	Ok(StatusCode::NO_CONTENT)
}

async fn me(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<UserView>> {
	Ok(Json(state.service.current_user(&actor).await?))
}

async fn reset_admin_password(
	State(state): State<AppState>,
	payload: Result<Json<MasterResetRequest>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
	let Json(req) = payload?;

	Ok(Json(state.service.reset_admin_password(&req.master_key).await?))
}

async fn list_leads(
	State(state): State<AppState>,
	_: CurrentUser,
	query: Result<Query<ListLeadsRequest>, QueryRejection>,
) -> ApiResult<Json<ListLeadsResponse>> {
	let Query(req) = query?;

	Ok(Json(state.service.list_leads(req).await?))
}

async fn lead_filters(
	State(state): State<AppState>,
	_: CurrentUser,
) -> ApiResult<Json<LeadFilters>> {
	Ok(Json(state.service.lead_filters().await?))
}

async fn export_leads(
	State(state): State<AppState>,
	_: CurrentUser,
) -> ApiResult<impl IntoResponse> {
	let csv = state.service.export_leads_csv().await?;

	Ok((
		[
			(header::CONTENT_TYPE, "text/csv; charset=utf-8"),
			(header::CONTENT_DISPOSITION, "attachment; filename=\"leads.csv\""),
		],
		csv,
	))
}

async fn lead_summary(
	State(state): State<AppState>,
	_: CurrentUser,
	id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<LeadView>> {
	let Path(lead_id) = id?;

	Ok(Json(state.service.lead_summary(lead_id).await?))
}

async fn call_history(
	State(state): State<AppState>,
	_: CurrentUser,
	id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<CallLogView>>> {
	let Path(lead_id) = id?;

	Ok(Json(state.service.call_history(lead_id).await?))
}

async fn record_outcome(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	id: Result<Path<i64>, PathRejection>,
	payload: Result<Json<RecordOutcomeRequest>, JsonRejection>,
) -> ApiResult<Json<RecordOutcomeResponse>> {
	let Path(lead_id) = id?;
	let Json(mut req) = payload?;

	req.lead_id = lead_id;

	Ok(Json(state.service.record_outcome(&actor, req).await?))
}

async fn pending_reminders(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	query: Result<Query<PendingRemindersRequest>, QueryRejection>,
) -> ApiResult<Json<Vec<PendingReminderView>>> {
	let Query(req) = query?;

	Ok(Json(state.service.pending_reminders(&actor, req).await?))
}

async fn mark_reminder_done(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	id: Result<Path<i64>, PathRejection>,
	payload: Result<Json<MarkDoneRequest>, JsonRejection>,
) -> ApiResult<Json<MarkDoneResponse>> {
	let Path(reminder_id) = id?;
	let Json(req) = payload?;

	Ok(Json(state.service.mark_reminder_done(&actor, reminder_id, req).await?))
}

async fn report(
	State(state): State<AppState>,
	_: CurrentUser,
	query: Result<Query<ReportRequest>, QueryRejection>,
) -> ApiResult<Json<ReportResponse>> {
	let Query(req) = query?;

	Ok(Json(state.service.report(req).await?))
}

async fn list_pitches(
	State(state): State<AppState>,
	_: CurrentUser,
) -> ApiResult<Json<Vec<PitchView>>> {
	Ok(Json(state.service.list_pitches().await?))
}

async fn my_pitches(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
) -> ApiResult<Json<Vec<PitchView>>> {
	Ok(Json(state.service.my_pitches(&actor).await?))
}

async fn create_pitch(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	payload: Result<Json<PitchRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PitchView>)> {
	let Json(req) = payload?;
	let pitch = state.service.create_pitch(&actor, req).await?;

	Ok((StatusCode::CREATED, Json(pitch)))
}

async fn update_pitch(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	id: Result<Path<i64>, PathRejection>,
	payload: Result<Json<PitchRequest>, JsonRejection>,
) -> ApiResult<Json<PitchView>> {
	let Path(template_id) = id?;
	let Json(req) = payload?;

	Ok(Json(state.service.update_pitch(&actor, template_id, req).await?))
}

async fn delete_pitch(
	State(state): State<AppState>,
	CurrentUser(actor): CurrentUser,
	id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
	let Path(template_id) = id?;

	state.service.delete_pitch(&actor, template_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn import_csv(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	payload: Result<Json<ImportCsvRequest>, JsonRejection>,
) -> ApiResult<Json<ImportReport>> {
	let Json(req) = payload?;

	Ok(Json(state.service.import_csv(&actor, req).await?))
}

async fn import_url(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	payload: Result<Json<ImportUrlRequest>, JsonRejection>,
) -> ApiResult<Json<ImportReport>> {
	let Json(req) = payload?;

	Ok(Json(state.service.import_from_url(&actor, req).await?))
}

async fn delete_leads(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	payload: Result<Json<DeleteLeadsRequest>, JsonRejection>,
) -> ApiResult<Json<DeleteLeadsResponse>> {
	let Json(req) = payload?;

	Ok(Json(state.service.delete_leads(&actor, req).await?))
}

async fn list_users(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
) -> ApiResult<Json<Vec<UserView>>> {
	Ok(Json(state.service.list_users(&actor).await?))
}

async fn add_user(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	payload: Result<Json<AddUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
	let Json(req) = payload?;
	let user = state.service.add_user(&actor, req).await?;

	Ok((StatusCode::CREATED, Json(user)))
}

async fn set_user_active(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	id: Result<Path<i64>, PathRejection>,
	payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
	let Path(user_id) = id?;
	let Json(req) = payload?;

	Ok(Json(state.service.set_user_active(&actor, user_id, req).await?))
}

async fn delete_all(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	payload: Result<Json<DeleteAllRequest>, JsonRejection>,
) -> ApiResult<Json<WipeReport>> {
	let Json(req) = payload?;

	Ok(Json(state.service.delete_all_data(&actor, req).await?))
}

async fn master_reset(
	State(state): State<AppState>,
	AdminUser(actor): AdminUser,
	cookies: Cookies,
	payload: Result<Json<MasterResetRequest>, JsonRejection>,
) -> ApiResult<Json<WipeReport>> {
	let Json(req) = payload?;
	let report = state.service.master_reset(&actor, req).await?;

	cookies.remove(auth::expired_session_cookie());

	Ok(Json(report))
}
