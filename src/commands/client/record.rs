use axum::{extract::State as AxumState, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::db::DbPool;
use crate::error::{TrackdeskError, TrackdeskResult};
use crate::state::AppState;

use super::refs::{validate_ref_group, MAX_SUB_REFS};
use super::status::{stamp_transition, RecordStatus, StatusStamps};
use super::utils::{
    is_country_code, is_month_code, is_valid_email, parse_date_safe, SIM_CODES, SIM_PROVIDERS,
    SOLD_BY_CHANNELS,
};

/// Admin form payload. The Sage references arrive decomposed into their
/// five sub-fields per group; the stored composites never cross the wire
/// inbound.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInput {
    pub id: Option<i64>,
    pub added: String,
    pub email: String,
    pub sage_details: String,
    pub tracker_imei: String,
    pub tracker_model: String,
    pub tracker_activation_date: Option<String>,
    pub tracker_expire_date: Option<String>,
    pub tracker_status: String,
    pub tracker_status_note: Option<String>,
    pub sim_number: String,
    pub sim_activation_date: Option<String>,
    pub sim_expire_date: Option<String>,
    pub sim_provider: String,
    pub sim_code: String,
    pub status: String,
    pub sim_status_note: Option<String>,
    pub expire_date: String,
    pub sim_exp_date: String,
    pub country: String,
    pub sold_by: String,
    pub description: Option<String>,
    #[serde(default)]
    pub inv_ref_1: String,
    #[serde(default)]
    pub inv_ref_2: String,
    #[serde(default)]
    pub inv_ref_3: String,
    #[serde(default)]
    pub inv_ref_4: String,
    #[serde(default)]
    pub inv_ref_5: String,
    #[serde(default)]
    pub rcp_ref_1: String,
    #[serde(default)]
    pub rcp_ref_2: String,
    #[serde(default)]
    pub rcp_ref_3: String,
    #[serde(default)]
    pub rcp_ref_4: String,
    #[serde(default)]
    pub rcp_ref_5: String,
}

impl ClientInput {
    pub fn inv_refs(&self) -> [String; MAX_SUB_REFS] {
        [
            self.inv_ref_1.clone(),
            self.inv_ref_2.clone(),
            self.inv_ref_3.clone(),
            self.inv_ref_4.clone(),
            self.inv_ref_5.clone(),
        ]
    }

    pub fn rcp_refs(&self) -> [String; MAX_SUB_REFS] {
        [
            self.rcp_ref_1.clone(),
            self.rcp_ref_2.clone(),
            self.rcp_ref_3.clone(),
            self.rcp_ref_4.clone(),
            self.rcp_ref_5.clone(),
        ]
    }
}

/// Input after validation: dates parsed, statuses typed, references
/// encoded back into their stored composites.
pub struct ValidatedClient {
    pub added: NaiveDate,
    pub tracker_activation_date: Option<NaiveDate>,
    pub tracker_expire_date: Option<NaiveDate>,
    pub sim_activation_date: Option<NaiveDate>,
    pub sim_expire_date: Option<NaiveDate>,
    pub tracker_status: RecordStatus,
    pub status: RecordStatus,
    pub sage_invoice_reference: String,
    pub sage_payment_reference: String,
}

fn require_text(label: &str, value: &str) -> TrackdeskResult<()> {
    if value.trim().is_empty() {
        return Err(TrackdeskError::Validation(format!("{} is required", label)));
    }
    Ok(())
}

fn require_choice(label: &str, value: &str, choices: &[&str]) -> TrackdeskResult<()> {
    if !choices.contains(&value) {
        return Err(TrackdeskError::Validation(format!(
            "{} must be one of: {}",
            label,
            choices.join(", ")
        )));
    }
    Ok(())
}

fn parse_required_date(label: &str, value: &str) -> TrackdeskResult<NaiveDate> {
    parse_date_safe(value)
        .ok_or_else(|| TrackdeskError::Validation(format!("{} must be a valid date", label)))
}

fn parse_optional_date(label: &str, value: &Option<String>) -> TrackdeskResult<Option<NaiveDate>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_date_safe(v)
            .map(Some)
            .ok_or_else(|| TrackdeskError::Validation(format!("{} must be a valid date", label))),
    }
}

fn parse_status(label: &str, value: &str) -> TrackdeskResult<RecordStatus> {
    RecordStatus::parse(value).ok_or_else(|| {
        TrackdeskError::Validation(format!("{} must be ACTIVE or SUSPENDED", label))
    })
}

/// All form-level checks. Nothing is written before this passes.
pub fn validate_input(input: &ClientInput) -> TrackdeskResult<ValidatedClient> {
    require_text("EMAIL", &input.email)?;
    if !is_valid_email(input.email.trim()) {
        return Err(TrackdeskError::Validation(
            "EMAIL must be a valid email address".to_string(),
        ));
    }
    require_text("SAGE DETAILS", &input.sage_details)?;
    require_text("TRACKER IMEI", &input.tracker_imei)?;
    require_text("TRACKER MODEL", &input.tracker_model)?;
    require_text("SIM NUMBER", &input.sim_number)?;

    require_choice("SIM PROVIDER", &input.sim_provider, SIM_PROVIDERS)?;
    require_choice("SIM CODE", &input.sim_code, SIM_CODES)?;
    require_choice("SOLD BY", &input.sold_by, SOLD_BY_CHANNELS)?;

    if !is_month_code(&input.expire_date) {
        return Err(TrackdeskError::Validation(
            "EXPIRE DATE must look like 'EXP JAN 24'".to_string(),
        ));
    }
    if !is_month_code(&input.sim_exp_date) {
        return Err(TrackdeskError::Validation(
            "SIM EXP DATE must look like 'EXP JAN 24'".to_string(),
        ));
    }
    if !is_country_code(&input.country) {
        return Err(TrackdeskError::Validation(
            "COUNTRY must be a two-letter ISO code".to_string(),
        ));
    }

    Ok(ValidatedClient {
        added: parse_required_date("ADDED", &input.added)?,
        tracker_activation_date: parse_optional_date(
            "TRACKER ACTIVATION DATE",
            &input.tracker_activation_date,
        )?,
        tracker_expire_date: parse_optional_date(
            "TRACKER EXPIRE DATE",
            &input.tracker_expire_date,
        )?,
        sim_activation_date: parse_optional_date(
            "SIM ACTIVATION DATE",
            &input.sim_activation_date,
        )?,
        sim_expire_date: parse_optional_date("SIM EXPIRE", &input.sim_expire_date)?,
        tracker_status: parse_status("TRACKER STATUS", &input.tracker_status)?,
        status: parse_status("STATUS", &input.status)?,
        sage_invoice_reference: validate_ref_group("INV REF", &input.inv_refs())?,
        sage_payment_reference: validate_ref_group("RCP REF", &input.rcp_refs())?,
    })
}

async fn ensure_unique(
    conn: &mut PgConnection,
    column: &str,
    label: &str,
    value: &str,
    exclude_id: Option<i64>,
) -> TrackdeskResult<()> {
    let sql = format!(
        "SELECT COUNT(*) FROM clients WHERE {} = $1 AND ($2::BIGINT IS NULL OR id <> $2)",
        column
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(value)
        .bind(exclude_id)
        .fetch_one(conn)
        .await?;
    if count > 0 {
        return Err(TrackdeskError::Validation(format!(
            "A record with this {} already exists",
            label
        )));
    }
    Ok(())
}

async fn ensure_unique_identifiers(
    conn: &mut PgConnection,
    input: &ClientInput,
    exclude_id: Option<i64>,
) -> TrackdeskResult<()> {
    ensure_unique(conn, "email", "EMAIL", input.email.trim(), exclude_id).await?;
    ensure_unique(
        conn,
        "sim_number",
        "SIM NUMBER",
        input.sim_number.trim(),
        exclude_id,
    )
    .await?;
    ensure_unique(
        conn,
        "tracker_imei",
        "TRACKER IMEI",
        input.tracker_imei.trim(),
        exclude_id,
    )
    .await
}

pub async fn create_client_internal(pool: &DbPool, input: &ClientInput) -> TrackdeskResult<i64> {
    let validated = validate_input(input)?;

    let mut tx = pool.begin().await?;
    ensure_unique_identifiers(&mut tx, input, None).await?;

    let stamps = stamp_transition(None, validated.status, Utc::now());

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO clients (
            added, email, sage_details, sage_invoice_reference, sage_payment_reference,
            tracker_imei, tracker_model, tracker_activation_date, tracker_expire_date,
            tracker_status, tracker_status_note, sim_number, sim_activation_date,
            sim_expire_date, sim_provider, sim_code, status, sim_status_note,
            expire_date, sim_exp_date, country, sold_by, description,
            activated_at, suspended_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
            $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
        ) RETURNING id",
    )
    .bind(validated.added)
    .bind(input.email.trim())
    .bind(input.sage_details.trim())
    .bind(&validated.sage_invoice_reference)
    .bind(&validated.sage_payment_reference)
    .bind(input.tracker_imei.trim())
    .bind(input.tracker_model.trim())
    .bind(validated.tracker_activation_date)
    .bind(validated.tracker_expire_date)
    .bind(validated.tracker_status.as_str())
    .bind(&input.tracker_status_note)
    .bind(input.sim_number.trim())
    .bind(validated.sim_activation_date)
    .bind(validated.sim_expire_date)
    .bind(&input.sim_provider)
    .bind(&input.sim_code)
    .bind(validated.status.as_str())
    .bind(&input.sim_status_note)
    .bind(&input.expire_date)
    .bind(&input.sim_exp_date)
    .bind(&input.country)
    .bind(&input.sold_by)
    .bind(&input.description)
    .bind(stamps.activated_at)
    .bind(stamps.suspended_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(id)
}

pub async fn update_client_internal(pool: &DbPool, input: &ClientInput) -> TrackdeskResult<()> {
    let id = input
        .id
        .ok_or_else(|| TrackdeskError::Validation("Record id is required".to_string()))?;
    let validated = validate_input(input)?;

    let mut tx = pool.begin().await?;

    // Previous status is read inside the write transaction. A vanished row
    // surfaces as RowNotFound and aborts the save.
    let previous: String = sqlx::query_scalar("SELECT status FROM clients WHERE id = $1")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let previous = RecordStatus::parse(&previous).ok_or_else(|| {
        TrackdeskError::Internal(format!("Stored status '{}' is not recognised", previous))
    })?;

    ensure_unique_identifiers(&mut tx, input, Some(id)).await?;

    let stamps = stamp_transition(Some(previous), validated.status, Utc::now());

    let base = "UPDATE clients SET
            added = $1, email = $2, sage_details = $3, sage_invoice_reference = $4,
            sage_payment_reference = $5, tracker_imei = $6, tracker_model = $7,
            tracker_activation_date = $8, tracker_expire_date = $9, tracker_status = $10,
            tracker_status_note = $11, sim_number = $12, sim_activation_date = $13,
            sim_expire_date = $14, sim_provider = $15, sim_code = $16, status = $17,
            sim_status_note = $18, expire_date = $19, sim_exp_date = $20, country = $21,
            sold_by = $22, description = $23";

    let sql = match stamps {
        StatusStamps {
            activated_at: Some(_),
            ..
        } => format!(
            "{}, activated_at = $24, suspended_at = NULL WHERE id = $25",
            base
        ),
        StatusStamps {
            suspended_at: Some(_),
            ..
        } => format!("{}, suspended_at = $24 WHERE id = $25", base),
        _ => format!("{} WHERE id = $24", base),
    };

    let mut query = sqlx::query(&sql)
        .bind(validated.added)
        .bind(input.email.trim())
        .bind(input.sage_details.trim())
        .bind(&validated.sage_invoice_reference)
        .bind(&validated.sage_payment_reference)
        .bind(input.tracker_imei.trim())
        .bind(input.tracker_model.trim())
        .bind(validated.tracker_activation_date)
        .bind(validated.tracker_expire_date)
        .bind(validated.tracker_status.as_str())
        .bind(&input.tracker_status_note)
        .bind(input.sim_number.trim())
        .bind(validated.sim_activation_date)
        .bind(validated.sim_expire_date)
        .bind(&input.sim_provider)
        .bind(&input.sim_code)
        .bind(validated.status.as_str())
        .bind(&input.sim_status_note)
        .bind(&input.expire_date)
        .bind(&input.sim_exp_date)
        .bind(&input.country)
        .bind(&input.sold_by)
        .bind(&input.description);

    if let Some(ts) = stamps.activated_at {
        query = query.bind(ts).bind(id);
    } else if let Some(ts) = stamps.suspended_at {
        query = query.bind(ts).bind(id);
    } else {
        query = query.bind(id);
    }

    query.execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_client_internal(pool: &DbPool, id: i64) -> TrackdeskResult<()> {
    sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct DeleteClientInput {
    pub id: i64,
}

pub async fn create_client(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ClientInput>,
) -> TrackdeskResult<Json<serde_json::Value>> {
    let id = create_client_internal(&state.pool, &input).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn update_client(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<ClientInput>,
) -> TrackdeskResult<Json<()>> {
    update_client_internal(&state.pool, &input).await?;
    Ok(Json(()))
}

pub async fn delete_client(
    AxumState(state): AxumState<AppState>,
    Json(input): Json<DeleteClientInput>,
) -> TrackdeskResult<Json<()>> {
    delete_client_internal(&state.pool, input.id).await?;
    Ok(Json(()))
}
