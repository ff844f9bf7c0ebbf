use axum::{
    extract::{Query, State as AxumState},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::{ClientRecord, DbPool};
use crate::error::TrackdeskResult;
use crate::state::AppState;

use super::fields::LIST_COLUMNS;
use super::refs::{decode_refs, MAX_SUB_REFS};

/// Text columns covered by the substring search box.
const SEARCH_COLUMNS: &[&str] = &[
    "email",
    "sage_details",
    "tracker_imei",
    "expire_date",
    "sim_number",
    "sim_exp_date",
    "tracker_model",
    "sim_provider",
    "tracker_status",
    "status",
    "sold_by",
    "sage_invoice_reference",
    "sage_payment_reference",
];

/// List-view parameters: one substring search plus exact-match filters
/// over the fixed filter set. Export reuses the same shape.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub tracker_status: Option<String>,
    pub expire_date: Option<String>,
    pub sim_exp_date: Option<String>,
    pub sold_by: Option<String>,
    pub sim_provider: Option<String>,
    pub tracker_model: Option<String>,
    pub country: Option<String>,
}

impl ListParams {
    fn filters(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("status", &self.status),
            ("tracker_status", &self.tracker_status),
            ("expire_date", &self.expire_date),
            ("sim_exp_date", &self.sim_exp_date),
            ("sold_by", &self.sold_by),
            ("sim_provider", &self.sim_provider),
            ("tracker_model", &self.tracker_model),
            ("country", &self.country),
        ]
    }
}

pub async fn search_clients_internal(
    pool: &DbPool,
    params: &ListParams,
) -> TrackdeskResult<Vec<ClientRecord>> {
    let mut conds: Vec<String> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(term) = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        binds.push(format!("%{}%", term));
        let placeholder = binds.len();
        let ors = SEARCH_COLUMNS
            .iter()
            .map(|col| format!("{} ILIKE ${}", col, placeholder))
            .collect::<Vec<_>>()
            .join(" OR ");
        conds.push(format!("({})", ors));
    }

    for (col, value) in params.filters() {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            binds.push(v.to_string());
            conds.push(format!("{} = ${}", col, binds.len()));
        }
    }

    let mut sql = String::from("SELECT * FROM clients");
    if !conds.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conds.join(" AND "));
    }
    sql.push_str(" ORDER BY id DESC LIMIT 500");

    let mut query = sqlx::query_as::<_, ClientRecord>(&sql);
    for bind in &binds {
        query = query.bind(bind);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn get_client_internal(pool: &DbPool, id: i64) -> TrackdeskResult<ClientDetail> {
    let record = sqlx::query_as::<_, ClientRecord>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(ClientDetail::from_record(record))
}

/// A record plus its Sage references decomposed for the edit form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetail {
    #[serde(flatten)]
    pub record: ClientRecord,
    pub inv_refs: [String; MAX_SUB_REFS],
    pub rcp_refs: [String; MAX_SUB_REFS],
}

impl ClientDetail {
    pub fn from_record(record: ClientRecord) -> Self {
        let inv_refs = decode_refs(&record.sage_invoice_reference);
        let rcp_refs = decode_refs(&record.sage_payment_reference);
        ClientDetail {
            record,
            inv_refs,
            rcp_refs,
        }
    }
}

/// Projects a record onto the configured list columns, keyed by column
/// identifier, with the row id for edit links.
pub fn list_row(record: &ClientRecord) -> Value {
    let mut row = Map::new();
    row.insert("id".to_string(), Value::from(record.id));
    for field in LIST_COLUMNS {
        row.insert(field.name().to_string(), Value::from(field.value(record)));
    }
    Value::Object(row)
}

#[derive(Debug, Deserialize)]
pub struct ClientIdQuery {
    pub id: i64,
}

pub async fn get_client(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<ClientIdQuery>,
) -> TrackdeskResult<Json<ClientDetail>> {
    Ok(Json(get_client_internal(&state.pool, params.id).await?))
}

pub async fn list_clients(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<ListParams>,
) -> TrackdeskResult<Json<Vec<Value>>> {
    let records = search_clients_internal(&state.pool, &params).await?;
    Ok(Json(records.iter().map(list_row).collect()))
}
