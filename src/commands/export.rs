use axum::{
    extract::{Query, State as AxumState},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook};
use serde::Deserialize;

use crate::db::ClientRecord;
use crate::error::{TrackdeskError, TrackdeskResult};
use crate::state::AppState;

use super::client::fields::{ClientField, DEFAULT_EXPORT_FIELDS};
use super::client::query::{search_clients_internal, ListParams};

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
    /// Comma-separated subset/reordering of the exportable columns.
    pub fields: Option<String>,
    #[serde(flatten)]
    pub list: ListParams,
}

/// Resolves the requested column set. Only configured export columns are
/// accepted; anything else is a form error, not a silent skip.
pub fn resolve_fields(requested: Option<&str>) -> TrackdeskResult<Vec<ClientField>> {
    match requested.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(DEFAULT_EXPORT_FIELDS.to_vec()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                ClientField::from_name(name).ok_or_else(|| {
                    TrackdeskError::Validation(format!("Unknown export field '{}'", name))
                })
            })
            .collect(),
    }
}

pub fn build_csv(fields: &[ClientField], records: &[ClientRecord]) -> TrackdeskResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(fields.iter().map(|f| f.label()))?;
    for record in records {
        writer.write_record(fields.iter().map(|f| f.value(record)))?;
    }
    writer
        .into_inner()
        .map_err(|e| TrackdeskError::Internal(format!("CSV buffer error: {}", e)))
}

pub fn build_xlsx(fields: &[ClientField], records: &[ClientRecord]) -> TrackdeskResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, field) in fields.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, field.label(), &header_format)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, field) in fields.iter().enumerate() {
            worksheet.write_string((row + 1) as u32, col as u16, field.value(record))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// On-demand file export of the current list view. Honors the same search
/// and filter parameters as the list itself.
pub async fn export_clients(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<ExportParams>,
) -> TrackdeskResult<impl IntoResponse> {
    let fields = resolve_fields(params.fields.as_deref())?;
    let records = search_clients_internal(&state.pool, &params.list).await?;

    let stamp = Utc::now().format("%Y%m%d");
    let (bytes, content_type, filename) = match params.format.as_deref().unwrap_or("csv") {
        "csv" => (
            build_csv(&fields, &records)?,
            "text/csv",
            format!("clients-{}.csv", stamp),
        ),
        "xlsx" => (
            build_xlsx(&fields, &records)?,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            format!("clients-{}.xlsx", stamp),
        ),
        other => {
            return Err(TrackdeskError::Validation(format!(
                "Unknown export format '{}'",
                other
            )))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}
