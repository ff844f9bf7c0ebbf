use crate::db::ClientRecord;
use chrono::NaiveDate;

/// The displayable/exportable columns of the list view, as a fixed table.
/// The field set is known ahead of time, so labels resolve statically
/// instead of by runtime name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    Email,
    SageDetails,
    TrackerImei,
    ExpireDate,
    TrackerExpireDate,
    SimNumber,
    SimExpDate,
    SimExpireDate,
    SimProvider,
    TrackerStatus,
    TrackerModel,
    SoldBy,
    Country,
    Status,
}

/// Default list/export column order. Internal identifiers, audit
/// timestamps, notes and the raw Sage reference composites are not
/// exported.
pub const DEFAULT_EXPORT_FIELDS: &[ClientField] = &[
    ClientField::Email,
    ClientField::SageDetails,
    ClientField::TrackerImei,
    ClientField::ExpireDate,
    ClientField::TrackerExpireDate,
    ClientField::SimNumber,
    ClientField::SimExpDate,
    ClientField::SimExpireDate,
    ClientField::SimProvider,
    ClientField::TrackerStatus,
    ClientField::TrackerModel,
    ClientField::SoldBy,
    ClientField::Country,
    ClientField::Status,
];

pub const LIST_COLUMNS: &[ClientField] = DEFAULT_EXPORT_FIELDS;

impl ClientField {
    pub fn name(&self) -> &'static str {
        match self {
            ClientField::Email => "email",
            ClientField::SageDetails => "sage_details",
            ClientField::TrackerImei => "tracker_imei",
            ClientField::ExpireDate => "expire_date",
            ClientField::TrackerExpireDate => "tracker_expire_date",
            ClientField::SimNumber => "sim_number",
            ClientField::SimExpDate => "sim_exp_date",
            ClientField::SimExpireDate => "sim_expire_date",
            ClientField::SimProvider => "sim_provider",
            ClientField::TrackerStatus => "tracker_status",
            ClientField::TrackerModel => "tracker_model",
            ClientField::SoldBy => "sold_by",
            ClientField::Country => "country",
            ClientField::Status => "status",
        }
    }

    /// Human-readable column header, as shown in the list view and in
    /// exported files.
    pub fn label(&self) -> &'static str {
        match self {
            ClientField::Email => "EMAIL",
            ClientField::SageDetails => "SAGE DETAILS",
            ClientField::TrackerImei => "TRACKER IMEI",
            ClientField::ExpireDate => "EXPIRE DATE",
            ClientField::TrackerExpireDate => "TRACKER EXPIRE DATE",
            ClientField::SimNumber => "SIM NUMBER",
            ClientField::SimExpDate => "SIM EXP DATE",
            ClientField::SimExpireDate => "SIM EXPIRE",
            ClientField::SimProvider => "SIM PROVIDER",
            ClientField::TrackerStatus => "TRACKER STATUS",
            ClientField::TrackerModel => "TRACKER MODEL",
            ClientField::SoldBy => "SOLD BY",
            ClientField::Country => "COUNTRY",
            ClientField::Status => "STATUS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        DEFAULT_EXPORT_FIELDS
            .iter()
            .copied()
            .find(|f| f.name() == name)
    }

    pub fn value(&self, record: &ClientRecord) -> String {
        match self {
            ClientField::Email => record.email.clone(),
            ClientField::SageDetails => record.sage_details.clone(),
            ClientField::TrackerImei => record.tracker_imei.clone(),
            ClientField::ExpireDate => record.expire_date.clone(),
            ClientField::TrackerExpireDate => format_date(record.tracker_expire_date),
            ClientField::SimNumber => record.sim_number.clone(),
            ClientField::SimExpDate => record.sim_exp_date.clone(),
            ClientField::SimExpireDate => format_date(record.sim_expire_date),
            ClientField::SimProvider => record.sim_provider.clone(),
            ClientField::TrackerStatus => record.tracker_status.clone(),
            ClientField::TrackerModel => record.tracker_model.clone(),
            ClientField::SoldBy => record.sold_by.clone(),
            ClientField::Country => record.country.clone(),
            ClientField::Status => record.status.clone(),
        }
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
