#[cfg(test)]
mod tests {
    use crate::commands::client::fields::{ClientField, DEFAULT_EXPORT_FIELDS};
    use crate::commands::client::refs::{decode_refs, encode_refs, validate_ref_group};
    use crate::commands::client::status::{stamp_transition, RecordStatus, StatusStamps};
    use crate::commands::client::utils::{is_month_code, is_valid_email, parse_date_safe};
    use crate::commands::export::{build_csv, resolve_fields};
    use crate::db::ClientRecord;
    use chrono::{NaiveDate, Utc};

    fn sample_record() -> ClientRecord {
        ClientRecord {
            id: 1,
            added: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            email: "fleet@example.com".to_string(),
            sage_details: "ACC-00042".to_string(),
            sage_invoice_reference: "INV-1;INV-2".to_string(),
            sage_payment_reference: "RCP-1".to_string(),
            tracker_imei: "356938035643809".to_string(),
            tracker_model: "TK-103B".to_string(),
            tracker_activation_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            tracker_expire_date: NaiveDate::from_ymd_opt(2025, 1, 20),
            tracker_status: "ACTIVE".to_string(),
            tracker_status_note: None,
            sim_number: "27821234567".to_string(),
            sim_activation_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            sim_expire_date: NaiveDate::from_ymd_opt(2025, 1, 20),
            sim_provider: "VODACOM".to_string(),
            sim_code: "M2M".to_string(),
            status: "ACTIVE".to_string(),
            sim_status_note: None,
            expire_date: "EXP JAN 25".to_string(),
            sim_exp_date: "EXP JAN 25".to_string(),
            country: "ZA".to_string(),
            sold_by: "DEALER".to_string(),
            description: None,
            activated_at: Some(Utc::now()),
            suspended_at: None,
            created_at: Some(Utc::now()),
        }
    }

    #[test]
    fn test_decode_refs_positions() {
        let subs = decode_refs("A;B;C");
        assert_eq!(subs[0], "A");
        assert_eq!(subs[1], "B");
        assert_eq!(subs[2], "C");
        assert_eq!(subs[3], "");
        assert_eq!(subs[4], "");
    }

    #[test]
    fn test_decode_refs_drops_extra_segments() {
        // Legacy rows may carry more than five segments; the tail is dropped.
        let subs = decode_refs("A;B;C;D;E;F;G");
        assert_eq!(subs, ["A", "B", "C", "D", "E"].map(String::from));
    }

    #[test]
    fn test_encode_refs_compacts_blanks() {
        let subs = [
            "A".to_string(),
            "".to_string(),
            "C".to_string(),
            "".to_string(),
            "".to_string(),
        ];
        assert_eq!(encode_refs(&subs), "A;C");
    }

    #[test]
    fn test_encode_refs_trims_values() {
        let subs = [
            " A ".to_string(),
            "  ".to_string(),
            "C".to_string(),
            "".to_string(),
            "".to_string(),
        ];
        assert_eq!(encode_refs(&subs), "A;C");
    }

    /// Decode then encode keeps non-empty values in relative order but
    /// compacts their positions. "A;;C" cannot round-trip to itself.
    #[test]
    fn test_ref_round_trip_compacts_positions() {
        let decoded = decode_refs("A;;C");
        assert_eq!(decoded[1], "");
        assert_eq!(encode_refs(&decoded), "A;C");

        // Without mid-sequence blanks the round trip is exact.
        let decoded = decode_refs("A;B;C");
        assert_eq!(encode_refs(&decoded), "A;B;C");
    }

    #[test]
    fn test_validate_ref_group_requires_first() {
        let subs = [
            "".to_string(),
            "B".to_string(),
            "".to_string(),
            "".to_string(),
            "".to_string(),
        ];
        assert!(validate_ref_group("INV REF", &subs).is_err());
    }

    #[test]
    fn test_validate_ref_group_limits_length() {
        let mut subs: [String; 5] = Default::default();
        subs[0] = "X".repeat(51);
        assert!(validate_ref_group("INV REF", &subs).is_err());

        subs[0] = "X".repeat(30);
        subs[1] = "Y".repeat(30);
        // Both fit individually but the joined value exceeds the column.
        assert!(validate_ref_group("INV REF", &subs).is_err());

        subs[1] = String::new();
        assert_eq!(validate_ref_group("INV REF", &subs).unwrap(), "X".repeat(30));
    }

    #[test]
    fn test_stamp_transition_on_creation() {
        let now = Utc::now();

        let stamps = stamp_transition(None, RecordStatus::Active, now);
        assert_eq!(stamps.activated_at, Some(now));
        assert_eq!(stamps.suspended_at, None);
        assert!(!stamps.clear_suspended_at);

        let stamps = stamp_transition(None, RecordStatus::Suspended, now);
        assert_eq!(stamps.activated_at, None);
        assert_eq!(stamps.suspended_at, Some(now));
    }

    #[test]
    fn test_stamp_transition_on_change() {
        let now = Utc::now();

        let stamps = stamp_transition(Some(RecordStatus::Active), RecordStatus::Suspended, now);
        assert_eq!(stamps.suspended_at, Some(now));
        assert_eq!(stamps.activated_at, None);
        assert!(!stamps.clear_suspended_at);

        let stamps = stamp_transition(Some(RecordStatus::Suspended), RecordStatus::Active, now);
        assert_eq!(stamps.activated_at, Some(now));
        assert!(stamps.clear_suspended_at);
    }

    #[test]
    fn test_stamp_transition_unchanged_status() {
        let now = Utc::now();
        let stamps = stamp_transition(Some(RecordStatus::Active), RecordStatus::Active, now);
        assert_eq!(stamps, StatusStamps::default());

        let stamps = stamp_transition(Some(RecordStatus::Suspended), RecordStatus::Suspended, now);
        assert_eq!(stamps, StatusStamps::default());
    }

    #[test]
    fn test_date_parsing() {
        assert_eq!(
            parse_date_safe("2023-10-27"),
            Some(NaiveDate::from_ymd_opt(2023, 10, 27).unwrap())
        );
        assert_eq!(
            parse_date_safe("20231027"),
            Some(NaiveDate::from_ymd_opt(2023, 10, 27).unwrap())
        );
        assert_eq!(parse_date_safe("invalid"), None);
        assert_eq!(parse_date_safe(""), None);
    }

    #[test]
    fn test_month_code_format() {
        assert!(is_month_code("EXP JAN 24"));
        assert!(is_month_code("EXP DEC 26"));
        assert!(!is_month_code("EXP JANUARY 24"));
        assert!(!is_month_code("JAN 24"));
        assert!(!is_month_code("EXP JAN 2024"));
        assert!(!is_month_code(""));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("fleet@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.co.za"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@nodot"));
        assert!(!is_valid_email("user name@example.com"));
    }

    #[test]
    fn test_export_header_labels_in_configured_order() {
        let labels: Vec<&str> = DEFAULT_EXPORT_FIELDS.iter().map(|f| f.label()).collect();
        assert_eq!(
            labels,
            vec![
                "EMAIL",
                "SAGE DETAILS",
                "TRACKER IMEI",
                "EXPIRE DATE",
                "TRACKER EXPIRE DATE",
                "SIM NUMBER",
                "SIM EXP DATE",
                "SIM EXPIRE",
                "SIM PROVIDER",
                "TRACKER STATUS",
                "TRACKER MODEL",
                "SOLD BY",
                "COUNTRY",
                "STATUS",
            ]
        );
    }

    #[test]
    fn test_resolve_fields_subsets_and_reorders() {
        assert_eq!(resolve_fields(None).unwrap(), DEFAULT_EXPORT_FIELDS.to_vec());

        let fields = resolve_fields(Some("status,email")).unwrap();
        assert_eq!(fields, vec![ClientField::Status, ClientField::Email]);

        // Excluded and unknown fields are rejected, not skipped.
        assert!(resolve_fields(Some("created_at")).is_err());
        assert!(resolve_fields(Some("email,bogus")).is_err());
    }

    #[test]
    fn test_csv_export_headers_and_rows() {
        let records = vec![sample_record()];
        let bytes = build_csv(DEFAULT_EXPORT_FIELDS, &records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "EMAIL,SAGE DETAILS,TRACKER IMEI,EXPIRE DATE,TRACKER EXPIRE DATE,\
             SIM NUMBER,SIM EXP DATE,SIM EXPIRE,SIM PROVIDER,TRACKER STATUS,\
             TRACKER MODEL,SOLD BY,COUNTRY,STATUS"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("fleet@example.com,ACC-00042,356938035643809,EXP JAN 25"));
        // The Sage reference composites are excluded from export.
        assert!(!text.contains("INV-1"));
    }

    #[test]
    fn test_csv_export_honours_field_subset() {
        let records = vec![sample_record()];
        let fields = resolve_fields(Some("country,email")).unwrap();
        let bytes = build_csv(&fields, &records).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "COUNTRY,EMAIL\nZA,fleet@example.com\n");
    }
}
