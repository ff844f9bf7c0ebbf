#[cfg(test)]
mod tests {
    use crate::commands::client::query::{get_client_internal, search_clients_internal, ListParams};
    use crate::commands::client::record::{
        create_client_internal, delete_client_internal, update_client_internal, ClientInput,
    };
    use crate::db::{self, DbPool};
    use chrono::Utc;

    async fn setup_test_db() -> DbPool {
        dotenvy::dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let pool = db::init_pool(&database_url)
            .await
            .expect("Failed to create pool");
        db::init_database(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    fn sample_input(suffix: &str) -> ClientInput {
        ClientInput {
            id: None,
            added: "2024-01-15".to_string(),
            email: format!("fleet-{}@example.com", suffix),
            sage_details: format!("ACC-{}", suffix),
            tracker_imei: format!("3569380{}", suffix),
            tracker_model: "TK-103B".to_string(),
            tracker_activation_date: Some("2024-01-20".to_string()),
            tracker_expire_date: Some("2025-01-20".to_string()),
            tracker_status: "ACTIVE".to_string(),
            tracker_status_note: None,
            sim_number: format!("2782{}", suffix),
            sim_activation_date: Some("2024-01-20".to_string()),
            sim_expire_date: Some("2025-01-20".to_string()),
            sim_provider: "VODACOM".to_string(),
            sim_code: "M2M".to_string(),
            status: "ACTIVE".to_string(),
            sim_status_note: None,
            expire_date: "EXP JAN 25".to_string(),
            sim_exp_date: "EXP JAN 25".to_string(),
            country: "ZA".to_string(),
            sold_by: "DEALER".to_string(),
            description: Some("Integration test record".to_string()),
            inv_ref_1: "INV-1".to_string(),
            inv_ref_2: String::new(),
            inv_ref_3: "INV-3".to_string(),
            inv_ref_4: String::new(),
            inv_ref_5: String::new(),
            rcp_ref_1: "RCP-1".to_string(),
            rcp_ref_2: String::new(),
            rcp_ref_3: String::new(),
            rcp_ref_4: String::new(),
            rcp_ref_5: String::new(),
        }
    }

    fn unique_suffix() -> String {
        format!("{}", Utc::now().timestamp_micros())
    }

    #[tokio::test]
    async fn test_create_stamps_activation_and_encodes_refs() {
        let pool = setup_test_db().await;
        let input = sample_input(&unique_suffix());

        let id = create_client_internal(&pool, &input)
            .await
            .expect("create_client_internal failed");

        let detail = get_client_internal(&pool, id)
            .await
            .expect("Failed to fetch created record");

        assert_eq!(detail.record.status, "ACTIVE");
        assert!(detail.record.activated_at.is_some());
        assert!(detail.record.suspended_at.is_none());
        assert!(detail.record.created_at.is_some());

        // Blanks between sub-references compact on encode.
        assert_eq!(detail.record.sage_invoice_reference, "INV-1;INV-3");
        assert_eq!(detail.inv_refs[0], "INV-1");
        assert_eq!(detail.inv_refs[1], "INV-3");
        assert_eq!(detail.record.sage_payment_reference, "RCP-1");

        let _ = delete_client_internal(&pool, id).await;
    }

    #[tokio::test]
    async fn test_status_transition_timestamps() {
        let pool = setup_test_db().await;
        let mut input = sample_input(&unique_suffix());

        let id = create_client_internal(&pool, &input)
            .await
            .expect("create failed");
        let created = get_client_internal(&pool, id).await.expect("fetch failed");
        let first_activation = created.record.activated_at.expect("activated_at not set");

        // ACTIVE -> SUSPENDED stamps suspended_at and keeps activated_at.
        input.id = Some(id);
        input.status = "SUSPENDED".to_string();
        update_client_internal(&pool, &input)
            .await
            .expect("suspend failed");
        let suspended = get_client_internal(&pool, id).await.expect("fetch failed");
        assert!(suspended.record.suspended_at.is_some());
        assert_eq!(suspended.record.activated_at, Some(first_activation));

        // SUSPENDED -> ACTIVE restamps activated_at and clears suspended_at.
        input.status = "ACTIVE".to_string();
        update_client_internal(&pool, &input)
            .await
            .expect("reactivate failed");
        let reactivated = get_client_internal(&pool, id).await.expect("fetch failed");
        assert!(reactivated.record.suspended_at.is_none());
        let second_activation = reactivated.record.activated_at.expect("activated_at cleared");
        assert!(second_activation > first_activation);

        let _ = delete_client_internal(&pool, id).await;
    }

    #[tokio::test]
    async fn test_resave_with_unchanged_status_keeps_timestamps() {
        let pool = setup_test_db().await;
        let mut input = sample_input(&unique_suffix());

        let id = create_client_internal(&pool, &input)
            .await
            .expect("create failed");
        let before = get_client_internal(&pool, id).await.expect("fetch failed");

        input.id = Some(id);
        input.sage_details = "ACC-UPDATED".to_string();
        update_client_internal(&pool, &input)
            .await
            .expect("resave failed");

        let after = get_client_internal(&pool, id).await.expect("fetch failed");
        assert_eq!(after.record.sage_details, "ACC-UPDATED");
        assert_eq!(after.record.activated_at, before.record.activated_at);
        assert_eq!(after.record.suspended_at, before.record.suspended_at);

        let _ = delete_client_internal(&pool, id).await;
    }

    #[tokio::test]
    async fn test_duplicate_identifiers_are_rejected_before_write() {
        let pool = setup_test_db().await;
        let suffix = unique_suffix();
        let input = sample_input(&suffix);

        let id = create_client_internal(&pool, &input)
            .await
            .expect("create failed");

        // Same email, different device identifiers.
        let mut dup = sample_input(&format!("{}9", suffix));
        dup.email = input.email.clone();
        let result = create_client_internal(&pool, &dup).await;
        assert!(result.is_err(), "duplicate email should be rejected");

        let _ = delete_client_internal(&pool, id).await;
    }

    #[tokio::test]
    async fn test_update_of_missing_record_aborts() {
        let pool = setup_test_db().await;
        let mut input = sample_input(&unique_suffix());
        input.id = Some(-1);

        let result = update_client_internal(&pool, &input).await;
        assert!(result.is_err(), "update of a vanished record must fail");
    }

    #[tokio::test]
    async fn test_list_search_and_filters() {
        let pool = setup_test_db().await;
        let suffix = unique_suffix();
        let input = sample_input(&suffix);

        let id = create_client_internal(&pool, &input)
            .await
            .expect("create failed");

        let params = ListParams {
            search: Some(input.tracker_imei.clone()),
            ..Default::default()
        };
        let found = search_clients_internal(&pool, &params)
            .await
            .expect("search failed");
        assert!(found.iter().any(|r| r.id == id));

        let params = ListParams {
            search: Some(input.tracker_imei.clone()),
            country: Some("ZA".to_string()),
            ..Default::default()
        };
        let found = search_clients_internal(&pool, &params)
            .await
            .expect("filtered search failed");
        assert!(found.iter().any(|r| r.id == id));

        let params = ListParams {
            search: Some(input.tracker_imei.clone()),
            country: Some("GB".to_string()),
            ..Default::default()
        };
        let found = search_clients_internal(&pool, &params)
            .await
            .expect("filtered search failed");
        assert!(!found.iter().any(|r| r.id == id));

        let _ = delete_client_internal(&pool, id).await;
    }
}
