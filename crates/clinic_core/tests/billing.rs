use clinic_core::db::open_db_in_memory;
use clinic_core::{
    format_amount, sqlite_service, AppointmentFields, BillLine, BillRequest, BillingRepository,
    NewBillingItem, RepoError, ServiceError, SqliteBillingRepository, ValidationError,
};
use rusqlite::Connection;

fn add_appointment(conn: &Connection, patient: &str, date: &str) -> i64 {
    sqlite_service(conn)
        .unwrap()
        .add_appointment(&AppointmentFields::new(
            patient, "Mehta", "Consult", date, "10:00",
        ))
        .unwrap()
}

fn consult_and_lab(appointment_id: i64) -> BillRequest {
    BillRequest {
        appointment_id,
        items: vec![BillLine::new("Consult", 500.0), BillLine::new("Lab", 200.0)],
    }
}

#[test]
fn create_bill_joins_rows_to_appointment() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let appointment_id = add_appointment(&conn, "Asha Rao", "2024-01-05");

    let ids = service.create_bill(&consult_and_lab(appointment_id)).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids[0] < ids[1]);

    let bills = service.get_bills().unwrap();
    assert_eq!(bills.len(), 2);
    for row in &bills {
        assert_eq!(row.appointment_id, Some(appointment_id));
        assert_eq!(row.patient_name.as_deref(), Some("Asha Rao"));
        assert_eq!(row.date.as_deref(), Some("2024-01-05"));
    }

    let total: f64 = service
        .get_billing_items()
        .unwrap()
        .iter()
        .filter(|item| item.appointment_id == Some(appointment_id))
        .map(|item| item.amount)
        .sum();
    assert_eq!(total, 700.0);
}

#[test]
fn get_bill_groups_items_with_header_and_total() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let billed = add_appointment(&conn, "Asha Rao", "2024-01-05");
    let other = add_appointment(&conn, "Ravi", "2024-01-06");

    service.create_bill(&consult_and_lab(billed)).unwrap();
    service
        .create_bill(&BillRequest {
            appointment_id: other,
            items: vec![BillLine::new("X-ray", 900.0)],
        })
        .unwrap();

    let bill = service.get_bill(billed).unwrap();
    assert_eq!(bill.patient_name.as_deref(), Some("Asha Rao"));
    assert_eq!(bill.doctor_name.as_deref(), Some("Mehta"));
    assert_eq!(bill.time.as_deref(), Some("10:00"));
    assert_eq!(bill.items.len(), 2);
    assert_eq!(bill.total, 700.0);
    assert_eq!(bill.formatted_total(), "₹700.00");
    assert_eq!(format_amount(bill.items[0].amount), "₹500.00");
}

#[test]
fn bills_are_ordered_by_appointment_date_descending() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let older = add_appointment(&conn, "Older", "2024-01-01");
    let newer = add_appointment(&conn, "Newer", "2024-06-01");

    service
        .create_bill(&BillRequest {
            appointment_id: older,
            items: vec![BillLine::new("Consult", 100.0)],
        })
        .unwrap();
    service
        .create_bill(&BillRequest {
            appointment_id: newer,
            items: vec![BillLine::new("Consult", 100.0)],
        })
        .unwrap();

    let order: Vec<_> = service
        .get_bills()
        .unwrap()
        .into_iter()
        .map(|row| row.appointment_id)
        .collect();
    assert_eq!(order, vec![Some(newer), Some(older)]);
}

#[test]
fn deleting_appointment_keeps_orphaned_billing_rows() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let appointment_id = add_appointment(&conn, "Asha Rao", "2024-01-05");
    service.create_bill(&consult_and_lab(appointment_id)).unwrap();

    assert_eq!(service.delete_appointment(appointment_id).unwrap(), 1);

    assert_eq!(service.get_billing_items().unwrap().len(), 2);
    let orphans: Vec<_> = service
        .get_bills()
        .unwrap()
        .into_iter()
        .filter(|row| row.appointment_id == Some(appointment_id))
        .collect();
    assert_eq!(orphans.len(), 2);
    assert!(orphans
        .iter()
        .all(|row| row.patient_name.is_none() && row.date.is_none()));

    let bill = service.get_bill(appointment_id).unwrap();
    assert!(bill.patient_name.is_none());
    assert_eq!(bill.total, 700.0);
}

#[test]
fn bill_without_items_totals_positive_zero() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let appointment_id = add_appointment(&conn, "Asha Rao", "2024-01-05");

    let bill = service.get_bill(appointment_id).unwrap();
    assert!(bill.items.is_empty());
    assert_eq!(bill.total, 0.0);
    assert!(bill.total.is_sign_positive());
    assert_eq!(bill.formatted_total(), "₹0.00");
}

#[test]
fn bill_for_unknown_appointment_is_stored_without_check() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();

    let ids = service.create_bill(&consult_and_lab(42)).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(service
        .get_bills()
        .unwrap()
        .iter()
        .all(|row| row.patient_name.is_none()));
}

#[test]
fn failed_line_rolls_back_the_whole_bill() {
    let conn = open_db_in_memory().unwrap();
    let appointment_id = add_appointment(&conn, "Asha Rao", "2024-01-05");
    conn.execute_batch(
        "CREATE TRIGGER reject_refund
         BEFORE INSERT ON billing
         WHEN NEW.itemName = 'Refund'
         BEGIN
            SELECT RAISE(ABORT, 'refund lines are not billable');
         END;",
    )
    .unwrap();

    let service = sqlite_service(&conn).unwrap();
    let request = BillRequest {
        appointment_id,
        items: vec![
            BillLine::new("Consult", 500.0),
            BillLine::new("Lab", 200.0),
            BillLine::new("Refund", 0.0),
        ],
    };

    let err = service.create_bill(&request).unwrap_err();
    assert!(matches!(err, ServiceError::Store(RepoError::Query(_))));
    assert!(service.get_billing_items().unwrap().is_empty());
}

#[test]
fn add_billing_item_inserts_single_row() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();
    let appointment_id = add_appointment(&conn, "Asha Rao", "2024-01-05");

    let id = service
        .add_billing_item(&NewBillingItem {
            appointment_id,
            item_name: "Dressing".to_string(),
            amount: 75.5,
        })
        .unwrap();

    let items = service.get_billing_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].item_name, "Dressing");
    assert_eq!(items[0].amount, 75.5);
}

#[test]
fn billing_items_are_listed_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBillingRepository::try_new(&conn).unwrap();

    for (appointment_id, name) in [(3, "c"), (1, "a"), (2, "b")] {
        repo.create_billing_item(&NewBillingItem {
            appointment_id,
            item_name: name.to_string(),
            amount: 1.0,
        })
        .unwrap();
    }

    let names: Vec<_> = repo
        .list_billing_items()
        .unwrap()
        .into_iter()
        .map(|item| item.item_name)
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);
    assert_eq!(repo.list_bill_items_for(1).unwrap().len(), 1);
}

#[test]
fn invalid_bill_requests_are_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let service = sqlite_service(&conn).unwrap();

    let empty = BillRequest {
        appointment_id: 1,
        items: Vec::new(),
    };
    assert!(matches!(
        service.create_bill(&empty).unwrap_err(),
        ServiceError::Validation(ValidationError::EmptyBill)
    ));

    let negative = BillRequest {
        appointment_id: 1,
        items: vec![BillLine::new("Consult", 500.0), BillLine::new("Discount", -50.0)],
    };
    assert!(matches!(
        service.create_bill(&negative).unwrap_err(),
        ServiceError::Validation(ValidationError::InvalidAmount { .. })
    ));

    let unnamed = NewBillingItem {
        appointment_id: 1,
        item_name: " ".to_string(),
        amount: 10.0,
    };
    assert!(matches!(
        service.add_billing_item(&unnamed).unwrap_err(),
        ServiceError::Validation(ValidationError::BlankField("itemName"))
    ));

    assert!(service.get_billing_items().unwrap().is_empty());
}
