//! End-to-end order flow: fill a draft, validate, price, export

use order_forge::core::{compute, is_order_valid, ItemField, OrderDraft};
use order_forge::excel::{export_order, OrderWorkbook, PhotoStatus};
use order_forge::types::OrderRequest;

fn filled_draft() -> OrderDraft {
    let mut draft = OrderDraft::new();
    let first = draft.items()[0].id.clone();
    draft.update_item(&first, ItemField::Url("https://detail.1688.com/offer/1.html".into()));
    draft.update_item(&first, ItemField::Quantity(2));
    draft.update_item(&first, ItemField::Price(100.0));
    draft.update_item(&first, ItemField::Color("black".into()));

    let second = draft.add_item().id.clone();
    draft.update_item(&second, ItemField::Url("https://item.taobao.com/item.htm?id=9".into()));
    draft.update_item(&second, ItemField::Quantity(3));
    draft.update_item(&second, ItemField::Price(50.0));
    draft
}

#[test]
fn test_draft_to_workbook() {
    let draft = filled_draft();
    assert!(draft.is_valid());
    assert_eq!(draft.valid_count(), 2);
    assert!((draft.total_amount() - 350.0).abs() < 1e-9);

    let exported = export_order(draft.items(), &OrderWorkbook::new()).unwrap();
    assert_eq!(exported.report.rows.len(), 2);
    assert_eq!(exported.report.rows[0].item_id, draft.items()[0].id);
    assert!((exported.ledger.total_converted - 4483.5).abs() < 1e-6);
}

#[test]
fn test_invalid_items_still_export() {
    // Validation gates the form, not the exporter
    let mut draft = filled_draft();
    let extra = draft.add_item().id.clone();
    draft.update_item(&extra, ItemField::Url("https://example.com/x".into()));

    assert_eq!(draft.valid_count(), 2);
    let exported = export_order(draft.items(), &OrderWorkbook::new()).unwrap();
    assert_eq!(exported.report.rows.len(), 3);
    assert_eq!(exported.report.totals_row, 13);
}

#[test]
fn test_duplicate_item_prices_twice() {
    let mut draft = filled_draft();
    let first = draft.items()[0].id.clone();
    draft.duplicate_item(&first).unwrap();

    let ledger = compute(draft.items()).unwrap();
    assert_eq!(ledger.total_quantity, 7);
    assert!((ledger.total_price - 550.0).abs() < 1e-9);
}

#[test]
fn test_json_request_to_workbook() {
    let request: OrderRequest = serde_json::from_str(
        r#"{"items": [
            {"id": "1", "url": "https://1688.com/a", "quantity": "2", "price": "100"},
            {"id": "2", "url": "https://1688.com/b", "quantity": 1, "price": 10, "photo": "data:image/png;base64,AAAA"}
        ]}"#,
    )
    .unwrap();
    assert!(is_order_valid(&request.items));

    let exported = export_order(&request.items, &OrderWorkbook::new()).unwrap();
    assert_eq!(exported.report.rows[0].photo, PhotoStatus::Absent);
    assert!(matches!(exported.report.rows[1].photo, PhotoStatus::Failed(_)));
    assert_eq!(exported.report.failed_photos(), 1);
    assert!((exported.ledger.total_price - 210.0).abs() < 1e-9);
}
