//! Invoice payload normalizer.
//!
//! Backend invoice payloads arrive in several historical shapes: the
//! invoice-keyed endpoint, the prescription-keyed endpoint, and legacy field
//! names inside both. This module maps any of them into one canonical
//! [`Invoice`]. Each field resolves through an ordered list of accessor
//! paths (first present value wins, a `.` descends into a nested object),
//! and an exhausted chain degrades to the field's default instead of an
//! error, so partial and legacy payloads still render usably.

use serde_json::Value;

use crate::models::{ClinicInfo, Invoice, InvoiceLine};

// Accessor chains, tried in order, per invoice field.
const INVOICE_ID: &[&str] = &["invoiceId", "id", "prescriptionId"];
const CREATED_AT: &[&str] = &["createdAt", "date", "invoiceDate"];
const PATIENT_NAME: &[&str] = &["patientName", "patient.name", "fullName"];
const PATIENT_AGE: &[&str] = &["patientAge", "patient.age", "age"];
const PATIENT_GENDER: &[&str] = &["patientGender", "patient.gender", "gender"];
const LINE_ITEMS: &[&str] = &["items", "medicines"];
const SUB_TOTAL: &[&str] = &["subTotal", "subtotal"];
const SERVICE_CHARGE: &[&str] = &["serviceCharge", "serviceFee"];
const TOTAL_AMOUNT: &[&str] = &["totalAmount", "grandTotal"];
const CLINIC_NAME: &[&str] = &["clinic.name", "clinicName"];
const CLINIC_ADDRESS: &[&str] = &["clinic.address", "clinicAddress"];
const CLINIC_PHONE: &[&str] = &["clinic.phone", "clinicPhone"];
const CASHIER: &[&str] = &["cashierName", "cashier.name"];

// Accessor chains per line item field.
const LINE_ID: &[&str] = &["id", "medicineId"];
const LINE_NAME: &[&str] = &["medicineName", "name", "medicine"];
const LINE_DOSAGE: &[&str] = &["dosage", "dose"];
const LINE_QUANTITY: &[&str] = &["dispenseQuantity", "quantity", "qty"];
const LINE_UNIT_PRICE: &[&str] = &["unitPrice", "price"];
const LINE_TOTAL: &[&str] = &["totalPrice", "total"];

/// Normalize a raw invoice payload into the canonical shape.
///
/// Returns `None` when the payload is not a JSON object. The creation
/// timestamp fallback is captured once per call.
pub fn normalize(raw: &Value) -> Option<Invoice> {
    normalize_at(raw, &chrono::Utc::now().to_rfc3339())
}

/// Same as [`normalize`] with the fallback creation timestamp supplied by
/// the caller, so repeated normalization of one payload is structurally
/// equal.
pub fn normalize_at(raw: &Value, now: &str) -> Option<Invoice> {
    if !raw.is_object() {
        return None;
    }

    let lines: Vec<InvoiceLine> = pick(raw, LINE_ITEMS)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| normalize_line(item, index))
                .collect()
        })
        .unwrap_or_default();

    let sub_total = pick_number(raw, SUB_TOTAL)
        .unwrap_or_else(|| lines.iter().map(|line| line.line_total).sum());
    let service_charge = pick_number(raw, SERVICE_CHARGE).unwrap_or(0.0);
    let total_amount = pick_number(raw, TOTAL_AMOUNT).unwrap_or(sub_total + service_charge);

    Some(Invoice {
        id: pick_string(raw, INVOICE_ID).unwrap_or_else(|| "-".into()),
        created_at: pick_string(raw, CREATED_AT).unwrap_or_else(|| now.to_string()),
        patient_name: pick_string(raw, PATIENT_NAME).unwrap_or_else(|| "-".into()),
        patient_age: pick_string(raw, PATIENT_AGE).unwrap_or_else(|| "-".into()),
        patient_gender: pick_string(raw, PATIENT_GENDER).unwrap_or_else(|| "-".into()),
        lines,
        sub_total,
        service_charge,
        total_amount,
        clinic: ClinicInfo {
            name: pick_string(raw, CLINIC_NAME).unwrap_or_else(|| "-".into()),
            address: pick_string(raw, CLINIC_ADDRESS).unwrap_or_else(|| "-".into()),
            phone: pick_string(raw, CLINIC_PHONE).unwrap_or_else(|| "-".into()),
        },
        cashier: pick_string(raw, CASHIER),
    })
}

fn normalize_line(item: &Value, index: usize) -> InvoiceLine {
    let quantity = pick_number(item, LINE_QUANTITY).unwrap_or(0.0).max(0.0);
    let unit_price = pick_number(item, LINE_UNIT_PRICE).unwrap_or(0.0).max(0.0);
    // a source-supplied total is trusted as-is; only a missing one is derived
    let line_total = pick_number(item, LINE_TOTAL).unwrap_or(quantity * unit_price);

    InvoiceLine {
        id: pick_string(item, LINE_ID).unwrap_or_else(|| (index + 1).to_string()),
        medicine_name: pick_string(item, LINE_NAME).unwrap_or_else(|| "-".into()),
        dosage: pick_string(item, LINE_DOSAGE).unwrap_or_else(|| "-".into()),
        quantity,
        unit_price,
        line_total,
    }
}

/// First accessor path that yields a non-null value.
fn pick<'a>(value: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| lookup(value, path))
}

/// First accessor path that yields usable text. Empty strings and nulls do
/// not terminate the chain.
fn pick_string(value: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(value_to_string))
}

/// First accessor path that yields a number. Numeric strings are accepted;
/// anything else falls through to the next path.
fn pick_number(value: &Value, paths: &[&str]) -> Option<f64> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(value_to_number))
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, key| current.get(key))
        .filter(|found| !found.is_null())
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn value_to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_payloads() {
        assert!(normalize(&Value::Null).is_none());
        assert!(normalize(&json!([1, 2, 3])).is_none());
        assert!(normalize(&json!("invoice")).is_none());
        assert!(normalize(&json!(42)).is_none());
    }

    #[test]
    fn test_empty_object_defaults() {
        let invoice = normalize_at(&json!({}), "2024-01-15T10:00:00Z").unwrap();
        assert_eq!(invoice.id, "-");
        assert_eq!(invoice.patient_name, "-");
        assert_eq!(invoice.patient_age, "-");
        assert_eq!(invoice.patient_gender, "-");
        assert_eq!(invoice.created_at, "2024-01-15T10:00:00Z");
        assert!(invoice.lines.is_empty());
        assert_eq!(invoice.sub_total, 0.0);
        assert_eq!(invoice.service_charge, 0.0);
        assert_eq!(invoice.total_amount, 0.0);
        assert!(invoice.cashier.is_none());
    }

    #[test]
    fn test_line_total_derived() {
        let invoice = normalize_at(
            &json!({ "items": [{ "quantity": 2, "unitPrice": 50 }] }),
            "2024-01-15T10:00:00Z",
        )
        .unwrap();
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].line_total, 100.0);
        assert_eq!(invoice.sub_total, 100.0);
        assert_eq!(invoice.total_amount, 100.0);
    }

    #[test]
    fn test_line_total_trusted_when_present() {
        // no reconciliation against quantity * unit_price
        let invoice = normalize_at(
            &json!({ "items": [{ "quantity": 2, "unitPrice": 50, "totalPrice": 90 }] }),
            "2024-01-15T10:00:00Z",
        )
        .unwrap();
        assert_eq!(invoice.lines[0].line_total, 90.0);
        assert_eq!(invoice.sub_total, 90.0);
    }

    #[test]
    fn test_patient_name_chain() {
        let direct = normalize_at(&json!({ "patientName": "Aung Ko" }), "t").unwrap();
        assert_eq!(direct.patient_name, "Aung Ko");

        let nested = normalize_at(&json!({ "patient": { "name": "Su Su" } }), "t").unwrap();
        assert_eq!(nested.patient_name, "Su Su");

        let legacy = normalize_at(&json!({ "fullName": "Mya Mya" }), "t").unwrap();
        assert_eq!(legacy.patient_name, "Mya Mya");

        // earlier paths win
        let both = normalize_at(
            &json!({ "patientName": "Aung Ko", "fullName": "Mya Mya" }),
            "t",
        )
        .unwrap();
        assert_eq!(both.patient_name, "Aung Ko");
    }

    #[test]
    fn test_null_and_empty_do_not_terminate_chain() {
        let invoice = normalize_at(
            &json!({ "patientName": null, "patient": { "name": "" }, "fullName": "Mya Mya" }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.patient_name, "Mya Mya");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let invoice = normalize_at(
            &json!({ "items": [{ "qty": "3", "price": "12.5" }], "patientAge": 34 }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.lines[0].quantity, 3.0);
        assert_eq!(invoice.lines[0].unit_price, 12.5);
        assert_eq!(invoice.lines[0].line_total, 37.5);
        assert_eq!(invoice.patient_age, "34");
    }

    #[test]
    fn test_negative_amounts_clamped() {
        let invoice = normalize_at(
            &json!({ "items": [{ "quantity": -2, "unitPrice": 50 }] }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.lines[0].quantity, 0.0);
        assert_eq!(invoice.lines[0].line_total, 0.0);
    }

    #[test]
    fn test_line_index_fallback_id() {
        let invoice = normalize_at(
            &json!({ "items": [{ "name": "Paracetamol" }, { "name": "Cetirizine" }] }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.lines[0].id, "1");
        assert_eq!(invoice.lines[1].id, "2");
    }

    #[test]
    fn test_totals_derivation() {
        let invoice = normalize_at(
            &json!({
                "items": [
                    { "quantity": 2, "unitPrice": 50 },
                    { "quantity": 1, "unitPrice": 300 }
                ],
                "serviceCharge": 500
            }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.sub_total, 400.0);
        assert_eq!(invoice.service_charge, 500.0);
        assert_eq!(invoice.total_amount, 900.0);
    }

    #[test]
    fn test_supplied_totals_trusted() {
        let invoice = normalize_at(
            &json!({
                "items": [{ "quantity": 2, "unitPrice": 50 }],
                "subTotal": 120,
                "totalAmount": 150
            }),
            "t",
        )
        .unwrap();
        assert_eq!(invoice.sub_total, 120.0);
        assert_eq!(invoice.total_amount, 150.0);
    }

    #[test]
    fn test_deterministic_for_fixed_now() {
        let payload = json!({ "medicines": [{ "medicine": "Paracetamol", "qty": 4 }] });
        let first = normalize_at(&payload, "2024-01-15T10:00:00Z").unwrap();
        let second = normalize_at(&payload, "2024-01-15T10:00:00Z").unwrap();
        assert_eq!(first, second);
    }
}
