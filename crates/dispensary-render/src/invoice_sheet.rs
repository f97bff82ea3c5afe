//! Invoice sheet rendering for canonical invoices.

use serde::{Deserialize, Serialize};

use dispensary_core::models::Invoice;

use crate::escape_csv;

/// Printable sheet wrapping one canonical invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSheet {
    invoice: Invoice,
}

impl InvoiceSheet {
    /// Wrap a normalized invoice for rendering.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            invoice: invoice.clone(),
        }
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    /// Render to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.invoice)
    }

    /// Render as a plain-text invoice sheet.
    pub fn to_text(&self) -> String {
        let invoice = &self.invoice;
        let mut out = String::new();

        out.push_str(&format!("{}\n", invoice.clinic.name));
        out.push_str(&format!("{}\n", invoice.clinic.address));
        out.push_str(&format!("Tel: {}\n", invoice.clinic.phone));
        out.push('\n');
        out.push_str(&format!("INVOICE {}\n", invoice.id));
        out.push_str(&format!("Date    : {}\n", invoice.created_at));
        out.push_str(&format!(
            "Patient : {} ({}, {})\n",
            invoice.patient_name, invoice.patient_age, invoice.patient_gender
        ));
        out.push('\n');

        for line in &invoice.lines {
            out.push_str(&format!(
                "{}  {}  {} x {:.2} = {:.2}\n",
                line.medicine_name, line.dosage, line.quantity, line.unit_price, line.line_total
            ));
        }

        out.push('\n');
        out.push_str(&format!("Sub total      : {:.2}\n", invoice.sub_total));
        if invoice.service_charge != 0.0 {
            out.push_str(&format!("Service charge : {:.2}\n", invoice.service_charge));
        }
        out.push_str(&format!("Total          : {:.2}\n", invoice.total_amount));

        if let Some(cashier) = &invoice.cashier {
            out.push('\n');
            out.push_str(&format!("Cashier : {}\n", cashier));
        }

        out
    }

    /// Render the medicine lines as CSV.
    pub fn to_csv(&self) -> String {
        let invoice = &self.invoice;
        let mut csv = String::new();

        csv.push_str("invoice_id,line_id,medicine,dosage,quantity,unit_price,line_total\n");
        for line in &invoice.lines {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                escape_csv(&invoice.id),
                escape_csv(&line.id),
                escape_csv(&line.medicine_name),
                escape_csv(&line.dosage),
                line.quantity,
                line.unit_price,
                line.line_total,
            ));
        }

        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispensary_core::models::{ClinicInfo, InvoiceLine};

    fn invoice() -> Invoice {
        Invoice {
            id: "INV-7".into(),
            created_at: "2024-01-15T10:00:00Z".into(),
            patient_name: "Su Su".into(),
            patient_age: "27".into(),
            patient_gender: "F".into(),
            lines: vec![
                InvoiceLine {
                    id: "1".into(),
                    medicine_name: "Paracetamol".into(),
                    dosage: "500mg".into(),
                    quantity: 10.0,
                    unit_price: 50.0,
                    line_total: 500.0,
                },
                InvoiceLine {
                    id: "2".into(),
                    medicine_name: "Vitamin C, chewable".into(),
                    dosage: "-".into(),
                    quantity: 30.0,
                    unit_price: 10.0,
                    line_total: 300.0,
                },
            ],
            sub_total: 800.0,
            service_charge: 200.0,
            total_amount: 1000.0,
            clinic: ClinicInfo {
                name: "Shwe Clinic".into(),
                address: "12 Main Rd".into(),
                phone: "09-555-1234".into(),
            },
            cashier: Some("Thida".into()),
        }
    }

    #[test]
    fn test_sheet_text() {
        let sheet = InvoiceSheet::from_invoice(&invoice());
        let text = sheet.to_text();
        assert!(text.contains("Shwe Clinic"));
        assert!(text.contains("INVOICE INV-7"));
        assert!(text.contains("Paracetamol"));
        assert!(text.contains("Sub total      : 800.00"));
        assert!(text.contains("Service charge : 200.00"));
        assert!(text.contains("Total          : 1000.00"));
        assert!(text.contains("Cashier : Thida"));
    }

    #[test]
    fn test_sheet_text_omits_zero_service_charge() {
        let mut plain = invoice();
        plain.service_charge = 0.0;
        let text = InvoiceSheet::from_invoice(&plain).to_text();
        assert!(!text.contains("Service charge"));
    }

    #[test]
    fn test_sheet_csv() {
        let sheet = InvoiceSheet::from_invoice(&invoice());
        let csv = sheet.to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // header + 2 lines
        assert!(lines[0].contains("invoice_id"));
        assert!(lines[1].contains("Paracetamol"));
        // comma inside the medicine name is quoted
        assert!(lines[2].contains("\"Vitamin C, chewable\""));
    }

    #[test]
    fn test_sheet_json() {
        let sheet = InvoiceSheet::from_invoice(&invoice());
        let json = sheet.to_json().unwrap();
        assert!(json.contains("\"patient_name\""));
        assert!(json.contains("INV-7"));
    }
}
