//! Summary and bill panels derived from the response's optional extras.

use crate::BillData;

/// Scene summary panel, shown only when the service produced a summary.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryPanel {
    pub text: String,
}

impl SummaryPanel {
    pub fn from_summary(summary: Option<&str>) -> Option<Self> {
        let text = summary?.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
        })
    }
}

/// Bill analysis panel, shown only when the service recognized a receipt.
#[derive(Clone, Debug, PartialEq)]
pub struct BillPanel {
    pub shop_name: String,
    pub items: Vec<String>,
    pub total: String,
}

impl BillPanel {
    pub fn from_bill(bill: Option<&BillData>) -> Option<Self> {
        let bill = bill?;
        Some(Self {
            shop_name: bill
                .shop_name
                .clone()
                .unwrap_or_else(|| "Unknown Shop".to_string()),
            items: bill.items.clone(),
            total: bill.total.clone().unwrap_or_else(|| "N/A".to_string()),
        })
    }

    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}
