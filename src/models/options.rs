//! Allowed-value tables for the enumerated submission fields.
//!
//! Each table pairs the stored value with the label shown in pickers. The
//! form schema validates against these tables; the UI renders them as
//! `<select>` options.

use serde::Serialize;

/// A stored value and its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

pub const URGENCY_OPTIONS: &[SelectOption] = &[
    opt("non-urgent", "Non-Urgent"),
    opt("urgent", "Urgent"),
    opt("e-signature", "E-Signature"),
    opt("revision(edc)", "Revision (EDC)"),
    opt("revision(bufu)", "Revision (BU/FU)"),
];

pub const DOCUMENT_TYPE_OPTIONS: &[SelectOption] = &[
    opt("1", "Costing Calculation Sheet"),
    opt("2", "Purchase Requisition Form General"),
    opt("3", "Price List"),
    opt("4", "Training Bond Agreement"),
    opt("5", "Letter to Calmette"),
    opt("6", "Quotation to Customer"),
    opt("7", "Expenses Exception Request Form"),
    opt("8", "Stock Adjustment"),
    opt("9", "Others"),
];

pub const BU_FU_OPTIONS: &[SelectOption] = &[
    opt("fbit", "FBIT"),
    opt("fceg", "FCEG"),
    opt("fhrf", "FHRF"),
    opt("fsco", "FSCO"),
    opt("TSS", "TSS"),
    opt("chs", "CHS"),
    opt("cps", "CPS"),
    opt("sts", "STS"),
    opt("dcc", "DCC"),
    opt("fcfa", "FCFA"),
    opt("fcmt", "FCMT"),
    opt("fprm", "FPRM"),
    opt("edc", "EDC"),
    opt("fdcm", "FDCM"),
];

/// Exact, case-sensitive membership test.
pub fn is_allowed(options: &[SelectOption], value: &str) -> bool {
    options.iter().any(|o| o.value == value)
}

/// Label for a stored value, falling back to the value itself.
pub fn label_for<'a>(options: &[SelectOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|o| o.value == value)
        .map(|o| o.label)
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_sensitive() {
        assert!(is_allowed(URGENCY_OPTIONS, "urgent"));
        assert!(!is_allowed(URGENCY_OPTIONS, "Urgent"));
        assert!(is_allowed(BU_FU_OPTIONS, "TSS"));
        assert!(!is_allowed(BU_FU_OPTIONS, "tss"));
        assert!(!is_allowed(DOCUMENT_TYPE_OPTIONS, "contract"));
    }

    #[test]
    fn test_label_lookup() {
        assert_eq!(label_for(DOCUMENT_TYPE_OPTIONS, "8"), "Stock Adjustment");
        assert_eq!(label_for(URGENCY_OPTIONS, "revision(bufu)"), "Revision (BU/FU)");
        assert_eq!(label_for(URGENCY_OPTIONS, "unknown"), "unknown");
    }

    #[test]
    fn test_values_are_unique() {
        for table in [URGENCY_OPTIONS, DOCUMENT_TYPE_OPTIONS, BU_FU_OPTIONS] {
            let mut values: Vec<_> = table.iter().map(|o| o.value).collect();
            values.sort();
            values.dedup();
            assert_eq!(values.len(), table.len());
        }
    }
}
