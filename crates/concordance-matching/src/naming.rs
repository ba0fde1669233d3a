//! Canonical names, labels and type descriptions

use concordance_ir::StructuralPath;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("static regex must compile"));

/// Abbreviations used in element names and their expansions
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Amt", "Amount"),
    ("Ind", "Indicator"),
    ("Cnt", "Count"),
    ("Dt", "Date"),
    ("Txt", "Text"),
    ("Nm", "Name"),
    ("Cd", "Code"),
    ("Grp", "Group"),
    ("Prsn", "Person"),
    ("Org", "Organization"),
    ("Cmpnstn", "Compensation"),
    ("Rltd", "Related"),
    ("Offcr", "Officer"),
    ("Trst", "Trust"),
    ("Empl", "Employee"),
    ("Fndrsng", "Fundraising"),
    ("Rvn", "Revenue"),
    ("Expns", "Expense"),
    ("Bsnss", "Business"),
    ("Strt", "Street"),
    ("Addrss", "Address"),
    ("Ttl", "Total"),
    ("Prtcl", "Protocol"),
    ("Dfrrd", "Deferred"),
    ("Nntxbl", "Nontaxable"),
    ("Bnfts", "Benefits"),
    ("Flng", "Filing"),
    ("Orgnztn", "Organization"),
    ("Cntrbtn", "Contribution"),
    ("Prgrm", "Program"),
    ("Srvcs", "Services"),
    ("Gvrnng", "Governing"),
    ("Mmbr", "Member"),
    ("Schdl", "Schedule"),
    ("Intrstd", "Interested"),
    ("Prty", "Party"),
    ("Trnsctn", "Transaction"),
];

/// Declared schema types and their plain-English rendering
const TYPE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("BooleanType", "Yes/No"),
    ("CheckboxType", "Checkbox (X if checked)"),
    ("USAmountType", "Dollar amount (USD)"),
    ("USAmountNNType", "Dollar amount, non-negative (USD)"),
    ("IntegerType", "Whole number"),
    ("IntegerNNType", "Whole number, non-negative"),
    ("LargeRatioType", "Ratio / percentage"),
    ("RatioType", "Ratio / percentage"),
    ("DecimalType", "Decimal number"),
    ("LineExplanationType", "Free-text explanation"),
    ("ExplanationType", "Free-text explanation"),
    ("ShortExplanationType", "Short free-text explanation"),
    ("ShortDescriptionType", "Short description"),
    ("PersonNameType", "Person name"),
    ("BusinessNameType", "Organization name"),
    ("BusinessNameLine1Type", "Organization name (line 1)"),
    ("BusinessNameLine2Type", "Organization name (line 2)"),
    ("BusinessNameLine1Txt", "Organization name (line 1)"),
    ("EINType", "Employer Identification Number"),
    ("SSNType", "Social Security Number"),
    ("YearType", "Four-digit year"),
    ("DateType", "Date"),
    ("TimestampType", "Date and time"),
    ("PhoneNumberType", "Phone number"),
    ("ZIPCodeType", "ZIP code"),
    ("StateType", "US state abbreviation"),
    ("CountryType", "Country code"),
    ("StringType", "Text"),
    ("StreetAddressType", "Street address"),
    ("CityType", "City name"),
    ("CountType", "Count (whole number)"),
];

/// Insert a space wherever a lowercase letter is followed by an uppercase one
pub fn split_camel_case(name: &str) -> String {
    CAMEL_BOUNDARY.replace_all(name, "${1} ${2}").into_owned()
}

fn expand_word(word: &str) -> String {
    let stem = word.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &word[stem.len()..];
    match ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == stem) {
        Some((_, full)) => format!("{full}{digits}"),
        None => word.to_string(),
    }
}

/// Plain-English label for an element name:
/// `TotalRevenueAmt` → `Total Revenue Amount`
pub fn human_label(element_name: &str) -> String {
    split_camel_case(element_name)
        .split_whitespace()
        .map(expand_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Friendly rendering of a declared type, or the type itself when unknown
pub fn friendly_type(xsd_type: &str) -> String {
    TYPE_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == xsd_type)
        .map_or_else(|| xsd_type.to_string(), |(_, desc)| (*desc).to_string())
}

/// Description used when the schema documents nothing:
/// `/IRS990/OfficerGrp/PersonNm` → `Person Nm (within Officer Grp)`
pub fn infer_description(path: &StructuralPath) -> String {
    match (path.leaf(), path.context()) {
        (Some(leaf), Some(context)) => format!(
            "{} (within {})",
            split_camel_case(leaf),
            split_camel_case(context)
        ),
        (Some(leaf), None) => leaf.to_string(),
        _ => String::new(),
    }
}

/// Base canonical name: the schedule followed by every path segment below
/// the schedule root, joined by underscores
pub fn canonical_base_name(schedule: &str, path: &StructuralPath) -> String {
    let segments = path.segments();
    let tail = match segments.first() {
        Some(first) if first == schedule => &segments[1..],
        _ => segments,
    };
    if tail.is_empty() {
        return schedule.to_string();
    }
    format!("{schedule}_{}", tail.join("_"))
}

/// Hands out unique canonical names in request order
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `base`, or the first free `base_2`, `base_3`, …
    pub fn allocate(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
