//! Display titles for known schedules

/// Schedule id → section title
pub const KNOWN_FORMS: &[(&str, &str)] = &[
    ("IRS990", "Form 990 (Full)"),
    ("IRS990EZ", "Form 990-EZ (Short)"),
    ("IRS990PF", "Form 990-PF (Private Foundation)"),
    ("IRS990T", "Form 990-T (Exempt Organization Business Income Tax)"),
    ("IRS990TScheduleA", "Form 990-T Schedule A (Unrelated Business Taxable Income)"),
    ("IRS990ScheduleA", "Schedule A – Public Charity Status and Public Support"),
    ("IRS990ScheduleB", "Schedule B – Contributors (Restricted)"),
    ("IRS990ScheduleC", "Schedule C – Political Campaign and Lobbying Activities"),
    ("IRS990ScheduleD", "Schedule D – Supplemental Financial Statements"),
    ("IRS990ScheduleE", "Schedule E – Schools"),
    ("IRS990ScheduleF", "Schedule F – Activities Outside the United States"),
    ("IRS990ScheduleG", "Schedule G – Fundraising and Gaming Activities"),
    ("IRS990ScheduleH", "Schedule H – Hospitals"),
    ("IRS990ScheduleI", "Schedule I – Grants and Other Assistance (Domestic)"),
    ("IRS990ScheduleJ", "Schedule J – Compensation Information"),
    ("IRS990ScheduleK", "Schedule K – Tax-Exempt Bonds"),
    ("IRS990ScheduleL", "Schedule L – Transactions with Interested Persons"),
    ("IRS990ScheduleM", "Schedule M – Noncash Contributions"),
    (
        "IRS990ScheduleN",
        "Schedule N – Liquidation, Termination, Dissolution, or Significant Disposition of Assets",
    ),
    ("IRS990ScheduleO", "Schedule O – Supplemental Information"),
    ("IRS990ScheduleR", "Schedule R – Related Organizations and Unrelated Partnerships"),
    ("ReturnHeader", "Return Header (Filing Metadata)"),
    // Related tax forms attached to returns
    ("IRS4562", "Form 4562 – Depreciation and Amortization"),
    ("IRS4136", "Form 4136 – Credit for Federal Tax Paid on Fuels"),
    ("IRS3800", "Form 3800 – General Business Credit"),
    ("IRS8949", "Form 8949 – Sales and Dispositions of Capital Assets"),
    ("IRS1041ScheduleD", "Form 1041 Schedule D – Capital Gains and Losses"),
    ("IRS1041ScheduleI", "Form 1041 Schedule I – Alternative Minimum Tax"),
    ("IRS1120ScheduleD", "Form 1120 Schedule D – Capital Gains and Losses"),
    // Dependency statements
    ("ExpenditureResponsibilityStmt", "Expenditure Responsibility Statement"),
    ("TransfersToControlledEntities", "Transfers to Controlled Entities Schedule"),
    ("TransfersFrmControlledEntities", "Transfers from Controlled Entities Schedule"),
    ("LoansFromOfficersSchedule", "Loans from Officers Schedule"),
    ("MortgagesAndNotesPayableSch", "Mortgages and Notes Payable Schedule"),
    ("OtherNotesLoansRcvblLongSch", "Other Notes/Loans Receivable (Long) Schedule"),
    ("AffiliateListing", "Affiliate Listing"),
    ("CompensationExplanation", "Compensation Explanation"),
    ("ContractorCompensationExpln", "Contractor Compensation Explanation"),
    ("AmortizationSchedule", "Amortization Schedule"),
    ("GainLossSaleOtherAssetsSch", "Gain/Loss from Sale of Other Assets Schedule"),
    ("AccountingFeesSchedule", "Accounting Fees Schedule"),
    ("TaxesSchedule", "Taxes Schedule"),
    ("OtherExpensesSchedule", "Other Expenses Schedule"),
    ("InvestmentsCorpStockSchedule", "Investments – Corporate Stock Schedule"),
    ("InvestmentsOtherSchedule2", "Investments – Other Schedule"),
    ("OtherIncreasesSchedule", "Other Increases Schedule"),
    ("OtherDecreasesSchedule", "Other Decreases Schedule"),
    ("LegalFeesSchedule", "Legal Fees Schedule"),
    ("DepreciationSchedule", "Depreciation Schedule"),
    ("OtherAssetsSchedule", "Other Assets Schedule"),
    ("OtherLiabilitiesSchedule", "Other Liabilities Schedule"),
    ("ActyNotPreviouslyRptExpln", "Activities Not Previously Reported Explanation"),
];

/// Section title for `schedule`, falling back to the schedule id itself
pub fn schedule_title(schedule: &str) -> &str {
    KNOWN_FORMS
        .iter()
        .find(|(id, _)| *id == schedule)
        .map_or(schedule, |(_, title)| title)
}
