//! Workbook Loader Module
//! Resolves the CSP, Services and Application sheets of a cost workbook,
//! validates them into typed records, and substitutes sample rows per table
//! when anything goes wrong.

use crate::data::model::{
    fallback_applications, fallback_csp, fallback_services, ApplicationSpend, CostDataset,
    CspSpend, LogicalTable, ServiceSpend,
};
use calamine::{open_workbook_auto, Data, Range, Reader};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Why a table (or the whole workbook) fell back to sample data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Workbook '{path}' is unavailable: {reason}")]
    WorkbookUnavailable { path: String, reason: String },
    #[error("{table} sheet not found. Available sheets: [{}]", .available_sheets.join(", "))]
    SheetMissing {
        table: LogicalTable,
        available_sheets: Vec<String>,
    },
    #[error("{table} sheet is missing required columns: {}", .missing_columns.join(", "))]
    SchemaMismatch {
        table: LogicalTable,
        missing_columns: Vec<String>,
    },
    #[error("{table} sheet has an invalid value in column '{column}' at row {row_index}")]
    InvalidValue {
        table: LogicalTable,
        row_index: usize,
        column: String,
    },
}

/// How one logical table's sheet is located in the workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetName {
    /// Case-sensitive exact sheet name.
    Exact(String),
    /// Case-insensitive alias set.
    AnyOf(Vec<String>),
}

impl SheetName {
    pub fn exact(name: &str) -> Self {
        SheetName::Exact(name.to_string())
    }

    pub fn any_of(aliases: &[&str]) -> Self {
        SheetName::AnyOf(aliases.iter().map(|a| a.to_lowercase()).collect())
    }

    pub fn matches(&self, sheet: &str) -> bool {
        match self {
            SheetName::Exact(name) => name == sheet,
            SheetName::AnyOf(aliases) => {
                let folded = sheet.to_lowercase();
                aliases.iter().any(|a| a.to_lowercase() == folded)
            }
        }
    }

    /// First sheet in workbook order that matches.
    pub fn resolve<'a>(&self, sheet_names: &'a [String]) -> Option<&'a str> {
        sheet_names
            .iter()
            .find(|s| self.matches(s))
            .map(|s| s.as_str())
    }
}

/// Sheet lookup rules for all three tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSpec {
    pub csp: SheetName,
    pub services: SheetName,
    pub application: SheetName,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            csp: SheetName::any_of(&["csp", "csps", "cloud service provider", "providers"]),
            services: SheetName::any_of(&["service", "services"]),
            application: SheetName::any_of(&["app", "application", "applications"]),
        }
    }
}

impl SheetSpec {
    /// Exact sheet names for every table.
    pub fn exact(csp: &str, services: &str, application: &str) -> Self {
        Self {
            csp: SheetName::exact(csp),
            services: SheetName::exact(services),
            application: SheetName::exact(application),
        }
    }

    pub fn for_table(&self, table: LogicalTable) -> &SheetName {
        match table {
            LogicalTable::Csp => &self.csp,
            LogicalTable::Services => &self.services,
            LogicalTable::Application => &self.application,
        }
    }
}

/// Where the rows of one table came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Workbook { sheet: String },
    Fallback,
}

impl TableSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, TableSource::Fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSources {
    pub csp: TableSource,
    pub services: TableSource,
    pub application: TableSource,
}

impl TableSources {
    fn all_fallback() -> Self {
        Self {
            csp: TableSource::Fallback,
            services: TableSource::Fallback,
            application: TableSource::Fallback,
        }
    }
}

/// Result of one load: always usable tables, plus why any of them are samples.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub dataset: CostDataset,
    pub sources: TableSources,
    pub diagnostics: Vec<LoadError>,
    /// Sheet names present in the workbook; empty if it could not be opened.
    pub available_sheets: Vec<String>,
}

impl LoadOutcome {
    fn unavailable(error: LoadError) -> Self {
        Self {
            dataset: CostDataset::fallback(),
            sources: TableSources::all_fallback(),
            diagnostics: vec![error],
            available_sheets: Vec::new(),
        }
    }

    pub fn source(&self, table: LogicalTable) -> &TableSource {
        match table {
            LogicalTable::Csp => &self.sources.csp,
            LogicalTable::Services => &self.sources.services,
            LogicalTable::Application => &self.sources.application,
        }
    }

    pub fn uses_fallback(&self) -> bool {
        LogicalTable::ALL
            .iter()
            .any(|t| self.source(*t).is_fallback())
    }

    /// Operator-facing notice, present whenever any table shows sample data.
    pub fn notice(&self) -> Option<String> {
        if !self.uses_fallback() {
            return None;
        }

        let mut lines: Vec<String> = self
            .diagnostics
            .iter()
            .map(|d| format!("Error reading Excel: {}", d))
            .collect();

        let fallback_tables: Vec<&str> = LogicalTable::ALL
            .iter()
            .filter(|t| self.source(**t).is_fallback())
            .map(|t| t.name())
            .collect();
        lines.push(format!(
            "Using sample data for demonstration: {}",
            fallback_tables.join(", ")
        ));

        Some(lines.join("\n"))
    }
}

/// Load all three tables from a workbook, falling back per table.
pub fn load_workbook(path: &Path, spec: &SheetSpec) -> LoadOutcome {
    let mut workbook = match open_workbook_auto(path) {
        Ok(wb) => wb,
        Err(e) => {
            let error = LoadError::WorkbookUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            };
            warn!(
                path = %path.display(),
                error = %error,
                "workbook unavailable, using sample data"
            );
            return LoadOutcome::unavailable(error);
        }
    };

    let available_sheets: Vec<String> = workbook.sheet_names().to_vec();
    let mut diagnostics = Vec::new();

    let mut read = |table: LogicalTable| -> Result<(String, Range<Data>), LoadError> {
        let sheet = spec
            .for_table(table)
            .resolve(&available_sheets)
            .ok_or_else(|| LoadError::SheetMissing {
                table,
                available_sheets: available_sheets.clone(),
            })?
            .to_string();
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| LoadError::WorkbookUnavailable {
                path: path.display().to_string(),
                reason: format!("failed to read sheet '{}': {}", sheet, e),
            })?;
        Ok((sheet, range))
    };

    let csp = read(LogicalTable::Csp).and_then(|(s, r)| Ok((s, parse_table::<CspSpend>(&r)?)));
    let services =
        read(LogicalTable::Services).and_then(|(s, r)| Ok((s, parse_table::<ServiceSpend>(&r)?)));
    let applications = read(LogicalTable::Application)
        .and_then(|(s, r)| Ok((s, parse_table::<ApplicationSpend>(&r)?)));

    let (csp, csp_source) = settle(csp, &mut diagnostics);
    let (services, services_source) = settle(services, &mut diagnostics);
    let (applications, application_source) = settle(applications, &mut diagnostics);

    LoadOutcome {
        dataset: CostDataset {
            csp,
            services,
            applications,
        },
        sources: TableSources {
            csp: csp_source,
            services: services_source,
            application: application_source,
        },
        diagnostics,
        available_sheets,
    }
}

/// Keep a loaded table or swap in its sample rows, recording the reason.
fn settle<T: SpendRecord>(
    result: Result<(String, Vec<T>), LoadError>,
    diagnostics: &mut Vec<LoadError>,
) -> (Vec<T>, TableSource) {
    match result {
        Ok((sheet, rows)) => {
            info!(table = %T::TABLE, sheet = %sheet, rows = rows.len(), "loaded table");
            (rows, TableSource::Workbook { sheet })
        }
        Err(e) => {
            warn!(table = %T::TABLE, error = %e, "using sample data");
            diagnostics.push(e);
            (T::fallback(), TableSource::Fallback)
        }
    }
}

/// A typed row of one logical table.
pub(crate) trait SpendRecord: Sized {
    const TABLE: LogicalTable;
    const REQUIRED: &'static [&'static str];
    /// Column reported when two rows share the same key.
    const KEY_COLUMN: &'static str;

    fn from_row(row: &RowReader<'_>) -> Result<Self, &'static str>;
    fn key(&self) -> String;
    fn fallback() -> Vec<Self>;
}

impl SpendRecord for CspSpend {
    const TABLE: LogicalTable = LogicalTable::Csp;
    const REQUIRED: &'static [&'static str] = &["CSP", "Spend"];
    const KEY_COLUMN: &'static str = "CSP";

    fn from_row(row: &RowReader<'_>) -> Result<Self, &'static str> {
        Ok(Self {
            provider: row.label("CSP")?,
            spend: row.spend("Spend")?,
            marketplace_spend: row.optional_spend("Marketplace")?,
        })
    }

    fn key(&self) -> String {
        self.provider.clone()
    }

    fn fallback() -> Vec<Self> {
        fallback_csp()
    }
}

impl SpendRecord for ServiceSpend {
    const TABLE: LogicalTable = LogicalTable::Services;
    const REQUIRED: &'static [&'static str] = &["Service", "Spend"];
    const KEY_COLUMN: &'static str = "Service";

    fn from_row(row: &RowReader<'_>) -> Result<Self, &'static str> {
        Ok(Self {
            service: row.label("Service")?,
            spend: row.spend("Spend")?,
            provider: row.optional_label("CSP"),
        })
    }

    fn key(&self) -> String {
        match &self.provider {
            Some(p) => format!("{}\u{1f}{}", self.service, p),
            None => self.service.clone(),
        }
    }

    fn fallback() -> Vec<Self> {
        fallback_services()
    }
}

impl SpendRecord for ApplicationSpend {
    const TABLE: LogicalTable = LogicalTable::Application;
    const REQUIRED: &'static [&'static str] = &["Application", "Spend"];
    const KEY_COLUMN: &'static str = "Application";

    fn from_row(row: &RowReader<'_>) -> Result<Self, &'static str> {
        Ok(Self {
            application: row.label("Application")?,
            spend: row.spend("Spend")?,
        })
    }

    fn key(&self) -> String {
        self.application.clone()
    }

    fn fallback() -> Vec<Self> {
        fallback_applications()
    }
}

/// One data row viewed through the sheet's header.
pub(crate) struct RowReader<'a> {
    columns: &'a HashMap<String, usize>,
    cells: &'a [Data],
}

impl<'a> RowReader<'a> {
    fn cell(&self, column: &str) -> Option<&'a Data> {
        self.columns.get(column).and_then(|&i| self.cells.get(i))
    }

    fn label(&self, column: &'static str) -> Result<String, &'static str> {
        self.optional_label(column).ok_or(column)
    }

    fn optional_label(&self, column: &str) -> Option<String> {
        self.cell(column).and_then(cell_text)
    }

    fn spend(&self, column: &'static str) -> Result<f64, &'static str> {
        self.cell(column).and_then(cell_spend).ok_or(column)
    }

    /// Absent column or blank cell is `None`; anything else must be a valid spend.
    fn optional_spend(&self, column: &'static str) -> Result<Option<f64>, &'static str> {
        match self.cell(column) {
            None => Ok(None),
            Some(cell) if is_blank(cell) => Ok(None),
            Some(cell) => cell_spend(cell).map(Some).ok_or(column),
        }
    }
}

/// Validate a sheet range into records of one table.
pub(crate) fn parse_table<T: SpendRecord>(range: &Range<Data>) -> Result<Vec<T>, LoadError> {
    let mut rows = range.rows();

    // First occurrence wins for duplicated headers
    let mut columns: HashMap<String, usize> = HashMap::new();
    if let Some(header) = rows.next() {
        for (i, cell) in header.iter().enumerate() {
            if let Some(name) = header_name(cell) {
                columns.entry(name).or_insert(i);
            }
        }
    }

    let missing_columns: Vec<String> = T::REQUIRED
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing_columns.is_empty() {
        return Err(LoadError::SchemaMismatch {
            table: T::TABLE,
            missing_columns,
        });
    }

    let mut records = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (row_index, cells) in rows.enumerate() {
        if cells.iter().all(is_blank) {
            continue;
        }

        let reader = RowReader {
            columns: &columns,
            cells,
        };
        let record = T::from_row(&reader).map_err(|column| LoadError::InvalidValue {
            table: T::TABLE,
            row_index,
            column: column.to_string(),
        })?;

        if !seen.insert(record.key()) {
            return Err(LoadError::InvalidValue {
                table: T::TABLE,
                row_index,
                column: T::KEY_COLUMN.to_string(),
            });
        }
        records.push(record);
    }

    Ok(records)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn header_name(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Data::Error(_) => None,
        other => Some(other.to_string()),
    }
}

/// Non-negative finite number, from a numeric cell or numeric text.
fn cell_spend(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::path::PathBuf;

    pub(crate) enum Cell<'a> {
        Text(&'a str),
        Num(f64),
        Blank,
    }

    use Cell::{Blank, Num, Text};

    pub(crate) fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<Cell<'_>>>)]) {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let sheet = workbook.add_worksheet().set_name(*name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    match cell {
                        Text(s) => {
                            sheet.write_string(r as u32, c as u16, *s).unwrap();
                        }
                        Num(n) => {
                            sheet.write_number(r as u32, c as u16, *n).unwrap();
                        }
                        Blank => {}
                    }
                }
            }
        }
        workbook.save(path).unwrap();
    }

    pub(crate) fn csp_sheet<'a>() -> Vec<Vec<Cell<'a>>> {
        vec![
            vec![Text("CSP"), Text("Spend"), Text("Marketplace")],
            vec![Text("AWS"), Num(100000.0), Num(15000.0)],
            vec![Text("Azure"), Num(75000.0), Num(12000.0)],
            vec![Text("GCP"), Num(50000.0), Num(8000.0)],
        ]
    }

    pub(crate) fn services_sheet<'a>() -> Vec<Vec<Cell<'a>>> {
        vec![
            vec![Text("Service"), Text("Spend")],
            vec![Text("Compute"), Num(50000.0)],
            vec![Text("Database"), Num(40000.0)],
            vec![Text("Storage"), Num(35000.0)],
        ]
    }

    pub(crate) fn application_sheet<'a>() -> Vec<Vec<Cell<'a>>> {
        vec![
            vec![Text("Application"), Text("Spend")],
            vec![Text("App1"), Num(40000.0)],
            vec![Text("App2"), Num(35000.0)],
            vec![Text("App3"), Num(30000.0)],
        ]
    }

    fn temp_workbook(dir: &tempfile::TempDir, sheets: &[(&str, Vec<Vec<Cell<'_>>>)]) -> PathBuf {
        let path = dir.path().join("costs.xlsx");
        write_workbook(&path, sheets);
        path
    }

    fn real_apps() -> Vec<Vec<Cell<'static>>> {
        vec![
            vec![Text("Application"), Text("Spend")],
            vec![Text("Billing"), Num(1200.0)],
            vec![Text("Search"), Num(800.0)],
        ]
    }

    #[test]
    fn test_happy_path_exact_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let spec = SheetSpec::exact("CSP", "Services", "Application");
        let outcome = load_workbook(&path, &spec);

        assert!(outcome.diagnostics.is_empty());
        assert!(!outcome.uses_fallback());
        assert!(outcome.notice().is_none());
        assert_eq!(outcome.dataset, CostDataset::fallback());
        assert_eq!(
            outcome.sources.csp,
            TableSource::Workbook {
                sheet: "CSP".to_string()
            }
        );
    }

    #[test]
    fn test_default_aliases_resolve_happy_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.available_sheets, vec!["CSP", "Services", "Application"]);
    }

    #[test]
    fn test_missing_file_falls_back_entirely() {
        let outcome = load_workbook(Path::new("/nonexistent/path.xlsx"), &SheetSpec::default());

        assert_eq!(outcome.dataset, CostDataset::fallback());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(matches!(
            outcome.diagnostics[0],
            LoadError::WorkbookUnavailable { .. }
        ));
        assert!(outcome.available_sheets.is_empty());
        for table in LogicalTable::ALL {
            assert!(outcome.source(table).is_fallback());
        }
        let notice = outcome.notice().unwrap();
        assert!(notice.contains("/nonexistent/path.xlsx"));
        assert!(notice.contains("Using sample data"));
    }

    #[test]
    fn test_alias_resolution_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                (
                    "cloud SERVICE provider",
                    vec![
                        vec![Text("CSP"), Text("Spend")],
                        vec![Text("OCI"), Num(4200.0)],
                    ],
                ),
                ("services", services_sheet()),
                ("APPS", application_sheet()),
            ],
        );

        let spec = SheetSpec {
            application: SheetName::any_of(&["apps"]),
            ..SheetSpec::default()
        };
        let outcome = load_workbook(&path, &spec);

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.dataset.csp, vec![CspSpend::new("OCI", 4200.0, None)]);
        assert_eq!(
            outcome.sources.csp,
            TableSource::Workbook {
                sheet: "cloud SERVICE provider".to_string()
            }
        );
    }

    #[test]
    fn test_exact_name_is_case_sensitive() {
        let names = vec!["csp".to_string(), "CSP".to_string()];
        assert_eq!(SheetName::exact("CSP").resolve(&names), Some("CSP"));
        assert_eq!(SheetName::exact("Csp").resolve(&names), None);
    }

    #[test]
    fn test_first_matching_sheet_wins() {
        let names = vec![
            "Summary".to_string(),
            "Providers".to_string(),
            "CSP".to_string(),
        ];
        assert_eq!(SheetSpec::default().csp.resolve(&names), Some("Providers"));
    }

    #[test]
    fn test_missing_sheet_only_affects_that_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                (
                    "CSP",
                    vec![
                        vec![Text("CSP"), Text("Spend"), Text("Marketplace")],
                        vec![Text("AWS"), Num(9.0), Num(1.0)],
                    ],
                ),
                ("Application", real_apps()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());

        assert_eq!(outcome.dataset.csp, vec![CspSpend::new("AWS", 9.0, Some(1.0))]);
        assert_eq!(outcome.dataset.applications[0].application, "Billing");
        assert_eq!(outcome.dataset.services, fallback_services());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::SheetMissing {
                table: LogicalTable::Services,
                available_sheets: vec!["CSP".to_string(), "Application".to_string()],
            }]
        );
        assert!(outcome.sources.services.is_fallback());
        assert!(!outcome.sources.application.is_fallback());
        assert!(outcome.uses_fallback());

        let notice = outcome.notice().unwrap();
        assert!(notice.contains("Services sheet not found. Available sheets: [CSP, Application]"));
        assert!(notice.ends_with("Using sample data for demonstration: Services"));
    }

    #[test]
    fn test_invalid_value_only_affects_that_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                (
                    "Services",
                    vec![
                        vec![Text("Service"), Text("Spend")],
                        vec![Text("Network"), Num(10.0)],
                    ],
                ),
                (
                    "Application",
                    vec![
                        vec![Text("Application"), Text("Spend")],
                        vec![Text("Billing"), Num(1200.0)],
                        vec![Text("Search"), Text("lots")],
                    ],
                ),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());

        assert_eq!(outcome.dataset.services, vec![ServiceSpend::new("Network", 10.0)]);
        assert_eq!(outcome.dataset.applications, fallback_applications());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::InvalidValue {
                table: LogicalTable::Application,
                row_index: 1,
                column: "Spend".to_string(),
            }]
        );
        assert!(!outcome.sources.csp.is_fallback());
        assert!(!outcome.sources.services.is_fallback());
    }

    #[test]
    fn test_schema_mismatch_reports_missing_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", vec![vec![Text("Provider"), Text("Cost")]]),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::SchemaMismatch {
                table: LogicalTable::Csp,
                missing_columns: vec!["CSP".to_string(), "Spend".to_string()],
            }]
        );
        assert_eq!(outcome.dataset.csp, fallback_csp());
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                (
                    "Services",
                    vec![
                        vec![Text("service"), Text("Spend")],
                        vec![Text("Compute"), Num(1.0)],
                    ],
                ),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(matches!(
            &outcome.diagnostics[..],
            [LoadError::SchemaMismatch { table: LogicalTable::Services, missing_columns }]
                if missing_columns == &vec!["Service".to_string()]
        ));
    }

    #[test]
    fn test_extra_columns_and_blank_rows_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                (
                    "Services",
                    vec![
                        vec![Text("Notes"), Text("Service"), Text("Spend"), Text("CSP")],
                        vec![Text("n/a"), Text("Compute"), Text(" 1500.5 "), Text("AWS")],
                        vec![Blank, Blank, Blank, Blank],
                        vec![Blank, Text("Compute"), Num(700.0), Text("GCP")],
                    ],
                ),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(
            outcome.dataset.services,
            vec![
                ServiceSpend::new("Compute", 1500.5).with_provider("AWS"),
                ServiceSpend::new("Compute", 700.0).with_provider("GCP"),
            ]
        );
    }

    #[test]
    fn test_negative_spend_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                (
                    "CSP",
                    vec![
                        vec![Text("CSP"), Text("Spend"), Text("Marketplace")],
                        vec![Text("AWS"), Num(10.0), Num(-1.0)],
                    ],
                ),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::InvalidValue {
                table: LogicalTable::Csp,
                row_index: 0,
                column: "Marketplace".to_string(),
            }]
        );
    }

    #[test]
    fn test_blank_marketplace_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                (
                    "CSP",
                    vec![
                        vec![Text("CSP"), Text("Spend"), Text("Marketplace")],
                        vec![Text("AWS"), Num(10.0), Blank],
                        vec![Text("GCP"), Num(5.0), Num(2.0)],
                    ],
                ),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.dataset.csp[0].marketplace_spend, None);
        assert_eq!(outcome.dataset.csp[1].marketplace_spend, Some(2.0));
    }

    #[test]
    fn test_duplicate_provider_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                (
                    "CSP",
                    vec![
                        vec![Text("CSP"), Text("Spend")],
                        vec![Text("AWS"), Num(10.0)],
                        vec![Text("AWS"), Num(5.0)],
                    ],
                ),
                ("Services", services_sheet()),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::InvalidValue {
                table: LogicalTable::Csp,
                row_index: 1,
                column: "CSP".to_string(),
            }]
        );
    }

    #[test]
    fn test_empty_sheet_is_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                ("Services", services_sheet()),
                ("Application", vec![]),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert_eq!(
            outcome.diagnostics,
            vec![LoadError::SchemaMismatch {
                table: LogicalTable::Application,
                missing_columns: vec!["Application".to_string(), "Spend".to_string()],
            }]
        );
    }

    #[test]
    fn test_header_only_sheet_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", csp_sheet()),
                ("Services", vec![vec![Text("Service"), Text("Spend")]]),
                ("Application", application_sheet()),
            ],
        );

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(outcome.diagnostics.is_empty());
        assert!(outcome.dataset.services.is_empty());
    }

    #[test]
    fn test_malformed_workbook_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_workbook(
            &dir,
            &[
                ("CSP", vec![vec![Text("CSP")]]),
                (
                    "Application",
                    vec![
                        vec![Text("Application"), Text("Spend")],
                        vec![Text(""), Num(3.0)],
                    ],
                ),
            ],
        );

        let first = load_workbook(&path, &SheetSpec::default());
        let second = load_workbook(&path, &SheetSpec::default());

        let messages = |o: &LoadOutcome| -> Vec<String> {
            o.diagnostics.iter().map(|d| d.to_string()).collect()
        };
        assert_eq!(messages(&first), messages(&second));
        assert_eq!(first.notice(), second.notice());
        assert_eq!(first.dataset, second.dataset);
        assert_eq!(first.dataset, CostDataset::fallback());
        assert_eq!(first.diagnostics.len(), 3);
    }

    #[test]
    fn test_non_workbook_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.xlsx");
        std::fs::write(&path, b"not a spreadsheet").unwrap();

        let outcome = load_workbook(&path, &SheetSpec::default());
        assert!(matches!(
            &outcome.diagnostics[..],
            [LoadError::WorkbookUnavailable { .. }]
        ));
        assert_eq!(outcome.dataset, CostDataset::fallback());
    }

    #[test]
    fn test_cell_spend_parsing() {
        assert_eq!(cell_spend(&Data::Int(12)), Some(12.0));
        assert_eq!(cell_spend(&Data::Float(0.5)), Some(0.5));
        assert_eq!(cell_spend(&Data::String(" 42 ".to_string())), Some(42.0));
        assert_eq!(cell_spend(&Data::String("$42".to_string())), None);
        assert_eq!(cell_spend(&Data::String("NaN".to_string())), None);
        assert_eq!(cell_spend(&Data::Float(-3.0)), None);
        assert_eq!(cell_spend(&Data::Empty), None);
        assert_eq!(cell_spend(&Data::Bool(true)), None);
    }
}
