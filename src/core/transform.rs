//! Row transformation for the Daily Operations Report.
//!
//! Turns the raw sheet (banner rows already skipped) into the normalized
//! flight table: headers are cleaned, date/time cells are combined into
//! timestamps, service flags and remarks become labels, rows are grouped by
//! report section and the final sixteen-column projection is built.

use crate::domain::model::{
    CellValue, Category, NormalizedRow, RawRow, RawTable, ReportSchema, Table,
};
use crate::domain::ports::ServiceScan;
use crate::utils::error::{FormatterError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::cmp::Ordering;

pub const CHECKMARK: &str = "√";
pub const DEFAULT_STATION: &str = "KKIA";

const HEADER_RENAMES: [(&str, &str); 2] = [("REG.", "REG"), ("TECH.\nSUPT", "TECH. SUPT")];

const ON_CALL_ENGINEER: &str = "ON CALL - NEEDED ENGINEER SUPPORT";
const CANCELED_WITHOUT_NOTICE: &str = "CANCELED WITHOUT NOTICE";
const ON_CALL: &str = "ON CALL";
const TRANSIT: &str = "TRANSIT";
const CANCELED: &str = "CANCELED";

mod columns {
    pub const DATE: &str = "DATE";
    pub const STA: &str = "STA";
    pub const ATA: &str = "ATA";
    pub const STD: &str = "STD";
    pub const ATD: &str = "ATD";
    pub const FLIGHT_NO: &str = "FLT NO.";
    pub const REGISTRATION: &str = "REG";
    pub const AIRCRAFT: &str = "A/C TYPES";
    pub const WORK_ORDER: &str = "W/O";
    pub const ENGINEER: &str = "ENGR";
    pub const TECHNICIAN: &str = "TECH";
    pub const REMARKS: &str = "OTHER SERVICES/REMARKS";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub station: String,
    pub service_scan: ServiceScan,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            station: DEFAULT_STATION.to_string(),
            service_scan: ServiceScan::AllColumns,
        }
    }
}

pub struct RowTransformer {
    options: TransformOptions,
}

impl RowTransformer {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn process(&self, raw: RawTable) -> Result<Table> {
        let RawTable { headers, rows } = raw;

        let total = rows.len();
        let rows: Vec<RawRow> = rows.into_iter().filter(|row| !row.is_blank()).collect();
        if rows.len() < total {
            tracing::debug!("Dropped {} blank rows", total - rows.len());
        }

        let headers: Vec<Option<String>> = headers
            .iter()
            .map(|h| h.as_deref().map(normalize_header))
            .collect();
        let schema = resolve_schema(&headers, &self.options.service_scan)?;
        tracing::debug!("Resolved report schema: {:?}", schema);

        let mut normalized: Vec<NormalizedRow> = rows
            .iter()
            .map(|row| self.normalize_row(row, &schema))
            .collect();

        // sort_by is stable
        normalized.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| compare_missing_last(&a.sta, &b.sta))
        });

        Ok(Table { rows: normalized })
    }

    fn normalize_row(&self, row: &RawRow, schema: &ReportSchema) -> NormalizedRow {
        let date = row.get(schema.date);
        let optional_timestamp =
            |col: Option<usize>| col.and_then(|c| combine_date_time(date, row.get(c)));
        let remarks = row.get(schema.remarks);

        NormalizedRow {
            work_order: row.get(schema.work_order).clone(),
            station: self.options.station.clone(),
            customer: customer_code(row.get(schema.flight_no)),
            flight_no: row.get(schema.flight_no).clone(),
            registration: row.get(schema.registration).clone(),
            aircraft: row.get(schema.aircraft).clone(),
            date: parse_date(date),
            sta: combine_date_time(date, row.get(schema.sta)),
            ata: combine_date_time(date, row.get(schema.ata)),
            std: optional_timestamp(schema.std),
            atd: optional_timestamp(schema.atd),
            is_canceled: is_canceled(remarks),
            services: extract_services(row, schema),
            category: categorize(&remark_text(remarks)),
            employees: merge_employees(row.get(schema.engineer), row.get(schema.technician)),
            remarks: String::new(),
            comments: String::new(),
        }
    }
}

fn compare_missing_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Trims the header and applies the fixed renames.
pub fn normalize_header(header: &str) -> String {
    let trimmed = header.trim();
    HEADER_RENAMES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Resolves column positions from already-normalized headers.
/// The first column carrying a name wins.
pub fn resolve_schema(headers: &[Option<String>], scan: &ServiceScan) -> Result<ReportSchema> {
    let find = |name: &str| headers.iter().position(|h| h.as_deref() == Some(name));
    let require = |name: &str| {
        find(name).ok_or_else(|| FormatterError::MissingColumn {
            column: name.to_string(),
        })
    };

    let service_flags = match scan {
        ServiceScan::AllColumns => headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| h.as_deref().map(|h| (idx, title_case(h.trim()))))
            .collect(),
        ServiceScan::Columns(names) => names
            .iter()
            .filter_map(|name| find(name.as_str()).map(|idx| (idx, title_case(name.trim()))))
            .collect(),
    };

    Ok(ReportSchema {
        date: require(columns::DATE)?,
        sta: require(columns::STA)?,
        ata: require(columns::ATA)?,
        std: find(columns::STD),
        atd: find(columns::ATD),
        flight_no: require(columns::FLIGHT_NO)?,
        registration: require(columns::REGISTRATION)?,
        aircraft: require(columns::AIRCRAFT)?,
        work_order: require(columns::WORK_ORDER)?,
        engineer: require(columns::ENGINEER)?,
        technician: require(columns::TECHNICIAN)?,
        remarks: require(columns::REMARKS)?,
        service_flags,
    })
}

/// Calendar day of a `DATE` cell.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => {
            let s = s.trim();
            ["%Y-%m-%d", "%m/%d/%Y"]
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|dt| dt.date())
                })
        }
        _ => None,
    }
}

/// Time-of-day from a text (`HH:MM`, then `HH:MM:SS`) or native time cell.
pub fn parse_time_of_day(cell: &CellValue) -> Option<NaiveTime> {
    match cell {
        // chrono skips whitespace before numeric fields
        CellValue::Text(s) if s.contains(char::is_whitespace) => None,
        CellValue::Text(s) => NaiveTime::parse_from_str(s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
            .ok(),
        CellValue::Time(t) => Some(*t),
        _ => None,
    }
}

/// Combines the report day with a time cell, seconds forced to zero.
pub fn combine_date_time(date: &CellValue, raw_time: &CellValue) -> Option<NaiveDateTime> {
    if date.is_empty() || raw_time.is_empty() {
        return None;
    }
    let time = parse_time_of_day(raw_time)?
        .with_second(0)?
        .with_nanosecond(0)?;
    Some(parse_date(date)?.and_time(time))
}

/// `MM/DD/YYYY HH:MM:SS` rendering of [`combine_date_time`].
pub fn format_datetime(date: &CellValue, raw_time: &CellValue) -> Option<String> {
    combine_date_time(date, raw_time)
        .map(|dt| dt.format(crate::domain::model::TIMESTAMP_FORMAT).to_string())
}

pub fn customer_code(flight_no: &CellValue) -> String {
    flight_no.to_text().trim().chars().take(2).collect()
}

fn remark_text(cell: &CellValue) -> String {
    cell.to_text().to_uppercase()
}

/// Label derived from the remarks; the three matches are exclusive.
pub fn remark_service_label(remarks_upper: &str) -> Option<&'static str> {
    if remarks_upper.contains(ON_CALL_ENGINEER) {
        Some("On call - needed engineer support")
    } else if remarks_upper.contains(CANCELED_WITHOUT_NOTICE) {
        Some("Canceled without notice")
    } else if remarks_upper.contains(ON_CALL) {
        Some("Per landing")
    } else {
        None
    }
}

pub fn extract_services(row: &RawRow, schema: &ReportSchema) -> Option<String> {
    let mut services: Vec<String> = schema
        .service_flags
        .iter()
        .filter(|(col, _)| row.get(*col).as_str().map(str::trim) == Some(CHECKMARK))
        .map(|(_, label)| label.clone())
        .collect();

    if let Some(label) = remark_service_label(&remark_text(row.get(schema.remarks))) {
        services.push(label.to_string());
    }

    if services.is_empty() {
        None
    } else {
        Some(services.join(", "))
    }
}

/// Only text remarks can mark a flight canceled.
pub fn is_canceled(remarks: &CellValue) -> bool {
    remarks
        .as_str()
        .map(|s| s.to_uppercase().contains(CANCELED))
        .unwrap_or(false)
}

pub fn categorize(remarks_upper: &str) -> Category {
    if remarks_upper.contains(TRANSIT) {
        Category::Transit
    } else if remarks_upper.contains(ON_CALL_ENGINEER) {
        Category::OnCallEngineer
    } else if remarks_upper.contains(CANCELED_WITHOUT_NOTICE) {
        Category::Canceled
    } else if remarks_upper.contains(ON_CALL) {
        Category::OnCallRecorded
    } else {
        Category::Other
    }
}

/// Staff number in an `ENGR`/`TECH` cell: digits with at most one decimal
/// point, truncated to an integer. Anything else counts as absent.
pub fn employee_id(cell: &CellValue) -> Option<u64> {
    match cell {
        CellValue::Number(n) => {
            // negatives, exponent notation and non-finite values never render as plain digits
            let plain = (*n == 0.0 && n.is_sign_positive()) || (*n >= 1e-4 && *n < 1e16);
            if n.is_finite() && plain {
                Some(n.trunc() as u64)
            } else {
                None
            }
        }
        CellValue::Text(s) => {
            let digits = s.replacen('.', "", 1);
            if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            let whole = s.split('.').next().unwrap_or_default();
            if whole.is_empty() {
                Some(0)
            } else {
                whole.parse().ok()
            }
        }
        _ => None,
    }
}

/// Joins the engineer and technician numbers, engineer first.
pub fn merge_employees(engineer: &CellValue, technician: &CellValue) -> String {
    match (employee_id(engineer), employee_id(technician)) {
        (Some(e), Some(t)) => format!("{}, {}", e, t),
        (Some(e), None) => e.to_string(),
        (None, Some(t)) => t.to_string(),
        (None, None) => String::new(),
    }
}

/// Word-initial capitalization: a letter is upper-cased when the preceding
/// character is not a letter, lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_cased = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }
    out
}
