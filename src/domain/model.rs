use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// A time-of-day with no calendar day attached.
    Time(NaiveTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the cell the way a spreadsheet user would read it back.
    /// Integral numbers drop their fractional part.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(true) => "True".to_string(),
            CellValue::Bool(false) => "False".to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Time(t) => t.format("%H:%M:%S").to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub cells: Vec<CellValue>,
}

impl RawRow {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Out-of-range columns read as empty.
    pub fn get(&self, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(col).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_empty)
    }
}

/// The sheet as read: one header per column (`None` for non-text headers)
/// and the data rows beneath the header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<Option<String>>,
    pub rows: Vec<RawRow>,
}

/// Column positions resolved from the normalized header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSchema {
    pub date: usize,
    pub sta: usize,
    pub ata: usize,
    pub std: Option<usize>,
    pub atd: Option<usize>,
    pub flight_no: usize,
    pub registration: usize,
    pub aircraft: usize,
    pub work_order: usize,
    pub engineer: usize,
    pub technician: usize,
    pub remarks: usize,
    /// Columns scanned for the checkmark glyph, paired with their service label.
    pub service_flags: Vec<(usize, String)>,
}

/// Report section a row is filed under. Declaration order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Transit,
    OnCallEngineer,
    Canceled,
    OnCallRecorded,
    Other,
}

impl Category {
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Transit => "1_TRANSIT",
            Category::OnCallEngineer => "2_ONCALL_ENGINEER",
            Category::Canceled => "3_CANCELED",
            Category::OnCallRecorded => "4_ONCALL_RECORDED",
            Category::Other => "5_OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

pub const OUTPUT_COLUMNS: [&str; 16] = [
    "WO#",
    "Station",
    "Customer",
    "Flight No.",
    "Registration Code",
    "Aircraft",
    "Date",
    "STA.",
    "ATA.",
    "STD.",
    "ATD.",
    "Is Canceled",
    "Services",
    "Employees",
    "Remarks",
    "Comments",
];

pub const DATE_FORMAT: &str = "%m/%d/%Y";
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub work_order: CellValue,
    pub station: String,
    pub customer: String,
    pub flight_no: CellValue,
    pub registration: CellValue,
    pub aircraft: CellValue,
    pub date: Option<NaiveDate>,
    pub sta: Option<NaiveDateTime>,
    pub ata: Option<NaiveDateTime>,
    pub std: Option<NaiveDateTime>,
    pub atd: Option<NaiveDateTime>,
    pub is_canceled: bool,
    pub services: Option<String>,
    pub category: Category,
    pub employees: String,
    pub remarks: String,
    pub comments: String,
}

impl NormalizedRow {
    pub fn formatted_date(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }

    pub fn formatted_timestamps(&self) -> [Option<String>; 4] {
        [self.sta, self.ata, self.std, self.atd]
            .map(|ts| ts.map(|ts| ts.format(TIMESTAMP_FORMAT).to_string()))
    }

    /// Cells in `OUTPUT_COLUMNS` order.
    pub fn output_cells(&self) -> Vec<CellValue> {
        let text_or_empty = |s: Option<String>| s.map(CellValue::Text).unwrap_or_default();
        let [sta, ata, std, atd] = self.formatted_timestamps();

        vec![
            self.work_order.clone(),
            CellValue::Text(self.station.clone()),
            CellValue::Text(self.customer.clone()),
            self.flight_no.clone(),
            self.registration.clone(),
            self.aircraft.clone(),
            text_or_empty(self.formatted_date()),
            text_or_empty(sta),
            text_or_empty(ata),
            text_or_empty(std),
            text_or_empty(atd),
            CellValue::Bool(self.is_canceled),
            text_or_empty(self.services.clone()),
            CellValue::Text(self.employees.clone()),
            CellValue::Text(self.remarks.clone()),
            CellValue::Text(self.comments.clone()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<NormalizedRow>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
