use calamine::{Data, Reader, Xlsx};
use flight_formatter::domain::model::OUTPUT_COLUMNS;
use flight_formatter::{EtlEngine, FormatterError, LocalStorage, ReportPipeline, Settings};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use tempfile::TempDir;

const HEADERS: [&str; 16] = [
    "DATE",
    "STA",
    "ATA",
    "STD",
    "ATD",
    " FLT NO. ",
    "REG.",
    "A/C TYPES",
    "W/O",
    "HEAD SET",
    "DAILY CK",
    "WKLY CK",
    "TECH.\nSUPT",
    "ENGR",
    "TECH",
    "OTHER SERVICES/REMARKS",
];

/// One report line: text cells by column index, plus optional engineer/technician numbers.
struct Line<'a> {
    sta: &'a str,
    flight: &'a str,
    work_order: f64,
    flags: &'a [usize],
    engineer: Option<f64>,
    technician: Option<f64>,
    remarks: &'a str,
}

fn write_report(path: &Path, lines: &[Line]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let time_format = Format::new().set_num_format("hh:mm");
    let day = ExcelDateTime::from_ymd(2024, 3, 5).unwrap();
    let departure = ExcelDateTime::from_hms(23, 10, 30).unwrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Daily Operations Report").unwrap();
    worksheet.write_string(0, 0, "SAUDIA TECHNIC").unwrap();
    worksheet.write_string(1, 0, "DAILY OPERATIONS REPORT").unwrap();
    worksheet.write_string(2, 0, "STATION: KKIA").unwrap();

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(4, col as u16, *header).unwrap();
    }

    for (idx, line) in lines.iter().enumerate() {
        let row = 5 + idx as u32;
        worksheet.write_datetime_with_format(row, 0, &day, &date_format).unwrap();
        if !line.sta.is_empty() {
            worksheet.write_string(row, 1, line.sta).unwrap();
        }
        worksheet.write_datetime_with_format(row, 3, &departure, &time_format).unwrap();
        worksheet.write_string(row, 5, line.flight).unwrap();
        worksheet.write_string(row, 6, "HZ-AK11").unwrap();
        worksheet.write_string(row, 7, "B777").unwrap();
        worksheet.write_number(row, 8, line.work_order).unwrap();
        for col in line.flags {
            worksheet.write_string(row, *col as u16, "√").unwrap();
        }
        if let Some(engineer) = line.engineer {
            worksheet.write_number(row, 13, engineer).unwrap();
        }
        if let Some(technician) = line.technician {
            worksheet.write_number(row, 14, technician).unwrap();
        }
        if !line.remarks.is_empty() {
            worksheet.write_string(row, 15, line.remarks).unwrap();
        }
    }

    workbook.save(path).unwrap();
}

fn read_output(path: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = calamine::open_workbook(path).unwrap();
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).unwrap();
    range.rows().map(|r| r.to_vec()).collect()
}

fn settings_for(temp_dir: &TempDir, input: &Path) -> Settings {
    let mut settings = Settings::new(input.to_str().unwrap());
    settings.output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    settings
}

fn text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[tokio::test]
async fn test_end_to_end_report_formatting() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("daily.xlsx");
    write_report(
        &input,
        &[
            Line {
                sta: "18:45",
                flight: "MS611",
                work_order: 9001.0,
                flags: &[],
                engineer: None,
                technician: None,
                remarks: "",
            },
            Line {
                sta: "14:05:59",
                flight: "SV1020",
                work_order: 9002.0,
                flags: &[9, 12],
                engineer: Some(3.0),
                technician: Some(4.0),
                remarks: "Canceled without notice",
            },
            Line {
                sta: "06:30",
                flight: "EK815",
                work_order: 9003.0,
                flags: &[10],
                engineer: Some(1021.0),
                technician: None,
                remarks: "TRANSIT",
            },
        ],
    );

    let settings = settings_for(&temp_dir, &input);
    let pipeline = ReportPipeline::new(LocalStorage::new(".".to_string()), settings);
    let engine = EtlEngine::new(pipeline);

    let output_path = engine.run().await.unwrap();
    assert!(output_path.ends_with("Formatted_Flight_Data.xlsx"));
    assert!(Path::new(&output_path).exists());

    let rows = read_output(&output_path);
    assert_eq!(rows.len(), 4);

    let headers: Vec<String> = rows[0].iter().map(text).collect();
    assert_eq!(headers, OUTPUT_COLUMNS.to_vec());

    // TRANSIT first, then CANCELED WITHOUT NOTICE, then everything else
    let flights: Vec<String> = rows[1..].iter().map(|r| text(&r[3])).collect();
    assert_eq!(flights, vec!["EK815", "SV1020", "MS611"]);

    let transit = &rows[1];
    assert_eq!(transit[0], Data::Float(9003.0));
    assert_eq!(text(&transit[1]), "KKIA");
    assert_eq!(text(&transit[2]), "EK");
    assert_eq!(text(&transit[4]), "HZ-AK11");
    assert_eq!(text(&transit[5]), "B777");
    assert_eq!(text(&transit[6]), "03/05/2024");
    assert_eq!(text(&transit[7]), "03/05/2024 06:30:00");
    assert_eq!(text(&transit[8]), "");
    assert_eq!(text(&transit[9]), "03/05/2024 23:10:00");
    assert_eq!(text(&transit[10]), "");
    assert_eq!(transit[11], Data::Bool(false));
    assert_eq!(text(&transit[12]), "Daily Ck");
    assert_eq!(text(&transit[13]), "1021");

    let canceled = &rows[2];
    assert_eq!(text(&canceled[7]), "03/05/2024 14:05:00");
    assert_eq!(canceled[11], Data::Bool(true));
    assert_eq!(
        text(&canceled[12]),
        "Head Set, Tech. Supt, Canceled without notice"
    );
    assert_eq!(text(&canceled[13]), "3, 4");

    let other = &rows[3];
    assert_eq!(other[11], Data::Bool(false));
    assert_eq!(text(&other[12]), "");
    assert_eq!(text(&other[13]), "");
}

#[tokio::test]
async fn test_transit_sorts_before_on_call() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("daily.xlsx");
    write_report(
        &input,
        &[
            Line {
                sta: "05:00",
                flight: "XY1",
                work_order: 1.0,
                flags: &[],
                engineer: None,
                technician: None,
                remarks: "TRANSIT",
            },
            Line {
                sta: "04:00",
                flight: "QR2",
                work_order: 2.0,
                flags: &[],
                engineer: None,
                technician: None,
                remarks: "ON CALL",
            },
        ],
    );

    let pipeline = ReportPipeline::new(
        LocalStorage::new(".".to_string()),
        settings_for(&temp_dir, &input),
    );
    let output_path = EtlEngine::new(pipeline).run().await.unwrap();

    let rows = read_output(&output_path);
    assert_eq!(text(&rows[1][3]), "XY1");
    assert_eq!(text(&rows[2][3]), "QR2");
    assert_eq!(text(&rows[2][12]), "Per landing");
    assert_eq!(rows[1][11], Data::Bool(false));
    assert_eq!(rows[2][11], Data::Bool(false));
}

#[tokio::test]
async fn test_missing_required_column_fails_whole_run() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("daily.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Daily Operations Report").unwrap();
    for (col, header) in ["DATE", "STA", "ATA"].iter().enumerate() {
        worksheet.write_string(4, col as u16, *header).unwrap();
    }
    worksheet.write_string(5, 0, "2024-03-05").unwrap();
    workbook.save(&input).unwrap();

    let settings = settings_for(&temp_dir, &input);
    let output_dir = settings.output_path.clone();
    let pipeline = ReportPipeline::new(LocalStorage::new(".".to_string()), settings);

    let err = EtlEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, FormatterError::MissingColumn { .. }));
    assert!(!Path::new(&output_dir).exists());
}
