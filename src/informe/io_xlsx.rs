// Reads the survey spreadsheet into the core dataset.

use calamine::{open_workbook, Reader, Xlsx};
use log::{debug, warn};
use snafu::prelude::*;

use crate::informe::{EmptyExcelSnafu, InformeResult, OpeningExcelSnafu};
use survey_report::{CellValue, SurveyColumn, SurveyDataset};

/// Reads the first worksheet: the first row holds the question headers, every
/// following row one respondent. Empty cells are the missing sentinel.
pub fn read_survey_xlsx(path: &str) -> InformeResult<SurveyDataset> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.to_string() })?;
    let wrange = workbook
        .worksheet_range_at(0)
        .context(EmptyExcelSnafu { path: path.to_string() })?
        .context(OpeningExcelSnafu { path: path.to_string() })?;

    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path: path.to_string() })?;
    debug!("read_survey_xlsx: header: {:?}", header);

    let mut columns: Vec<SurveyColumn> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| SurveyColumn {
            header: match cell {
                calamine::DataType::String(s) => s.clone(),
                calamine::DataType::Float(f) => format!("{}", f),
                calamine::DataType::Int(i) => format!("{}", i),
                _ => format!("Columna {}", idx + 1),
            },
            cells: Vec::new(),
        })
        .collect();

    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            let value = match row.get(idx) {
                Some(calamine::DataType::String(s)) if s.trim().is_empty() => CellValue::Missing,
                Some(calamine::DataType::String(s)) => CellValue::Text(s.clone()),
                Some(calamine::DataType::Float(f)) => CellValue::Number(*f),
                Some(calamine::DataType::Int(i)) => CellValue::Number(*i as f64),
                // The forms in use phrase boolean questions as Sí/No.
                Some(calamine::DataType::Bool(b)) => {
                    CellValue::Text(if *b { "Sí" } else { "No" }.to_string())
                }
                Some(calamine::DataType::Empty) | None => CellValue::Missing,
                Some(other) => {
                    warn!(
                        "read_survey_xlsx: unsupported cell {:?}, treating as missing",
                        other
                    );
                    CellValue::Missing
                }
            };
            column.cells.push(value);
        }
    }

    Ok(SurveyDataset { columns })
}
