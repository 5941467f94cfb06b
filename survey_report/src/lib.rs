mod config;
use log::{debug, info};

pub use crate::config::*;

pub mod chart;
pub mod document;
pub mod narrative;
pub mod recommend;
pub mod sentences;
pub mod topics;

/// Computes the frequency and percentage statistics for one question column.
///
/// Missing cells are dropped first. A column with no non-missing values
/// returns `None` and is silently excluded downstream; this is not an error.
///
/// The display percentages are rounded to one decimal with round half to
/// even, the same rule `format!("{:.1}")` applies everywhere else in the
/// report. Threshold comparisons never look at the rounded strings.
pub fn analyze_column(column: &SurveyColumn) -> Option<ColumnAnalysis> {
    let labels: Vec<String> = column.cells.iter().filter_map(|c| c.label()).collect();
    if labels.is_empty() {
        return None;
    }
    let total = labels.len() as u64;

    // Count in first-encounter order, then stable-sort by descending count so
    // that equal counts keep the encounter order.
    let mut frequencies: Vec<(String, u64)> = Vec::new();
    for label in labels {
        match frequencies.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => frequencies.push((label, 1)),
        }
    }
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));

    let mut percentages: Vec<(String, String)> = Vec::new();
    let mut exact_percentages: Vec<(String, f64)> = Vec::new();
    for (label, count) in frequencies.iter() {
        let exact = (*count as f64 / total as f64) * 100.0;
        percentages.push((label.clone(), format!("{:.1}", exact)));
        exact_percentages.push((label.clone(), exact));
    }

    Some(ColumnAnalysis {
        question: column.header.clone(),
        frequencies,
        percentages,
        exact_percentages,
        total,
    })
}

/// Runs the analysis half of the pipeline: filters the deny-listed columns,
/// analyzes the survivors and synthesizes the narrative paragraph and the
/// improvement recommendations.
pub fn analyze_dataset(dataset: &SurveyDataset, config: &ReportConfig) -> AnalysisReport {
    let mut analyses: Vec<ColumnAnalysis> = Vec::new();
    for column in dataset.columns.iter() {
        if document::is_excluded_header(&column.header, &config.excluded_headers) {
            debug!("analyze_dataset: skipping excluded column {:?}", column.header);
            continue;
        }
        match analyze_column(column) {
            Some(analysis) => analyses.push(analysis),
            None => {
                debug!(
                    "analyze_dataset: column {:?} has no responses, skipping",
                    column.header
                );
            }
        }
    }

    let narrative = narrative::synthesize(&analyses, &config.institution);
    let recommendations =
        recommend::improvement_recommendations(&analyses, &config.generic_recommendations);

    AnalysisReport {
        analyses,
        narrative,
        recommendations,
    }
}

/// Generates the complete report document for one dataset.
///
/// `normalize_image` is the caller-supplied conversion contract for the
/// banner images; see [`NormalizedImage`].
///
/// The call is a single-shot deterministic computation. It holds no shared
/// state, so concurrent invocations over independent datasets are safe.
pub fn run_report<F>(
    dataset: &SurveyDataset,
    config: &ReportConfig,
    assets: &ReportAssets,
    normalize_image: F,
) -> Result<ReportDocument, ReportError>
where
    F: Fn(&std::path::Path) -> NormalizedImage,
{
    info!(
        "run_report: {} columns, {} rows, institution: {:?}",
        dataset.columns.len(),
        dataset.num_rows(),
        config.institution
    );

    let report = analyze_dataset(dataset, config);
    info!("run_report: {} questions analyzed", report.analyses.len());

    let mut charts: Vec<ChartImage> = Vec::new();
    for analysis in report.analyses.iter() {
        let png =
            chart::render_pie_chart(&analysis.exact_percentages, &analysis.question, &config.palette)?;
        charts.push(ChartImage {
            title: analysis.question.clone(),
            png,
        });
    }

    Ok(document::assemble(
        config,
        assets,
        normalize_image,
        &report.analyses,
        charts,
        &report.narrative,
        &report.recommendations,
        dataset.num_rows() as u64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(header: &str, values: &[&str]) -> SurveyColumn {
        SurveyColumn {
            header: header.to_string(),
            cells: values.iter().map(|v| CellValue::Text(v.to_string())).collect(),
        }
    }

    #[test]
    fn yes_no_column() {
        let mut values = vec!["Sí"; 40];
        values.extend(vec!["No"; 10]);
        let analysis = analyze_column(&text_column("¿Está satisfecho?", &values)).unwrap();
        assert_eq!(analysis.total, 50);
        assert_eq!(
            analysis.frequencies,
            vec![("Sí".to_string(), 40), ("No".to_string(), 10)]
        );
        assert_eq!(analysis.percentages[0], ("Sí".to_string(), "80.0".to_string()));
        assert_eq!(analysis.percentages[1], ("No".to_string(), "20.0".to_string()));
        assert_eq!(analysis.primary_share(), 80.0);
    }

    #[test]
    fn all_missing_column_is_absent() {
        let column = SurveyColumn {
            header: "Vacía".to_string(),
            cells: vec![CellValue::Missing, CellValue::Missing],
        };
        assert_eq!(analyze_column(&column), None);
    }

    #[test]
    fn counts_sum_to_total() {
        let analysis =
            analyze_column(&text_column("P", &["a", "b", "a", "c", "a", "b"])).unwrap();
        let sum: u64 = analysis.frequencies.iter().map(|f| f.1).sum();
        assert_eq!(sum, analysis.total);
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let analysis = analyze_column(&text_column("P", &["b", "a", "b", "a"])).unwrap();
        let labels: Vec<&str> = analysis.frequencies.iter().map(|f| f.0.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn integral_numbers_render_without_decimals() {
        let column = SurveyColumn {
            header: "Calificación".to_string(),
            cells: vec![CellValue::Number(5.0), CellValue::Number(4.0), CellValue::Number(5.0)],
        };
        let analysis = analyze_column(&column).unwrap();
        assert_eq!(analysis.frequencies[0].0, "5");
        assert_eq!(analysis.frequencies[1].0, "4");
    }

    #[test]
    fn analyze_dataset_drops_identifying_columns() {
        let config = ReportConfig::with_institution("Uds Prueba", "informe Uds Prueba.json");
        let dataset = SurveyDataset {
            columns: vec![
                text_column("Dirección de correo electrónico", &["a@b.co", "c@d.co"]),
                text_column("¿Cómo califica el servicio?", &["Bueno", "Bueno"]),
            ],
        };
        let report = analyze_dataset(&dataset, &config);
        assert_eq!(report.analyses.len(), 1);
        assert_eq!(report.analyses[0].question, "¿Cómo califica el servicio?");
    }

    #[test]
    fn empty_dataset_falls_back_to_generics() {
        let config = ReportConfig::with_institution("Uds Prueba", "informe Uds Prueba.json");
        let report = analyze_dataset(&SurveyDataset::default(), &config);
        assert_eq!(report.narrative, "No se encontraron resultados para analizar.");
        assert_eq!(
            report.recommendations,
            GENERIC_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<String>>()
        );
    }
}
