use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use survey_report::{
    BannerContent, DocumentBlock, ReportConfig, ReportDocument, ReportSummary,
};

pub mod assets;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum InformeError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no readable content"))]
    EmptyExcel { path: String },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error handling JSON content"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The requested banner image {path} does not exist"))]
    MissingBannerImage { path: String },
    #[snafu(display("Report generation failed"))]
    Report { source: survey_report::ReportError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type InformeResult<T> = Result<T, InformeError>;

/// Derives the institution name from the spreadsheet file name: extension
/// dropped, underscores to spaces, title-cased.
pub fn institution_from_path(input: &Path) -> String {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    survey_report::document::title_case(&stem.replace('_', " "))
}

pub fn output_name_for(institution: &str) -> String {
    format!("informe {}.json", institution)
}

/// Runs the whole generation: reads the spreadsheet, generates the report
/// document and writes the manifest and the chart images to the output
/// directory.
pub fn run_report(args: &crate::args::Args) -> InformeResult<ReportSummary> {
    let input = Path::new(&args.input);
    info!("Reading survey file {:?}", input);

    let dataset = io_xlsx::read_survey_xlsx(&args.input)?;
    info!(
        "{} responses, {} columns detected",
        dataset.num_rows(),
        dataset.columns.len()
    );

    let institution = match &args.uds_name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => {
            let name = institution_from_path(input);
            info!("Institution name derived from the file name: {:?}", name);
            name
        }
    };

    let work_dir = PathBuf::from(args.work_dir.clone().unwrap_or_else(|| ".".to_string()));
    let banner_assets = assets::locate_banner_images(
        &work_dir,
        args.static_images_dir.as_deref().map(Path::new),
        args.header_image.as_deref(),
        args.footer_image.as_deref(),
    )?;
    debug!("run_report: banner assets: {:?}", banner_assets);

    let config = ReportConfig::with_institution(&institution, &output_name_for(&institution));
    let document =
        survey_report::run_report(&dataset, &config, &banner_assets, assets::normalize_image)
            .context(ReportSnafu {})?;

    let out_dir = PathBuf::from(args.out_dir.clone().unwrap_or_else(|| ".".to_string()));
    let manifest = write_document(&document, &out_dir)?;

    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &manifest)?;
    }

    Ok(document.summary)
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct ManifestSummary {
    success: bool,
    #[serde(rename = "outputName")]
    output_name: String,
    institution: String,
    #[serde(rename = "totalRows")]
    total_rows: u64,
    #[serde(rename = "totalQuestions")]
    total_questions: u64,
}

fn banner_to_json(banner: &BannerContent) -> JSValue {
    match banner {
        BannerContent::Image(path) => json!({ "image": path.display().to_string() }),
        BannerContent::Lines(lines) => json!({ "lines": lines }),
    }
}

/// Converts the document to the manifest consumed by the document renderer.
/// `chart_files` holds the file names of the written charts, in block order.
fn document_to_json(document: &ReportDocument, chart_files: &[String]) -> JSValue {
    let mut chart_iter = chart_files.iter();
    let mut blocks: Vec<JSValue> = Vec::new();
    for block in document.body.iter() {
        let js = match block {
            DocumentBlock::Heading(text) => json!({ "type": "heading", "text": text }),
            DocumentBlock::Paragraph(text) => json!({ "type": "paragraph", "text": text }),
            DocumentBlock::ChartImage(chart) => {
                let file = chart_iter.next().cloned().unwrap_or_default();
                json!({ "type": "chart", "title": chart.title, "file": file })
            }
            DocumentBlock::PageBreak => json!({ "type": "page_break" }),
        };
        blocks.push(js);
    }

    let summary = ManifestSummary {
        success: document.summary.success,
        output_name: document.summary.output_name.clone(),
        institution: document.summary.institution.clone(),
        total_rows: document.summary.total_rows,
        total_questions: document.summary.total_questions,
    };

    json!({
        "header": banner_to_json(&document.header),
        "footer": banner_to_json(&document.footer),
        "blocks": blocks,
        "summary": summary,
    })
}

fn write_document(document: &ReportDocument, out_dir: &Path) -> InformeResult<String> {
    fs::create_dir_all(out_dir).context(WritingOutputSnafu {
        path: out_dir.display().to_string(),
    })?;

    let mut chart_files: Vec<String> = Vec::new();
    for block in document.body.iter() {
        if let DocumentBlock::ChartImage(chart) = block {
            let file_name = format!("grafica_{:02}.png", chart_files.len() + 1);
            let path = out_dir.join(&file_name);
            fs::write(&path, &chart.png).context(WritingOutputSnafu {
                path: path.display().to_string(),
            })?;
            debug!("write_document: wrote chart {:?} for {:?}", path, chart.title);
            chart_files.push(file_name);
        }
    }

    let manifest_js = document_to_json(document, &chart_files);
    let pretty = serde_json::to_string_pretty(&manifest_js).context(ParsingJsonSnafu {})?;

    let manifest_path = out_dir.join(&document.summary.output_name);
    fs::write(&manifest_path, &pretty).context(WritingOutputSnafu {
        path: manifest_path.display().to_string(),
    })?;
    info!("Report manifest written to {:?}", manifest_path);

    Ok(pretty)
}

/// Compares the generated manifest against a reference file, printing the
/// differences when they do not match.
fn check_reference(reference_path: &str, manifest: &str) -> InformeResult<()> {
    let contents = fs::read_to_string(reference_path).context(OpeningJsonSnafu {
        path: reference_path.to_string(),
    })?;
    let reference_js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference_js).context(ParsingJsonSnafu {})?;
    if pretty_reference != manifest {
        warn!("Found differences with the reference manifest");
        print_diff(pretty_reference.as_str(), manifest, "\n");
        whatever!("Difference detected between generated manifest and reference manifest");
    }
    Ok(())
}
