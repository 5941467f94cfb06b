// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;

/// A single cell of a survey column.
///
/// `Missing` is the declared missing sentinel: those cells are dropped before
/// any statistics are computed.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Missing,
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// The display label used as the response category.
    ///
    /// Integral numbers render without a decimal part: a rating of 5 is the
    /// category "5", not "5.0".
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(x) if x.fract() == 0.0 => Some(format!("{}", *x as i64)),
            CellValue::Number(x) => Some(format!("{}", x)),
            CellValue::Missing => None,
        }
    }
}

/// One named question column, cells in respondent order.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyColumn {
    pub header: String,
    pub cells: Vec<CellValue>,
}

/// An ordered collection of named columns. Owned by the caller and read-only
/// to the report pipeline.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct SurveyDataset {
    pub columns: Vec<SurveyColumn>,
}

impl SurveyDataset {
    /// Number of respondent rows. The dataset is rectangular.
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }
}

// ******** Output data structures *********

/// Frequency and percentage statistics for one question column.
///
/// The three maps are explicit ordered vectors in descending-frequency order,
/// ties keeping first-encountered order. The rounded display strings and the
/// exact floats are kept separately; threshold comparisons always use the
/// exact values.
#[derive(PartialEq, Debug, Clone)]
pub struct ColumnAnalysis {
    pub question: String,
    pub frequencies: Vec<(String, u64)>,
    pub percentages: Vec<(String, String)>,
    pub exact_percentages: Vec<(String, f64)>,
    pub total: u64,
}

impl ColumnAnalysis {
    /// The exact percentage of the single most frequent response category.
    pub fn primary_share(&self) -> f64 {
        self.exact_percentages.first().map(|p| p.1).unwrap_or(0.0)
    }
}

/// The whole-dataset analysis: the surviving column analyses, the synthesized
/// paragraph and the ranked recommendations.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisReport {
    pub analyses: Vec<ColumnAnalysis>,
    pub narrative: String,
    pub recommendations: Vec<String>,
}

/// A rendered chart, as encoded PNG bytes.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartImage {
    pub title: String,
    pub png: Vec<u8>,
}

/// An atomic unit of report content, in emission order.
#[derive(PartialEq, Debug, Clone)]
pub enum DocumentBlock {
    Heading(String),
    Paragraph(String),
    ChartImage(ChartImage),
    PageBreak,
}

/// Resolved header or footer content: either an image asset or the literal
/// text lines, rendered centered and bold by the document renderer.
#[derive(PartialEq, Debug, Clone)]
pub enum BannerContent {
    Image(PathBuf),
    Lines(Vec<String>),
}

#[derive(PartialEq, Debug, Clone)]
pub struct ReportSummary {
    pub success: bool,
    pub output_name: String,
    pub institution: String,
    pub total_rows: u64,
    pub total_questions: u64,
}

/// The assembled report: banners, ordered body blocks and the summary record.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportDocument {
    pub header: BannerContent,
    pub footer: BannerContent,
    pub body: Vec<DocumentBlock>,
    pub summary: ReportSummary,
}

/// Errors that prevent the report generation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ReportError {
    ChartRender(String),
}

impl Error for ReportError {}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::ChartRender(msg) => write!(f, "chart rendering failed: {}", msg),
        }
    }
}

// ********* Assets **********

/// Header/footer image candidates, already resolved to concrete paths by the
/// caller. The `header_image`/`footer_image` pair are per-report uploads; the
/// `default_` pair are the statically configured assets.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ReportAssets {
    pub header_image: Option<PathBuf>,
    pub footer_image: Option<PathBuf>,
    pub default_header_image: Option<PathBuf>,
    pub default_footer_image: Option<PathBuf>,
}

/// Outcome of the image-normalization contract.
///
/// Conversion failure is expected and non-fatal: the collaborator logs it and
/// returns the original path.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum NormalizedImage {
    Converted(PathBuf),
    Original(PathBuf),
}

impl NormalizedImage {
    pub fn into_path(self) -> PathBuf {
        match self {
            NormalizedImage::Converted(p) => p,
            NormalizedImage::Original(p) => p,
        }
    }
}

// ********* Configuration **********

/// The institution-specific constants of the report, passed in so that an
/// alternate institution, deny list or palette can be substituted without
/// touching the generation logic.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportConfig {
    pub institution: String,
    pub output_name: String,
    /// Text fallback for the page header, three lines.
    pub header_lines: Vec<String>,
    /// Text fallback for the page footer, three lines.
    pub footer_lines: Vec<String>,
    /// Columns whose lower-cased header contains any of these substrings are
    /// dropped before analysis.
    pub excluded_headers: Vec<String>,
    /// Chart palette, cycled by category position.
    pub palette: Vec<(u8, u8, u8)>,
    /// Generic recommendations appended, in this order, when fewer than three
    /// specific ones were produced.
    pub generic_recommendations: Vec<String>,
}

impl ReportConfig {
    pub fn with_institution(institution: &str, output_name: &str) -> ReportConfig {
        ReportConfig {
            institution: institution.to_string(),
            output_name: output_name.to_string(),
            header_lines: DEFAULT_HEADER_LINES.iter().map(|s| s.to_string()).collect(),
            footer_lines: DEFAULT_FOOTER_LINES.iter().map(|s| s.to_string()).collect(),
            excluded_headers: EXCLUDED_HEADERS.iter().map(|s| s.to_string()).collect(),
            palette: CHART_PALETTE.to_vec(),
            generic_recommendations: GENERIC_RECOMMENDATIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

pub const DEFAULT_HEADER_LINES: [&str; 3] = [
    "ASOCIACION DE PADRES DE FAMILIA DEL HOGAR INFANTIL GUATAPURI",
    "NIT: 892301280-4",
    "Resolución personería jurídica N°10597 del 20 de septiembre de 1983",
];

pub const DEFAULT_FOOTER_LINES: [&str; 3] = [
    "Dirección: Manzana 34 casa 1 Garupal segunda etapa",
    "Teléfono: 5878818-3178209014",
    "Correo: higuatapuri@gmail.com",
];

pub const EXCLUDED_HEADERS: [&str; 8] = [
    "marca temporal",
    "dirección de correo electrónico",
    "direccion de correo electronico",
    "nombre padre/madre del menor- gestante",
    "nombre padre madre del menor gestante",
    "timestamp",
    "email",
    "correo",
];

pub const CHART_PALETTE: [(u8, u8, u8); 10] = [
    (0x3b, 0x82, 0xf6),
    (0xef, 0x44, 0x44),
    (0x10, 0xb9, 0x81),
    (0xf5, 0x9e, 0x0b),
    (0x8b, 0x5c, 0xf6),
    (0xec, 0x48, 0x99),
    (0x14, 0xb8, 0xa6),
    (0xf9, 0x73, 0x16),
    (0x06, 0xb6, 0xd4),
    (0x84, 0xcc, 0x16),
];

pub const GENERIC_RECOMMENDATIONS: [&str; 3] = [
    "Implementar mecanismos de seguimiento y evaluación continua del servicio mediante instrumentos estandarizados que permitan identificar oportunamente aspectos susceptibles de mejora.",
    "Fortalecer los procesos de formación y acompañamiento a familias, incorporando metodologías participativas y contenidos pertinentes según las necesidades identificadas.",
    "Establecer protocolos de aseguramiento de la calidad que garanticen el mantenimiento de los estándares en todos los componentes del servicio de atención integral.",
];
