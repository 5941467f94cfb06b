//! Orders the report sections, applies the pagination rules and resolves the
//! page banners.

use log::{debug, info};
use std::path::Path;

use crate::config::*;
use crate::sentences;

/// True when the lower-cased header contains any deny-list entry. Excluded
/// columns never reach the analyzer.
pub fn is_excluded_header(header: &str, excluded: &[String]) -> bool {
    let lower = header.to_lowercase();
    let lower = lower.trim();
    excluded.iter().any(|entry| lower.contains(entry.as_str()))
}

/// Title-cases a phrase the way institution names are displayed: the first
/// letter of every alphabetic run upper-cased, the rest lower-cased.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Resolves one banner side: the per-report image first, then the static
/// default, then the configured text lines. Images pass through the
/// normalization contract.
pub fn resolve_banner<F>(
    supplied: Option<&Path>,
    static_default: Option<&Path>,
    lines: &[String],
    normalize_image: F,
) -> BannerContent
where
    F: Fn(&Path) -> NormalizedImage,
{
    match supplied.or(static_default) {
        Some(path) => {
            let normalized = normalize_image(path);
            debug!("resolve_banner: using image {:?}", normalized);
            BannerContent::Image(normalized.into_path())
        }
        None => BannerContent::Lines(lines.to_vec()),
    }
}

fn introduction_text(institution: &str) -> String {
    format!(
        "Dentro del marco de las obligaciones contractuales SIGE establecidas entre EL INSTITUTO \
         COLOMBIANO DE BIENESTAR FAMILIAR ICBF y la ASOCIACION DE PADRES DE FAMILIA DEL HOGAR \
         INFANTIL GUATAPURI (UDS) {} se establecer el de realizar una encuesta que permita saber \
         el nivel de satisfacción de los usuarios respecto al servicio prestado el siguiente \
         documento muestra la metodología, los resultados, el análisis de los mismos y unas \
         posibles oportunidades de mejora.",
        institution.to_uppercase()
    )
}

fn methodology_text(institution: &str, total_rows: u64) -> String {
    format!(
        "El primer paso de la metodología consistió en la elaboración de una encuesta (lista de \
         preguntas con calificación) que permitiría saber el nivel de satisfacción de los \
         usuarios de cada uds (para este caso fue la uds {}) respectos a los distintos ítems de \
         calificación del servicio estas preguntas se establecieron en un orden de 1 a 5 donde \
         uno es muy malo y 5 muy bueno, y algunas de si o no una vez establecidas estas preguntas \
         se estableció un formulario tipo GOOGLE y se vinculó al correo \
         gerenciamasisosas@gmail.com, antes del inicio del encuentro se le explico a los 50 \
         usuarios de la uds la importancia del diligenciamiento de la encuesta, por medios \
         electrónicos se le envió a los usuarios la encuesta a diligenciar por lineamientos del \
         ICBF se establece un mínimo del 20% de la población como muestra, para este caso se \
         lograron diligenciar {} encuestas, una vez diligenciadas se procederá a realizar las \
         fase de RESULTADOS, ANALISIS DE RESULTADOS Y POSIBLES OPORTUNIDADES DE MEJORA.",
        title_case(institution),
        total_rows
    )
}

/// Produces the final document: banners, ordered body blocks and the summary
/// record.
///
/// `analyses` and `charts` are parallel: one chart per surviving question, in
/// the same order.
#[allow(clippy::too_many_arguments)]
pub fn assemble<F>(
    config: &ReportConfig,
    assets: &ReportAssets,
    normalize_image: F,
    analyses: &[ColumnAnalysis],
    charts: Vec<ChartImage>,
    narrative: &str,
    recommendations: &[String],
    total_rows: u64,
) -> ReportDocument
where
    F: Fn(&Path) -> NormalizedImage,
{
    let header = resolve_banner(
        assets.header_image.as_deref(),
        assets.default_header_image.as_deref(),
        &config.header_lines,
        &normalize_image,
    );
    let footer = resolve_banner(
        assets.footer_image.as_deref(),
        assets.default_footer_image.as_deref(),
        &config.footer_lines,
        &normalize_image,
    );

    let mut body: Vec<DocumentBlock> = Vec::new();

    body.push(DocumentBlock::Heading("Introducción".to_string()));
    body.push(DocumentBlock::Paragraph(introduction_text(&config.institution)));
    body.push(DocumentBlock::Heading("Metodología".to_string()));
    body.push(DocumentBlock::Paragraph(methodology_text(
        &config.institution,
        total_rows,
    )));
    body.push(DocumentBlock::PageBreak);

    body.push(DocumentBlock::Heading("Resultados".to_string()));
    let mut processed = 0usize;
    for (analysis, chart) in analyses.iter().zip(charts.into_iter()) {
        body.push(DocumentBlock::Paragraph(format!(
            "Ante la pregunta \"{}\" Los resultados se muestran en la siguiente gráfica.",
            analysis.question
        )));
        body.push(DocumentBlock::ChartImage(chart));
        body.push(DocumentBlock::Paragraph(sentences::result_sentence(
            &analysis.percentages,
        )));

        // Two questions per page.
        processed += 1;
        if processed % 2 == 0 {
            body.push(DocumentBlock::PageBreak);
        }
    }
    // The analysis section always starts aligned to the pairing boundary.
    if processed % 2 != 0 {
        body.push(DocumentBlock::PageBreak);
    }

    body.push(DocumentBlock::Heading("Análisis de resultados".to_string()));
    body.push(DocumentBlock::Paragraph(narrative.to_string()));

    body.push(DocumentBlock::Heading(
        "Posibles oportunidades de mejora".to_string(),
    ));
    for recommendation in recommendations {
        body.push(DocumentBlock::Paragraph(format!("·       {}", recommendation)));
    }

    info!(
        "assemble: {} blocks, {} questions, output {:?}",
        body.len(),
        processed,
        config.output_name
    );

    ReportDocument {
        header,
        footer,
        body,
        summary: ReportSummary {
            success: true,
            output_name: config.output_name.clone(),
            institution: config.institution.clone(),
            total_rows,
            total_questions: analyses.len() as u64,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> ReportConfig {
        ReportConfig::with_institution("Uds Prueba", "informe Uds Prueba.json")
    }

    fn analysis(question: &str) -> ColumnAnalysis {
        ColumnAnalysis {
            question: question.to_string(),
            frequencies: vec![("Sí".to_string(), 4), ("No".to_string(), 1)],
            percentages: vec![
                ("Sí".to_string(), "80.0".to_string()),
                ("No".to_string(), "20.0".to_string()),
            ],
            exact_percentages: vec![("Sí".to_string(), 80.0), ("No".to_string(), 20.0)],
            total: 5,
        }
    }

    fn no_normalize(path: &Path) -> NormalizedImage {
        NormalizedImage::Original(path.to_path_buf())
    }

    fn assemble_n(questions: usize) -> ReportDocument {
        let analyses: Vec<ColumnAnalysis> = (0..questions)
            .map(|i| analysis(&format!("Pregunta {}", i)))
            .collect();
        let charts: Vec<ChartImage> = (0..questions)
            .map(|i| ChartImage {
                title: format!("Pregunta {}", i),
                png: vec![0u8],
            })
            .collect();
        assemble(
            &config(),
            &ReportAssets::default(),
            no_normalize,
            &analyses,
            charts,
            "párrafo de análisis",
            &["recomendación".to_string()],
            5,
        )
    }

    // Page breaks from the results heading on, excluding the fixed break
    // before it.
    fn results_breaks(document: &ReportDocument) -> usize {
        let start = document
            .body
            .iter()
            .position(|b| matches!(b, DocumentBlock::Heading(h) if h == "Resultados"))
            .unwrap();
        document.body[start..]
            .iter()
            .filter(|b| matches!(b, DocumentBlock::PageBreak))
            .count()
    }

    #[test]
    fn pagination_follows_the_pairing_rule() {
        // floor(n/2) breaks inside the loop plus one more when n is odd.
        for (questions, expected) in [(0, 0), (1, 1), (2, 1), (3, 2), (4, 2), (5, 3)] {
            let document = assemble_n(questions);
            assert_eq!(results_breaks(&document), expected, "questions: {}", questions);
        }
    }

    #[test]
    fn sections_appear_in_order() {
        let document = assemble_n(1);
        let headings: Vec<&str> = document
            .body
            .iter()
            .filter_map(|b| match b {
                DocumentBlock::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                "Introducción",
                "Metodología",
                "Resultados",
                "Análisis de resultados",
                "Posibles oportunidades de mejora"
            ]
        );
    }

    #[test]
    fn each_question_emits_restatement_chart_and_result() {
        let document = assemble_n(2);
        let charts = document
            .body
            .iter()
            .filter(|b| matches!(b, DocumentBlock::ChartImage(_)))
            .count();
        assert_eq!(charts, 2);
        assert!(document.body.iter().any(|b| matches!(
            b,
            DocumentBlock::Paragraph(p) if p.starts_with("Ante la pregunta \"Pregunta 0\"")
        )));
        assert!(document.body.iter().any(|b| matches!(
            b,
            DocumentBlock::Paragraph(p) if p == "El 80.0% dio una respuesta de Sí y el 20.0% de No."
        )));
    }

    #[test]
    fn banners_fall_back_to_the_text_lines() {
        let document = assemble_n(0);
        assert_eq!(
            document.header,
            BannerContent::Lines(DEFAULT_HEADER_LINES.iter().map(|s| s.to_string()).collect())
        );
        assert_eq!(
            document.footer,
            BannerContent::Lines(DEFAULT_FOOTER_LINES.iter().map(|s| s.to_string()).collect())
        );
    }

    #[test]
    fn supplied_image_wins_over_static_default() {
        let supplied = PathBuf::from("subida.png");
        let fallback = PathBuf::from("estatica.png");
        let banner = resolve_banner(
            Some(supplied.as_path()),
            Some(fallback.as_path()),
            &[],
            no_normalize,
        );
        assert_eq!(banner, BannerContent::Image(supplied));
    }

    #[test]
    fn summary_reflects_the_run() {
        let document = assemble_n(3);
        assert!(document.summary.success);
        assert_eq!(document.summary.total_questions, 3);
        assert_eq!(document.summary.total_rows, 5);
        assert_eq!(document.summary.output_name, "informe Uds Prueba.json");
        assert_eq!(document.summary.institution, "Uds Prueba");
    }

    #[test]
    fn excluded_headers_match_as_substrings() {
        let excluded: Vec<String> = EXCLUDED_HEADERS.iter().map(|s| s.to_string()).collect();
        assert!(is_excluded_header("Dirección de correo electrónico", &excluded));
        assert!(is_excluded_header("  Marca temporal  ", &excluded));
        assert!(!is_excluded_header("¿Cómo califica el servicio?", &excluded));
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("mi uds favorita"), "Mi Uds Favorita");
        assert_eq!(title_case("HOGAR GUATAPURI"), "Hogar Guatapuri");
        assert_eq!(title_case("uds_2"), "Uds_2");
    }
}
