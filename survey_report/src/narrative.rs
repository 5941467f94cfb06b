//! Builds the single analytical paragraph of the results-analysis section.

use log::debug;
use std::cmp::Ordering;

use crate::config::ColumnAnalysis;
use crate::topics;

fn by_share(a: &ColumnAnalysis, b: &ColumnAnalysis) -> Ordering {
    a.primary_share()
        .partial_cmp(&b.primary_share())
        .unwrap_or(Ordering::Equal)
}

/// Formats (topic, percentage) pairs as a prose list: "A (x%)",
/// "A (x%) y B (y%)" or "A (x%), B (y%) y C (z%)".
fn prose_list(entries: &[(String, f64)]) -> String {
    let parts: Vec<String> = entries
        .iter()
        .map(|(topic, pct)| format!("{} ({:.1}%)", topic, pct))
        .collect();
    match parts.as_slice() {
        [one] => one.clone(),
        [first, second] => format!("{} y {}", first, second),
        [first, second, third] => format!("{}, {} y {}", first, second, third),
        _ => parts.join(", "),
    }
}

/// Aggregates all column analyses into one descriptive paragraph.
///
/// The paragraph opens with the overall index (the mean of the primary
/// response shares) and its qualitative tier, optionally cites the count of
/// excellent or high ratings, lists up to three strengths and closes with
/// either the improvement areas or a consolidation sentence.
///
/// Returns a literal fallback when there is nothing to analyze.
pub fn synthesize(analyses: &[ColumnAnalysis], institution: &str) -> String {
    if analyses.is_empty() {
        return "No se encontraron resultados para analizar.".to_string();
    }

    let total_questions = analyses.len();
    let shares: Vec<f64> = analyses.iter().map(|a| a.primary_share()).collect();
    let overall_index = shares.iter().sum::<f64>() / shares.len() as f64;

    let excellent = shares.iter().filter(|p| **p >= 95.0).count();
    let high = shares.iter().filter(|p| **p >= 90.0).count();
    let weak = shares.iter().filter(|p| **p < 80.0).count();
    debug!(
        "synthesize: overall index {:.3}, excellent {}, high {}, weak {}",
        overall_index, excellent, high, weak
    );

    // Top strengths: the three best-rated questions, kept while at least 85.
    let mut by_share_desc: Vec<&ColumnAnalysis> = analyses.iter().collect();
    by_share_desc.sort_by(|a, b| by_share(b, a));
    let strengths: Vec<(String, f64)> = by_share_desc
        .iter()
        .take(3)
        .filter(|a| a.primary_share() >= 85.0)
        .map(|a| (topics::classify(&a.question), a.primary_share()))
        .collect();

    // Questions with the lowest primary shares, ascending.
    let mut low: Vec<&ColumnAnalysis> = analyses
        .iter()
        .filter(|a| a.primary_share() < 90.0)
        .collect();
    low.sort_by(|a, b| by_share(a, b));
    let improvement_areas: Vec<(String, f64)> = low
        .iter()
        .take(3)
        .map(|a| (topics::classify(&a.question), a.primary_share()))
        .collect();

    let tier = if overall_index >= 90.0 {
        "índice de satisfacción altamente favorable"
    } else if overall_index >= 85.0 {
        "índice de satisfacción favorable"
    } else if overall_index >= 80.0 {
        "índice de satisfacción satisfactorio"
    } else {
        "índice de satisfacción que evidencia oportunidades de mejora"
    };

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!(
        "El análisis de los resultados obtenidos en la Unidad de Servicio {} evidencia un {}, \
         con un promedio general de {:.1}% en los {} ítems evaluados.",
        institution, tier, overall_index, total_questions
    ));

    // Only one of the two distribution sentences fires.
    if excellent > 0 {
        parts.push(format!(
            "Se destaca que {} de los {} aspectos consultados ({:.0}%) registran valoraciones \
             superiores al 95%, lo cual refleja un alto nivel de percepción positiva por parte \
             de las familias usuarias.",
            excellent,
            total_questions,
            excellent as f64 / total_questions as f64 * 100.0
        ));
    } else if high > 0 {
        parts.push(format!(
            "Del total de aspectos evaluados, {} ({:.0}%) presentan valoraciones superiores al \
             90%, evidenciando una percepción favorable del servicio prestado.",
            high,
            high as f64 / total_questions as f64 * 100.0
        ));
    }

    if !strengths.is_empty() {
        parts.push(format!(
            "Las principales fortalezas identificadas corresponden a {}, aspectos que demuestran \
             el compromiso institucional con la calidad de la atención integral a la primera \
             infancia.",
            prose_list(&strengths)
        ));
    }

    if !improvement_areas.is_empty() {
        if weak > 0 {
            parts.push(format!(
                "No obstante, se identifican oportunidades de mejora en aspectos como {}, los \
                 cuales requieren acciones de fortalecimiento para alcanzar los estándares de \
                 excelencia esperados.",
                prose_list(&improvement_areas)
            ));
        } else {
            parts.push(format!(
                "Si bien los resultados son favorables en su conjunto, aspectos como {} presentan \
                 valoraciones ligeramente menores que podrían optimizarse mediante estrategias \
                 focalizadas de mejoramiento.",
                prose_list(&improvement_areas)
            ));
        }
    } else {
        parts.push(
            "Los resultados evidencian una gestión integral que responde satisfactoriamente a \
             las expectativas de las familias beneficiarias, consolidando la Unidad de Servicio \
             como un referente de calidad en la atención a la primera infancia."
                .to_string(),
        );
    }

    parts.join(" ")
}
