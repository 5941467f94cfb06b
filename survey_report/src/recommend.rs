//! Derives up to three improvement actions from the weakest-scoring
//! questions.

use log::debug;
use std::cmp::Ordering;

use crate::config::ColumnAnalysis;

/// Ordered keyword rules mapping a question to a prewritten institutional
/// recommendation. Distinct from the topic table: this one is broader and its
/// entries are full action sentences. First match wins.
const RECOMMENDATION_RULES: &[(&[&str], &str)] = &[
    (
        &["aliment", "comida", "menú", "complemento", "nutrición"],
        "Realizar evaluaciones sensoriales y nutricionales periódicas de los complementos \
         alimentarios, incorporando la retroalimentación de las familias para ajustar menús y \
         garantizar su aceptabilidad y aporte nutricional.",
    ),
    (
        &["comunicación", "información", "mensaje", "notificación"],
        "Fortalecer las estrategias de comunicación institucional mediante la diversificación de \
         canales (digitales y presenciales), estableciendo protocolos de información clara, \
         oportuna y pertinente sobre las actividades y procesos pedagógicos.",
    ),
    (
        &["atención", "atender", "trato", "servicio al usuario"],
        "Implementar un plan de mejoramiento del servicio al usuario que incluya capacitación en \
         atención humanizada, protocolos de respuesta oportuna y mecanismos de verificación de la \
         satisfacción en cada punto de contacto.",
    ),
    (
        &["espacio", "ambiente", "infraestructura", "instalacion", "área"],
        "Desarrollar un plan de adecuación y mantenimiento de espacios físicos que garantice \
         condiciones óptimas de seguridad, funcionalidad y ambientación pedagógica, conforme a \
         los estándares técnicos establecidos por el ICBF.",
    ),
    (
        &["calidad", "servicio", "prestación"],
        "Implementar un sistema de gestión de calidad que incluya indicadores de desempeño, \
         auditorías internas periódicas y planes de mejoramiento continuo en todos los \
         componentes de la atención integral.",
    ),
    (
        &["personal", "talento", "equipo", "agente", "docente", "maestr", "profesional"],
        "Diseñar e implementar un plan de desarrollo del talento humano que contemple formación \
         continua, acompañamiento técnico y estrategias de bienestar laboral para fortalecer las \
         competencias del equipo interdisciplinario.",
    ),
    (
        &["pedagógic", "actividad", "enseñanza", "aprendizaje", "educativ", "didáctic"],
        "Enriquecer las prácticas pedagógicas mediante la implementación de metodologías \
         innovadoras, incorporación de recursos didácticos pertinentes y evaluación sistemática \
         del desarrollo infantil conforme a los referentes técnicos.",
    ),
    (
        &["familia", "padre", "madre", "participación", "acudiente"],
        "Fortalecer la vinculación de las familias mediante estrategias diferenciadas de \
         participación que promuevan su rol como agentes educadores y corresponsables en el \
         desarrollo integral de los niños y niñas.",
    ),
    (
        &["queja", "reclamo", "sugerencia", "pqrs"],
        "Optimizar el sistema de atención a Peticiones, Quejas, Reclamos y Sugerencias (PQRS), \
         garantizando tiempos de respuesta oportunos, seguimiento efectivo y análisis de \
         tendencias para la mejora continua.",
    ),
    (
        &["seguridad", "protección", "riesgo", "prevención"],
        "Fortalecer los protocolos de seguridad y protección integral mediante la actualización \
         de rutas de atención, capacitación permanente del personal y realización de simulacros \
         periódicos conforme a la normativa vigente.",
    ),
    (
        &["higiene", "limpieza", "aseo", "saneamiento", "desinfección"],
        "Reforzar los protocolos de higiene, limpieza y desinfección mediante cronogramas \
         estructurados, listas de verificación diarias y capacitación continua al personal de \
         servicios generales conforme a normativa sanitaria.",
    ),
    (
        &["horario", "tiempo", "puntualidad", "jornada"],
        "Optimizar la distribución de tiempos pedagógicos y rutinas diarias, garantizando el \
         cumplimiento de la programación establecida y el aprovechamiento efectivo de las \
         jornadas de atención.",
    ),
    (
        &["material", "recurso", "dotación", "juguete", "didáctico"],
        "Fortalecer la dotación de materiales didácticos mediante la evaluación de necesidades, \
         selección de recursos pertinentes al desarrollo infantil y establecimiento de protocolos \
         de mantenimiento y renovación.",
    ),
    (
        &["salud", "enfermedad", "vacuna", "control"],
        "Fortalecer el componente de salud mediante el seguimiento sistemático del estado de \
         salud de los niños y niñas, articulación con el sector salud y promoción de hábitos \
         saludables con las familias.",
    ),
    (
        &["valoración", "evaluación", "desarrollo", "seguimiento"],
        "Mejorar los procesos de valoración y seguimiento al desarrollo infantil mediante la \
         aplicación rigurosa de instrumentos estandarizados y la socialización oportuna de \
         resultados con las familias.",
    ),
];

/// The recommendation for one question. Unmatched questions never error: they
/// fall through to a generic action that quotes the question text.
fn specific_recommendation(question: &str) -> String {
    let lower = question.to_lowercase();
    for (keywords, text) in RECOMMENDATION_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return (*text).to_string();
        }
    }
    format!(
        "Implementar acciones de mejoramiento específicas relacionadas con el aspecto evaluado \
         en el ítem '{}', mediante la identificación de causas, establecimiento de metas claras \
         y seguimiento periódico a los resultados.",
        question
    )
}

/// Returns at most three improvement recommendations, derived from the three
/// weakest-scoring questions, specific entries first, padded in order from
/// the generic pool.
///
/// A question whose primary share is 95% or more leaves no meaningful margin
/// and produces nothing. Duplicate texts are skipped.
pub fn improvement_recommendations(
    analyses: &[ColumnAnalysis],
    generic_pool: &[String],
) -> Vec<String> {
    let mut sorted: Vec<&ColumnAnalysis> = analyses.iter().collect();
    sorted.sort_by(|a, b| {
        a.primary_share()
            .partial_cmp(&b.primary_share())
            .unwrap_or(Ordering::Equal)
    });

    let mut recommendations: Vec<String> = Vec::new();
    for analysis in sorted.iter().take(3) {
        if analysis.primary_share() < 95.0 {
            let text = specific_recommendation(&analysis.question);
            if !recommendations.contains(&text) {
                recommendations.push(text);
            }
        }
    }
    debug!(
        "improvement_recommendations: {} specific recommendations",
        recommendations.len()
    );

    for generic in generic_pool {
        if recommendations.len() >= 3 {
            break;
        }
        recommendations.push(generic.clone());
    }
    recommendations.truncate(3);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GENERIC_RECOMMENDATIONS;

    fn analysis(question: &str, primary: f64) -> ColumnAnalysis {
        ColumnAnalysis {
            question: question.to_string(),
            frequencies: vec![("Sí".to_string(), 1)],
            percentages: vec![("Sí".to_string(), format!("{:.1}", primary))],
            exact_percentages: vec![("Sí".to_string(), primary)],
            total: 1,
        }
    }

    fn generics() -> Vec<String> {
        GENERIC_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_input_returns_the_generic_pool_in_order() {
        let recommendations = improvement_recommendations(&[], &generics());
        assert_eq!(recommendations, generics());
    }

    #[test]
    fn never_more_than_three() {
        let analyses: Vec<ColumnAnalysis> = (0..6)
            .map(|i| analysis(&format!("Pregunta {}", i), 50.0 + i as f64))
            .collect();
        let recommendations = improvement_recommendations(&analyses, &generics());
        assert_eq!(recommendations.len(), 3);
    }

    #[test]
    fn duplicates_are_skipped_and_padded_with_generics() {
        // Both questions hit the food rule, so only one specific entry
        // survives and two generics pad the list.
        let analyses = vec![
            analysis("Calidad de la comida", 60.0),
            analysis("Valoración del menú semanal", 70.0),
        ];
        let recommendations = improvement_recommendations(&analyses, &generics());
        assert_eq!(recommendations.len(), 3);
        assert!(recommendations[0].contains("complementos alimentarios"));
        assert_eq!(recommendations[1], generics()[0]);
        assert_eq!(recommendations[2], generics()[1]);
        let mut unique = recommendations.clone();
        unique.dedup();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn high_scores_produce_no_specific_entry() {
        let analyses = vec![analysis("Calidad del servicio", 97.0)];
        let recommendations = improvement_recommendations(&analyses, &generics());
        assert_eq!(recommendations, generics());
    }

    #[test]
    fn unmatched_question_quotes_the_text() {
        let analyses = vec![analysis("Algo totalmente distinto", 50.0)];
        let recommendations = improvement_recommendations(&analyses, &generics());
        assert!(recommendations[0].contains("'Algo totalmente distinto'"));
    }

    #[test]
    fn weakest_question_comes_first() {
        let analyses = vec![
            analysis("Condiciones de higiene", 80.0),
            analysis("Protocolos de seguridad", 60.0),
        ];
        let recommendations = improvement_recommendations(&analyses, &generics());
        assert!(recommendations[0].contains("seguridad y protección integral"));
        assert!(recommendations[1].contains("higiene, limpieza y desinfección"));
    }
}
