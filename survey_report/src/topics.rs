//! Maps a question's free text to a short thematic label.

/// Ordered keyword rules. They are evaluated top to bottom and the first rule
/// with any case-insensitive substring match wins; the order is part of the
/// observable behavior and must not change.
const TOPIC_RULES: &[(&[&str], &str)] = &[
    (&["calidad", "servicio"], "la calidad del servicio"),
    (&["atención", "niño", "hijo"], "la atención a los niños"),
    (
        &["espacio", "ambiente", "infraestructura"],
        "la organización del espacio",
    ),
    (
        &["talento", "equipo", "agente", "personal", "docente"],
        "el compromiso del talento humano",
    ),
    (
        &["aliment", "comida", "menú", "complemento"],
        "los complementos alimentarios",
    ),
    (
        &["comunicación", "información"],
        "la comunicación con las familias",
    ),
    (
        &["pedagógic", "actividad", "enseñanza"],
        "las actividades pedagógicas",
    ),
    (&["familia", "participación"], "la participación familiar"),
    (&["higiene", "limpieza", "aseo"], "las condiciones de higiene"),
    (&["seguridad", "protección"], "las medidas de seguridad"),
    (&["queja", "reclamo"], "la atención a quejas y reclamos"),
    (&["material", "recurso"], "los materiales y recursos"),
    (&["horario", "tiempo"], "la organización de horarios"),
    (
        &["relaciones", "interpersonal"],
        "las relaciones interpersonales",
    ),
];

/// Returns the thematic label for a question text.
///
/// When no rule matches, the label is derived from the question itself:
/// questions longer than 50 characters are truncated to their first 47
/// lowercased characters plus an ellipsis.
pub fn classify(question: &str) -> String {
    let lower = question.to_lowercase();
    for (keywords, topic) in TOPIC_RULES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return (*topic).to_string();
        }
    }

    if question.chars().count() > 50 {
        let prefix: String = lower.chars().take(47).collect();
        format!("los aspectos relacionados con {}...", prefix)
    } else {
        format!("los aspectos de {}", lower)
    }
}
