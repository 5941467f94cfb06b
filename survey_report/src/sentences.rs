//! Selects the descriptive sentence that accompanies each question's chart.
//!
//! The sentence shape depends on the number of distinct categories (1, 2, 3
//! or more) and on the kind of response set: a 1..5 numeric scale, a
//! satisfaction phrase, a qualitative rating or a generic answer. Pure
//! functions, no document state involved.

const SATISFACTION_TERMS: [&str; 3] = ["satisfecho", "satisfactorio", "satisfactoria"];
const RATING_TERMS: [&str; 6] = ["bueno", "buena", "malo", "mala", "regular", "excelente"];

/// Maps a 1..5 rating to the adjective ladder. Non-scale values pass through
/// unchanged.
pub fn describe_scale_value(value: &str) -> String {
    match value.trim() {
        "5" => "muy satisfactorio".to_string(),
        "4" => "satisfactorio".to_string(),
        "3" => "aceptable".to_string(),
        "2" => "insatisfactorio".to_string(),
        "1" => "muy insatisfactorio".to_string(),
        other => other.to_string(),
    }
}

fn is_numeric_scale(items: &[(String, String)]) -> bool {
    items
        .iter()
        .all(|(value, _)| matches!(value.trim(), "1" | "2" | "3" | "4" | "5"))
}

/// Builds the result sentence for the ordered (category, percentage) pairs of
/// one column analysis.
pub fn result_sentence(items: &[(String, String)]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let numeric = is_numeric_scale(items);
    let first = items[0].0.to_lowercase();
    let satisfaction = SATISFACTION_TERMS.iter().any(|t| first.contains(t));
    let rating = RATING_TERMS.iter().any(|t| first.contains(t));

    match items {
        [(v0, p0)] => {
            let label = if numeric {
                describe_scale_value(v0)
            } else {
                v0.clone()
            };
            if numeric {
                format!("El {}% da una calificación de {}.", p0, label)
            } else if satisfaction {
                format!("El {}% dio una respuesta de {}.", p0, label)
            } else if rating {
                format!("El {}% dan una calificación de {} a la pregunta.", p0, label)
            } else {
                format!("El {}% respondieron {}.", p0, label)
            }
        }
        [(v0, p0), (v1, p1)] => {
            if numeric {
                format!(
                    "Las respuesta es un {}% da una calificación de {} y un {}% da una \
                     calificación de {}.",
                    p0,
                    describe_scale_value(v0),
                    p1,
                    describe_scale_value(v1)
                )
            } else if satisfaction {
                format!("El {}% están {} y el {}% {}.", p0, v0, p1, v1)
            } else if rating {
                format!(
                    "El {}% dan una calificación de {} a la pregunta y el {}% da una \
                     calificación de {}.",
                    p0, v0, p1, v1
                )
            } else {
                format!("El {}% dio una respuesta de {} y el {}% de {}.", p0, v0, p1, v1)
            }
        }
        [(v0, p0), (v1, p1), (v2, p2)] => {
            if numeric {
                format!(
                    "El {}% da una calificación de {}, el {}% de {} y el {}% de {}.",
                    p0,
                    describe_scale_value(v0),
                    p1,
                    describe_scale_value(v1),
                    p2,
                    describe_scale_value(v2)
                )
            } else if satisfaction {
                format!(
                    "El {}% están {}, el {}% {} y el {}% {}.",
                    p0, v0, p1, v1, p2, v2
                )
            } else if rating {
                format!(
                    "El {}% dan una calificación de {}, el {}% de {} y el {}% de {}.",
                    p0, v0, p1, v1, p2, v2
                )
            } else {
                format!(
                    "El {}% respondieron {}, el {}% {} y el {}% {}.",
                    p0, v0, p1, v1, p2, v2
                )
            }
        }
        _ => {
            // More than three categories: a single enumeration with "y"
            // before the last item.
            let last = items.len() - 1;
            let parts: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, (value, pct))| {
                    let label = if numeric {
                        describe_scale_value(value)
                    } else {
                        value.clone()
                    };
                    if i == 0 {
                        format!("El {}% da una calificación de {}", pct, label)
                    } else if i == last {
                        format!("y el {}% de {}", pct, label)
                    } else {
                        format!("el {}% de {}", pct, label)
                    }
                })
                .collect();
            format!("{}.", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(v, p)| (v.to_string(), p.to_string()))
            .collect()
    }

    #[test]
    fn single_numeric_item() {
        let sentence = result_sentence(&items(&[("5", "100.0")]));
        assert_eq!(sentence, "El 100.0% da una calificación de muy satisfactorio.");
    }

    #[test]
    fn single_generic_item() {
        let sentence = result_sentence(&items(&[("Sí", "100.0")]));
        assert_eq!(sentence, "El 100.0% respondieron Sí.");
    }

    #[test]
    fn two_satisfaction_items() {
        let sentence = result_sentence(&items(&[("Satisfecho", "80.0"), ("Insatisfecho", "20.0")]));
        assert_eq!(sentence, "El 80.0% están Satisfecho y el 20.0% Insatisfecho.");
    }

    #[test]
    fn two_rating_items() {
        let sentence = result_sentence(&items(&[("Bueno", "70.0"), ("Regular", "30.0")]));
        assert_eq!(
            sentence,
            "El 70.0% dan una calificación de Bueno a la pregunta y el 30.0% da una \
             calificación de Regular."
        );
    }

    #[test]
    fn three_numeric_items() {
        let sentence = result_sentence(&items(&[("5", "60.0"), ("4", "30.0"), ("3", "10.0")]));
        assert_eq!(
            sentence,
            "El 60.0% da una calificación de muy satisfactorio, el 30.0% de satisfactorio y \
             el 10.0% de aceptable."
        );
    }

    #[test]
    fn four_items_use_the_enumeration_shape() {
        let sentence = result_sentence(&items(&[
            ("5", "40.0"),
            ("4", "30.0"),
            ("3", "20.0"),
            ("2", "10.0"),
        ]));
        assert_eq!(
            sentence,
            "El 40.0% da una calificación de muy satisfactorio, el 30.0% de satisfactorio, \
             el 20.0% de aceptable y el 10.0% de insatisfactorio."
        );
    }

    #[test]
    fn scale_ladder() {
        assert_eq!(describe_scale_value("1"), "muy insatisfactorio");
        assert_eq!(describe_scale_value(" 3 "), "aceptable");
        assert_eq!(describe_scale_value("No"), "No");
    }
}
