//! Positional parser for comma-separated estimate replies.

use crate::domain::errors::MalformedEstimate;
use crate::domain::estimate::schema::{EstimateSchema, FieldKind};

/// The typed result of a successfully parsed reply.
///
/// Only the fields the schema requested are populated; the rest stay `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedEstimate {
    pub food: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub quantity: Option<String>,
}

/// Split `raw` on commas and decode it against `schema`.
///
/// Fields are trimmed of surrounding whitespace; numeric positions accept
/// integers or floats. Extra trailing fields beyond the schema are ignored
/// (models occasionally append commentary). There is no plausibility check:
/// a negative or absurd calorie count parses fine and is stored as-is.
pub fn parse_estimate(
    schema: &EstimateSchema,
    raw: &str,
) -> Result<ParsedEstimate, MalformedEstimate> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() < schema.min_fields() {
        return Err(MalformedEstimate::NotEnoughFields {
            expected: schema.min_fields(),
            got: parts.len(),
        });
    }

    let mut estimate = ParsedEstimate::default();
    for (field, part) in schema.fields.iter().zip(parts.iter()) {
        let value = part.trim();
        match field.kind {
            FieldKind::Text => {
                match field.name {
                    "food" => estimate.food = value.to_string(),
                    "quantity" => estimate.quantity = Some(value.to_string()),
                    other => unreachable!("unknown text field '{other}' in schema"),
                }
            }
            FieldKind::Number => {
                let number: f64 =
                    value.parse().map_err(|_| MalformedEstimate::InvalidNumber {
                        field: field.name,
                        value: value.to_string(),
                    })?;
                match field.name {
                    "calories" => estimate.calories = number,
                    "protein" => estimate.protein = number,
                    "fat" => estimate.fat = Some(number),
                    "fiber" => estimate.fiber = Some(number),
                    other => unreachable!("unknown numeric field '{other}' in schema"),
                }
            }
        }
    }

    Ok(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::estimate::schema::EstimateSchemaVersion;

    fn schema(version: EstimateSchemaVersion) -> &'static EstimateSchema {
        EstimateSchema::get(version)
    }

    #[test]
    fn parses_basic_reply_with_whitespace() {
        let parsed =
            parse_estimate(schema(EstimateSchemaVersion::Basic), " Greek Salad , 320 , 12.5 ")
                .unwrap();
        assert_eq!(parsed.food, "Greek Salad");
        assert_eq!(parsed.calories, 320.0);
        assert_eq!(parsed.protein, 12.5);
        assert_eq!(parsed.fat, None);
        assert_eq!(parsed.quantity, None);
    }

    #[test]
    fn parses_full_reply_including_quantity() {
        let parsed = parse_estimate(
            schema(EstimateSchemaVersion::Full),
            "Lentil soup, 280, 14, 6, 9, 1 bowl (approx. 350g)",
        )
        .unwrap();
        assert_eq!(parsed.fat, Some(6.0));
        assert_eq!(parsed.fiber, Some(9.0));
        assert_eq!(parsed.quantity.as_deref(), Some("1 bowl (approx. 350g)"));
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let err = parse_estimate(schema(EstimateSchemaVersion::Basic), "just a sentence")
            .unwrap_err();
        assert_eq!(err, MalformedEstimate::NotEnoughFields { expected: 3, got: 1 });
    }

    #[test]
    fn non_numeric_calorie_field_names_the_offender() {
        let err = parse_estimate(
            schema(EstimateSchemaVersion::Basic),
            "Pizza, about three hundred, 11",
        )
        .unwrap_err();
        assert_eq!(
            err,
            MalformedEstimate::InvalidNumber {
                field: "calories",
                value: "about three hundred".to_string(),
            }
        );
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let parsed = parse_estimate(
            schema(EstimateSchemaVersion::Basic),
            "Apple, 95, 0.5, extra, commentary",
        )
        .unwrap();
        assert_eq!(parsed.food, "Apple");
        assert_eq!(parsed.protein, 0.5);
    }

    #[test]
    fn integer_and_float_forms_both_coerce() {
        let parsed = parse_estimate(
            schema(EstimateSchemaVersion::Macros),
            "Oatmeal, 150, 5, 2.5, 4",
        )
        .unwrap();
        assert_eq!(parsed.calories, 150.0);
        assert_eq!(parsed.fat, Some(2.5));
    }

    #[test]
    fn implausible_values_are_accepted_verbatim() {
        // Known gap: no range checks on model output.
        let parsed =
            parse_estimate(schema(EstimateSchemaVersion::Basic), "Mystery, -500, 99999").unwrap();
        assert_eq!(parsed.calories, -500.0);
        assert_eq!(parsed.protein, 99999.0);
    }
}
