//! Versioned descriptor of the comma-separated estimate reply.
//!
//! The field order and count of the model's reply is a contract between the
//! prompt we send and the parser that decodes the answer. Both sides are
//! derived from the same `EstimateSchema` constant so they cannot drift
//! independently (earlier iterations of the tracker evolved the prompt and
//! the split-by-comma code separately and broke each other more than once).

pub use shared::EstimateSchemaVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// One position in the reply: its internal name, the label used in the
/// prompt, and whether the parser coerces it to a number.
#[derive(Debug, Clone, Copy)]
pub struct EstimateField {
    pub name: &'static str,
    pub prompt_label: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, prompt_label: &'static str, kind: FieldKind) -> EstimateField {
    EstimateField { name, prompt_label, kind }
}

/// Ordered field list for one schema version.
#[derive(Debug, Clone, Copy)]
pub struct EstimateSchema {
    pub version: EstimateSchemaVersion,
    pub fields: &'static [EstimateField],
}

const BASIC_FIELDS: [EstimateField; 3] = [
    field("food", "Food Name", FieldKind::Text),
    field("calories", "Calories (number)", FieldKind::Number),
    field("protein", "Protein in grams (number)", FieldKind::Number),
];

const MACROS_FIELDS: [EstimateField; 5] = [
    field("food", "Food Name", FieldKind::Text),
    field("calories", "Calories (number)", FieldKind::Number),
    field("protein", "Protein in grams (number)", FieldKind::Number),
    field("fat", "Fat in grams (number)", FieldKind::Number),
    field("fiber", "Fiber in grams (number)", FieldKind::Number),
];

const FULL_FIELDS: [EstimateField; 6] = [
    field("food", "Food Name", FieldKind::Text),
    field("calories", "Calories (number)", FieldKind::Number),
    field("protein", "Protein in grams (number)", FieldKind::Number),
    field("fat", "Fat in grams (number)", FieldKind::Number),
    field("fiber", "Fiber in grams (number)", FieldKind::Number),
    field("quantity", "Estimated quantity description", FieldKind::Text),
];

const BASIC: EstimateSchema = EstimateSchema {
    version: EstimateSchemaVersion::Basic,
    fields: &BASIC_FIELDS,
};

const MACROS: EstimateSchema = EstimateSchema {
    version: EstimateSchemaVersion::Macros,
    fields: &MACROS_FIELDS,
};

const FULL: EstimateSchema = EstimateSchema {
    version: EstimateSchemaVersion::Full,
    fields: &FULL_FIELDS,
};

impl EstimateSchema {
    pub fn get(version: EstimateSchemaVersion) -> &'static EstimateSchema {
        match version {
            EstimateSchemaVersion::Basic => &BASIC,
            EstimateSchemaVersion::Macros => &MACROS,
            EstimateSchemaVersion::Full => &FULL,
        }
    }

    /// Minimum number of comma-separated fields a reply must contain.
    pub fn min_fields(&self) -> usize {
        self.fields.len()
    }

    /// The fixed instruction sent to the model ahead of the user input.
    pub fn instruction(&self) -> String {
        let labels: Vec<&str> = self.fields.iter().map(|f| f.prompt_label).collect();
        format!(
            "Analyze this food. Return ONLY a comma-separated list: {}. \
             No extra words, no units, no explanations.",
            labels.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_lists_fields_in_schema_order() {
        let instruction = EstimateSchema::get(EstimateSchemaVersion::Basic).instruction();
        assert!(instruction.contains("Food Name, Calories (number), Protein in grams (number)"));
    }

    #[test]
    fn field_counts_match_versions() {
        assert_eq!(EstimateSchema::get(EstimateSchemaVersion::Basic).min_fields(), 3);
        assert_eq!(EstimateSchema::get(EstimateSchemaVersion::Macros).min_fields(), 5);
        assert_eq!(EstimateSchema::get(EstimateSchemaVersion::Full).min_fields(), 6);
    }

    #[test]
    fn quantity_is_last_on_the_full_schema() {
        let schema = EstimateSchema::get(EstimateSchemaVersion::Full);
        assert_eq!(schema.fields.last().unwrap().name, "quantity");
    }
}
