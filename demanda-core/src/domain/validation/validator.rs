// demanda-core/src/domain/validation/validator.rs

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::domain::cleaning::{CanonicalMatch, CleaningRules, TextNormalizer};
use crate::domain::record::{Dataset, FieldKind, FieldValue, Record};
use crate::domain::validation::result::{RuleId, ValidationResult, Violation};

/// Checks cleaned records against the business rules. Never mutates records;
/// every problem becomes a violation in the result, never an error.
pub struct Validator {
    rules: CleaningRules,
    text: TextNormalizer,
}

impl Validator {
    pub fn new(rules: &CleaningRules) -> Self {
        Self {
            text: TextNormalizer::new(&rules.aliases, rules.similarity_threshold),
            rules: rules.clone(),
        }
    }

    pub fn validate(&self, dataset: &Dataset) -> Vec<ValidationResult> {
        dataset
            .records
            .iter()
            .map(|record| self.validate_record(dataset, record))
            .collect()
    }

    pub fn validate_record(&self, dataset: &Dataset, record: &Record) -> ValidationResult {
        let mut violations = Vec::new();

        self.check_critical_fields(dataset, record, &mut violations);
        self.check_field_formats(dataset, record, &mut violations);
        self.check_vocabularies(dataset, record, &mut violations);
        self.check_date_order(dataset, record, &mut violations);

        ValidationResult {
            row: record.row,
            violations,
        }
    }

    /// A record missing any critical field is always flagged.
    fn check_critical_fields(
        &self,
        dataset: &Dataset,
        record: &Record,
        violations: &mut Vec<Violation>,
    ) {
        for field in &self.rules.critical_fields {
            let missing = match dataset.value(record, field) {
                Some(value) => value.is_missing(),
                // A critical column absent from the table counts as missing too.
                None => true,
            };
            if missing {
                violations.push(Violation::critical(
                    RuleId::MissingCritical,
                    format!("{field} not defined"),
                ));
            }
        }
    }

    /// Invalid markers left by the normalizers become violations here.
    fn check_field_formats(
        &self,
        dataset: &Dataset,
        record: &Record,
        violations: &mut Vec<Violation>,
    ) {
        for (idx, value) in record.values.iter().enumerate() {
            let field = &dataset.headers[idx];
            match (dataset.kinds[idx], value) {
                (FieldKind::Date, FieldValue::Invalid { raw }) => {
                    violations.push(Violation::critical(
                        RuleId::DateInvalid,
                        format!("{field}: '{raw}' is not a recognizable date"),
                    ));
                }
                (FieldKind::Date, FieldValue::Date(date)) => {
                    if !self.rules.date_range.contains(*date) {
                        violations.push(Violation::critical(
                            RuleId::DateOutOfRange,
                            format!(
                                "{field}: {date} outside expected range {}..{}",
                                self.rules.date_range.min, self.rules.date_range.max
                            ),
                        ));
                    }
                }
                (FieldKind::Money | FieldKind::Percent, FieldValue::Invalid { raw }) => {
                    violations.push(Violation::warning(
                        RuleId::AmountInvalid,
                        format!("{field}: '{raw}' is not a parseable amount"),
                    ));
                }
                _ => {}
            }
        }
    }

    /// Membership of categorical fields in their configured vocabulary.
    /// Unknown values pass through but are flagged for manual review.
    fn check_vocabularies(
        &self,
        dataset: &Dataset,
        record: &Record,
        violations: &mut Vec<Violation>,
    ) {
        for vocab in &self.rules.vocabularies {
            let Some(FieldValue::Text(value)) = dataset.value(record, &vocab.field) else {
                continue;
            };
            if let CanonicalMatch::Unknown { closest } =
                self.text.canonicalize(value, &vocab.values)
            {
                let detail = match closest {
                    Some((candidate, score)) => format!(
                        " (closest: '{candidate}', {:.0}% similar)",
                        score * 100.0
                    ),
                    None => String::new(),
                };
                violations.push(Violation::warning(
                    RuleId::UnknownValue,
                    format!(
                        "{}: '{value}' not recognized{detail}; flagged for manual review",
                        vocab.field
                    ),
                ));
            }
        }
    }

    /// Cross-field consistency: a completion date must not precede the start.
    fn check_date_order(
        &self,
        dataset: &Dataset,
        record: &Record,
        violations: &mut Vec<Violation>,
    ) {
        for rule in &self.rules.consistency {
            let start = dataset
                .value(record, &rule.start_field)
                .and_then(FieldValue::as_date);
            let end = dataset
                .value(record, &rule.end_field)
                .and_then(FieldValue::as_date);
            if let (Some(start), Some(end)) = (start, end)
                && end < start
            {
                violations.push(Violation::critical(
                    RuleId::InconsistentDates,
                    format!(
                        "{} ({end}) precedes {} ({start})",
                        rule.end_field, rule.start_field
                    ),
                ));
            }
        }
    }

    /// Unknown categorical values per field, for the report's "new values"
    /// ledger (sorted for determinism).
    pub fn collect_new_values(&self, dataset: &Dataset) -> BTreeMap<String, Vec<String>> {
        let mut ledger: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for vocab in &self.rules.vocabularies {
            for record in &dataset.records {
                let Some(FieldValue::Text(value)) = dataset.value(record, &vocab.field) else {
                    continue;
                };
                if matches!(
                    self.text.canonicalize(value, &vocab.values),
                    CanonicalMatch::Unknown { .. }
                ) {
                    ledger
                        .entry(vocab.field.clone())
                        .or_default()
                        .insert(value.clone());
                }
            }
        }
        ledger
            .into_iter()
            .map(|(field, values)| (field, values.into_iter().collect()))
            .collect()
    }
}
