use serde_json::Value;

use crate::document::Fields;
use crate::resource::ResourceKind;

/// Typed extra attributes for a create call.
///
/// Each variant belongs to the one resource kind that accepts those
/// attributes. Unset options are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WriteOptions {
    #[default]
    None,
    ExpectationSuite {
        clause_id: Option<String>,
    },
    RenderedDataDoc {
        source_type: Option<String>,
        source_id: Option<String>,
    },
    SuiteValidationResult {
        contract_id: Option<String>,
        expectation_suite_id: Option<String>,
    },
}

impl WriteOptions {
    /// Kind these options apply to; `None` applies to every kind
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            WriteOptions::None => None,
            WriteOptions::ExpectationSuite { .. } => Some(ResourceKind::ExpectationSuite),
            WriteOptions::RenderedDataDoc { .. } => Some(ResourceKind::RenderedDataDoc),
            WriteOptions::SuiteValidationResult { .. } => {
                Some(ResourceKind::SuiteValidationResult)
            }
        }
    }

    pub fn into_fields(self) -> Fields {
        let pairs: Vec<(&str, Option<String>)> = match self {
            WriteOptions::None => Vec::new(),
            WriteOptions::ExpectationSuite { clause_id } => vec![("clause_id", clause_id)],
            WriteOptions::RenderedDataDoc {
                source_type,
                source_id,
            } => vec![("source_type", source_type), ("source_id", source_id)],
            WriteOptions::SuiteValidationResult {
                contract_id,
                expectation_suite_id,
            } => vec![
                ("contract_id", contract_id),
                ("expectation_suite_id", expectation_suite_id),
            ],
        };

        pairs
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), Value::String(v))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_are_omitted() {
        let fields = WriteOptions::RenderedDataDoc {
            source_type: Some("expectation_suite".to_string()),
            source_id: None,
        }
        .into_fields();

        assert_eq!(fields.len(), 1);
        assert_eq!(fields["source_type"], "expectation_suite");
    }

    #[test]
    fn test_option_fields_are_allowed_for_their_kind() {
        let options = WriteOptions::SuiteValidationResult {
            contract_id: Some("c".to_string()),
            expectation_suite_id: Some("s".to_string()),
        };
        let kind = options.kind().unwrap();
        for name in options.into_fields().keys() {
            assert!(kind.allowed_fields().contains(&name.as_str()));
        }
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(WriteOptions::None.kind(), None);
        assert!(WriteOptions::default().into_fields().is_empty());
    }
}
