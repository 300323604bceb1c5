use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Logical category of a record stored in the remote service.
///
/// The set is closed: every variant has exactly one row in the registry
/// table, so a lookup can never miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    ExpectationSuite,
    Checkpoint,
    Contract,
    Datasource,
    DataContext,
    SuiteValidationResult,
    RenderedDataDoc,
    DataContextVariables,
}

/// Static description of one resource kind.
#[derive(Debug)]
struct KindEntry {
    type_name: &'static str,
    resource_name: &'static str,
    attribute_key: &'static str,
    allowed_fields: &'static [&'static str],
}

// Indexed by `ResourceKind as usize`; keep the order in sync with the enum.
const REGISTRY: [KindEntry; 8] = [
    KindEntry {
        type_name: "expectation_suite",
        resource_name: "expectation_suites",
        attribute_key: "suite",
        allowed_fields: &["clause_id"],
    },
    KindEntry {
        type_name: "checkpoint",
        resource_name: "checkpoints",
        attribute_key: "checkpoint_config",
        allowed_fields: &[],
    },
    KindEntry {
        type_name: "contract",
        resource_name: "contracts",
        attribute_key: "checkpoint_config",
        allowed_fields: &[],
    },
    KindEntry {
        type_name: "datasource",
        resource_name: "datasources",
        attribute_key: "datasource_config",
        allowed_fields: &[],
    },
    KindEntry {
        type_name: "data_context",
        resource_name: "data_contexts",
        attribute_key: "data_context_config",
        allowed_fields: &[],
    },
    KindEntry {
        type_name: "suite_validation_result",
        resource_name: "suite_validation_results",
        attribute_key: "result",
        allowed_fields: &["contract_id", "expectation_suite_id"],
    },
    KindEntry {
        type_name: "rendered_data_doc",
        resource_name: "rendered_data_docs",
        attribute_key: "rendered_data_doc",
        allowed_fields: &["source_type", "source_id"],
    },
    KindEntry {
        type_name: "data_context_variables",
        resource_name: "data_context_variables",
        attribute_key: "data_context_variables",
        allowed_fields: &[],
    },
];

impl ResourceKind {
    /// Every kind, in registry order.
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::ExpectationSuite,
        ResourceKind::Checkpoint,
        ResourceKind::Contract,
        ResourceKind::Datasource,
        ResourceKind::DataContext,
        ResourceKind::SuiteValidationResult,
        ResourceKind::RenderedDataDoc,
        ResourceKind::DataContextVariables,
    ];

    fn entry(self) -> &'static KindEntry {
        &REGISTRY[self as usize]
    }

    /// Name sent as `data.type` in request bodies
    pub fn type_name(self) -> &'static str {
        self.entry().type_name
    }

    /// Plural resource name used to build collection URLs
    pub fn resource_name(self) -> &'static str {
        self.entry().resource_name
    }

    /// Attribute under which the stored value is nested in a request body
    pub fn attribute_key(self) -> &'static str {
        self.entry().attribute_key
    }

    /// Extra top-level attributes a caller may supply on create
    pub fn allowed_fields(self) -> &'static [&'static str] {
        self.entry().allowed_fields
    }

    /// Singularize a plural resource name back into its kind.
    ///
    /// Accepts both `_` and `-` as word separators, so
    /// `"expectation-suites"` and `"expectation_suites"` resolve the same.
    pub fn from_resource_name(name: &str) -> Option<ResourceKind> {
        let normalized = name.trim().replace('-', "_");
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.resource_name() == normalized)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for ResourceKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.type_name() == normalized)
            .ok_or_else(|| StoreError::configuration(format!("unknown resource type: {}", s)))
    }
}

/// Normalize word separators to `-` for use in URL paths.
pub fn hyphen(name: &str) -> String {
    name.replace(['_', ' '], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_matches_enum() {
        for kind in ResourceKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::json!(kind.type_name()));
        }
    }

    #[test]
    fn test_attribute_keys() {
        assert_eq!(ResourceKind::ExpectationSuite.attribute_key(), "suite");
        assert_eq!(ResourceKind::SuiteValidationResult.attribute_key(), "result");
        assert_eq!(ResourceKind::Checkpoint.attribute_key(), "checkpoint_config");
        assert_eq!(ResourceKind::Contract.attribute_key(), "checkpoint_config");
    }

    #[test]
    fn test_allowed_fields_default_empty() {
        assert!(ResourceKind::Datasource.allowed_fields().is_empty());
        assert_eq!(
            ResourceKind::RenderedDataDoc.allowed_fields(),
            &["source_type", "source_id"]
        );
    }

    #[test]
    fn test_singularize_accepts_hyphens() {
        assert_eq!(
            ResourceKind::from_resource_name("expectation-suites"),
            Some(ResourceKind::ExpectationSuite)
        );
        assert_eq!(
            ResourceKind::from_resource_name("data_context_variables"),
            Some(ResourceKind::DataContextVariables)
        );
        assert_eq!(ResourceKind::from_resource_name("widgets"), None);
    }

    #[test]
    fn test_from_str() {
        let kind: ResourceKind = "rendered_data_doc".parse().unwrap();
        assert_eq!(kind, ResourceKind::RenderedDataDoc);
        assert!("widget".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_hyphen() {
        assert_eq!(hyphen("suite_validation_results"), "suite-validation-results");
        assert_eq!(hyphen("rendered data docs"), "rendered-data-docs");
    }
}
