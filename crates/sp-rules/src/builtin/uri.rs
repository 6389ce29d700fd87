//! URL rule

use url::Url;

use crate::registry::{RuleContext, RuleEvaluator, RuleOutcome};

/// `url`: absolute URL with a scheme and a host
///
/// An optional `schemes` parameter (array of strings) restricts the scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRule;

impl RuleEvaluator for UrlRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(text) = ctx.value.as_str() else {
            return RuleOutcome::Fail("must be a valid URL".to_string());
        };

        let url = match Url::parse(text.trim()) {
            Ok(url) if url.has_host() => url,
            _ => return RuleOutcome::Fail("must be a valid URL".to_string()),
        };

        if let Some(schemes) = ctx.descriptor.param("schemes").and_then(|s| s.as_array()) {
            let allowed = schemes
                .iter()
                .filter_map(|s| s.as_str())
                .any(|s| s.eq_ignore_ascii_case(url.scheme()));
            if !allowed {
                let list: Vec<&str> = schemes.iter().filter_map(|s| s.as_str()).collect();
                return RuleOutcome::Fail(format!("URL scheme must be one of: {}", list.join(", ")));
            }
        }

        RuleOutcome::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use sp_schema::{FieldSchema, FieldType, RuleDescriptor, ValueMap};

    fn check(descriptor: &RuleDescriptor, value: Value) -> RuleOutcome {
        let field = FieldSchema::new("endpoint", FieldType::Url);
        let siblings = ValueMap::new();
        UrlRule.evaluate(&RuleContext::new(&field, descriptor, &value, &siblings))
    }

    #[test]
    fn accepts_absolute_urls() {
        let rule = RuleDescriptor::new("url");
        assert!(check(&rule, json!("https://api.datadoghq.com")).is_pass());
        assert!(check(&rule, json!(" http://localhost:9090/api ")).is_pass());
    }

    #[test]
    fn rejects_relative_and_hostless() {
        let rule = RuleDescriptor::new("url");
        assert!(!check(&rule, json!("/api/v1")).is_pass());
        assert!(!check(&rule, json!("mailto:ops@example.com")).is_pass());
        assert!(!check(&rule, json!(12)).is_pass());
    }

    #[test]
    fn restricts_schemes() {
        let rule = RuleDescriptor::new("url").with_param("schemes", json!(["https"]));
        assert!(check(&rule, json!("https://grafana.example.com")).is_pass());
        assert_eq!(
            check(&rule, json!("http://grafana.example.com")),
            RuleOutcome::Fail("URL scheme must be one of: https".into())
        );
    }
}
