//! Structural comparison against observed objects
//!
//! The cluster decorates every stored object with defaults, status, and
//! bookkeeping the renderer never produces. Equality checks therefore run
//! one-directional: the rendered object is the authority on which fields
//! matter, the observed object may carry arbitrarily more.

use serde_json::Value;

/// Compare a rendered object against an observed one.
///
/// Every field of `rendered` must exist and match in `observed`;
/// observed-only fields are ignored. A null in `rendered` matches any
/// counterpart, so templates can omit values without forcing updates.
/// Arrays compare pairwise and must have equal length.
pub fn is_derivative_equal(rendered: &Value, observed: &Value) -> bool {
    match rendered {
        Value::Null => true,
        Value::Object(fields) => fields.iter().all(|(key, value)| match observed.get(key) {
            Some(counterpart) => is_derivative_equal(value, counterpart),
            None => value.is_null(),
        }),
        Value::Array(items) => match observed.as_array() {
            Some(counterparts) => {
                items.len() == counterparts.len()
                    && items
                        .iter()
                        .zip(counterparts)
                        .all(|(item, counterpart)| is_derivative_equal(item, counterpart))
            }
            None => false,
        },
        scalar => scalar == observed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_extra_observed_fields_do_not_break_equality() {
        let rendered = json!({"spec": {"replicas": 1}});
        let observed = json!({
            "spec": {"replicas": 1, "strategy": "RollingUpdate"},
            "status": {"readyReplicas": 1},
            "metadata": {"resourceVersion": "7"},
        });
        assert!(is_derivative_equal(&rendered, &observed));
    }

    #[test]
    fn test_missing_rendered_field_means_drift() {
        let rendered = json!({"spec": {"replicas": 2}});
        let observed = json!({"spec": {}});
        assert!(!is_derivative_equal(&rendered, &observed));
    }

    #[test]
    fn test_changed_scalar_means_drift() {
        let rendered = json!({"spec": {"replicas": 2}});
        let observed = json!({"spec": {"replicas": 1}});
        assert!(!is_derivative_equal(&rendered, &observed));
    }

    #[test]
    fn test_null_matches_any_counterpart() {
        let rendered = json!({"spec": null});
        let observed = json!({"spec": {"replicas": 3}});
        assert!(is_derivative_equal(&rendered, &observed));
        assert!(is_derivative_equal(&Value::Null, &json!("anything")));
    }

    #[test]
    fn test_arrays_compare_pairwise() {
        let rendered = json!({"ports": [{"port": 50051}, {"port": 2947}]});
        let within = json!({"ports": [{"port": 50051, "protocol": "TCP"}, {"port": 2947}]});
        assert!(is_derivative_equal(&rendered, &within));

        let reordered = json!({"ports": [{"port": 2947}, {"port": 50051}]});
        assert!(!is_derivative_equal(&rendered, &reordered));

        let shorter = json!({"ports": [{"port": 50051}]});
        assert!(!is_derivative_equal(&rendered, &shorter));
    }

    #[test]
    fn test_comparison_is_one_directional() {
        let rendered = json!({"a": 1});
        let observed = json!({"a": 1, "b": 2});
        assert!(is_derivative_equal(&rendered, &observed));
        assert!(!is_derivative_equal(&observed, &rendered));
    }

    fn json_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| Value::Number(n.into())),
            "[a-z]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn every_value_derives_from_itself(value in json_value()) {
            prop_assert!(is_derivative_equal(&value, &value));
        }

        #[test]
        fn null_derives_from_everything(value in json_value()) {
            prop_assert!(is_derivative_equal(&Value::Null, &value));
        }

        #[test]
        fn observed_extras_never_cause_drift(
            entries in prop::collection::btree_map("[a-z]{1,6}", json_value(), 0..6),
            noise in json_value(),
        ) {
            let rendered = Value::Object(entries.clone().into_iter().collect());
            let mut observed: serde_json::Map<String, Value> = entries.into_iter().collect();
            // Key length keeps this from colliding with generated keys.
            observed.insert("zzz_extra".to_string(), noise);
            prop_assert!(is_derivative_equal(&rendered, &Value::Object(observed)));
        }
    }
}
