use conf_generator::{ConfGenerator, GeneratorConfig, Value, ValueMap, marker_depth};
use serde_json::json;

fn doc(value: serde_json::Value) -> Value {
    serde_json::from_value(value).expect("test documents are valid values")
}

/// Rewrites every leading run of `from` markers on every key into `to`
fn rewrite_markers(value: &Value, from: &str, to: &str) -> Value {
    match value {
        Value::Object(map) => {
            let mut rewritten = ValueMap::new();
            for (key, child) in map {
                let depth = marker_depth(key, from);
                let name = &key[depth * from.len()..];
                rewritten.insert(
                    format!("{}{}", to.repeat(depth), name),
                    rewrite_markers(child, from, to),
                );
            }
            Value::Object(rewritten)
        }
        Value::Array(items) => items
            .iter()
            .map(|item| rewrite_markers(item, from, to))
            .collect(),
        other => other.clone(),
    }
}

fn results(document: &Value, marker: &str) -> Vec<(Value, Value)> {
    let config = GeneratorConfig::new().with_marker(marker);
    ConfGenerator::with_config(document, config)
        .expect("Should demangle document")
        .generate()
        .map(|result| {
            let (config, summary) = result.expect("Should expand document");
            (config, summary.into_value())
        })
        .collect()
}

fn sample_documents() -> Vec<Value> {
    vec![
        doc(json!({"$alpha": [1, 2]})),
        doc(json!({
            "$alpha": {"a": 1, "b": 2, "c": 3, "d": 4},
            "$beta": {"a|c": 1, "b|d": 2}
        })),
        doc(json!({
            "$alpha": {"a": "a", "b": "b"},
            "$$beta": {"a": {"e": "ae", "f": "af"}, "b": {"e": "be", "f": "bf"}},
            "$gamma": {"e": "e", "f": "f"}
        })),
        doc(json!({"$alpha": [0], "$$beta": [[{"$alpha": [0], "$alpha_": [0]}]]})),
        doc(json!({"$alpha": {"a": "a", "b": "b"}, "beta": {"$alpha": [0, 1]}})),
    ]
}

#[cfg(test)]
mod custom_marker_tests {
    use super::*;

    #[test]
    fn test_multi_character_marker() {
        let document = doc(json!({
            "1#alpha": [0],
            "1#1#beta": [[{"1#alpha": [0], "1#alpha_": [0]}]]
        }));
        let results = results(&document, "1#");
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].1,
            doc(json!({
                "alpha": 0,
                "alpha$1": 0,
                "alpha_": 0,
                "beta": {"1#alpha": [0], "1#alpha_": [0]}
            }))
        );
    }

    #[test]
    fn test_default_marker_is_plain_key_under_custom_marker() {
        let document = doc(json!({"$alpha": [1, 2], "%beta": [3, 4]}));
        let results = results(&document, "%");
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].0,
            doc(json!({"$alpha": [1, 2], "beta": 3}))
        );
    }

    #[test]
    fn test_marker_rewrite_gives_identical_expansion() {
        for document in sample_documents() {
            let expected = results(&document, "$");
            let rewritten = rewrite_markers(&document, "$", "%%");
            let actual: Vec<(Value, Value)> = results(&rewritten, "%%")
                .into_iter()
                .map(|(config, summary)| {
                    // unresolved groups in summaries carry the marker they were written with
                    (config, rewrite_markers(&summary, "%%", "$"))
                })
                .collect();
            assert_eq!(actual, expected, "for document {}", document);
        }
    }
}

#[cfg(test)]
mod idempotence_tests {
    use super::*;

    #[test]
    fn test_expanded_configurations_are_fixed_points() {
        for document in sample_documents() {
            for (config, _) in results(&document, "$") {
                let again = results(&config, "$");
                assert_eq!(again.len(), 1, "for configuration {}", config);
                assert_eq!(again[0].0, config);
                assert_eq!(again[0].1, doc(json!({})));
            }
        }
    }

    #[test]
    fn test_scalar_document() {
        assert_eq!(
            results(&Value::from("just a string"), "$"),
            vec![(Value::from("just a string"), doc(json!({})))]
        );
    }
}
