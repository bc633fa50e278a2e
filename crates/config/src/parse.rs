//! Configuration text into the generic tree the validator works on.

use serde_json::Value;

use crate::error::ConfigError;

pub fn parse_yaml(input: &str) -> Result<Value, ConfigError> {
    serde_yaml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn parse_toml(input: &str) -> Result<Value, ConfigError> {
    toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
}

pub fn parse_json(input: &str) -> Result<Value, ConfigError> {
    serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yaml_tree() {
        let tree = parse_yaml(
            r#"
osmrelation: 42
filters:
  Budaörsi út:
    ranges:
      - {start: "1", end: "9"}
"#,
        )
        .unwrap();
        assert_eq!(tree["osmrelation"], json!(42));
        assert_eq!(tree["filters"]["Budaörsi út"]["ranges"][0]["end"], json!("9"));
    }

    #[test]
    fn yaml_keeps_quoted_numbers_as_strings() {
        let tree = parse_yaml("start: \"011\"\n").unwrap();
        assert_eq!(tree["start"], json!("011"));
    }

    #[test]
    fn toml_tree() {
        let tree = parse_toml(
            r#"
osmrelation = 42
street-filters = ["Névtelen"]

[refstreets]
"OSM Name" = "Ref Name"
"#,
        )
        .unwrap();
        assert_eq!(tree["street-filters"], json!(["Névtelen"]));
        assert_eq!(tree["refstreets"]["OSM Name"], json!("Ref Name"));
    }

    #[test]
    fn json_tree() {
        assert_eq!(parse_json("{\"source\": \"survey\"}").unwrap()["source"], json!("survey"));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse_yaml("a: [1"), Err(ConfigError::Parse(_))));
        assert!(matches!(parse_toml("a = "), Err(ConfigError::Parse(_))));
        assert!(matches!(parse_json("{"), Err(ConfigError::Parse(_))));
    }
}
