use serde_json::Value;

/// Coerces a JSON value that may be a plain string or a locale object
/// (`{"de": ..., "default": ...}`) into a single display string.
///
/// Every place that displays or groups by a label goes through this one
/// function so the same logical category never splits into two groups
/// over a representation difference. Preference order: `de`, then
/// `default`, then the compact JSON rendering of the value.
pub fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Object(map) => {
            for key in ["de", "default"] {
                if let Some(Value::String(text)) = map.get(key) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        return Some(trimmed.to_string());
                    }
                }
            }
            Some(value.to_string())
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_strings_pass_through_trimmed() {
        assert_eq!(
            display_string(&json!("  Kommunikation ")),
            Some("Kommunikation".to_string())
        );
        assert_eq!(display_string(&json!("")), None);
        assert_eq!(display_string(&Value::Null), None);
    }

    #[test]
    fn locale_objects_prefer_de_then_default() {
        assert_eq!(
            display_string(&json!({"de": "Einstieg", "default": "Opening"})),
            Some("Einstieg".to_string())
        );
        assert_eq!(
            display_string(&json!({"default": "Opening"})),
            Some("Opening".to_string())
        );
    }

    #[test]
    fn unknown_shapes_fall_back_to_raw_json() {
        assert_eq!(
            display_string(&json!({"en": "Opening"})),
            Some(r#"{"en":"Opening"}"#.to_string())
        );
    }
}
