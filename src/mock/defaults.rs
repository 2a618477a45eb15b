// src/mock/defaults.rs
//! Default values for common type names

/// Literal used to initialise a stored property of `type_name`, if one is known.
///
/// `type_name` is matched as written; callers pass already-normalized names.
pub fn default_value(type_name: &str) -> Option<String> {
    if type_name.ends_with('?') {
        return Some("nil".to_string());
    }

    let is_literal_collection = type_name.starts_with('[') && type_name.ends_with(']');
    if is_literal_collection
        || type_name.starts_with("Array")
        || type_name.starts_with("Dictionary")
    {
        return Some(format!("{}()", type_name));
    }

    let value = match type_name {
        "Bool" => "false",
        "String" | "Character" => "\"\"",
        "Int" | "Int8" | "Int16" | "Int32" | "Int64" | "Double" | "CGFloat" | "Float" => "0",
        _ => return None,
    };

    Some(value.to_string())
}

/// `fetchItems` -> `FetchItems`
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional() {
        assert_eq!(default_value("Int?").as_deref(), Some("nil"));
        assert_eq!(default_value("[String]?").as_deref(), Some("nil"));
    }

    #[test]
    fn test_collections() {
        assert_eq!(default_value("[String]").as_deref(), Some("[String]()"));
        assert_eq!(
            default_value("[String: Int]").as_deref(),
            Some("[String: Int]()")
        );
        assert_eq!(
            default_value("Array<Int>").as_deref(),
            Some("Array<Int>()")
        );
        assert_eq!(
            default_value("Dictionary<String, Int>").as_deref(),
            Some("Dictionary<String, Int>()")
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(default_value("Bool").as_deref(), Some("false"));
        assert_eq!(default_value("String").as_deref(), Some("\"\""));
        assert_eq!(default_value("Character").as_deref(), Some("\"\""));
        for numeric in ["Int", "Int8", "Int16", "Int32", "Int64", "Double", "CGFloat", "Float"] {
            assert_eq!(default_value(numeric).as_deref(), Some("0"), "{}", numeric);
        }
    }

    #[test]
    fn test_unknown() {
        assert!(default_value("UIView").is_none());
        assert!(default_value("UInt").is_none());
    }

    #[test]
    fn test_type_name_matched_exactly() {
        assert!(default_value(" Int").is_none());
        assert!(default_value("Bool ").is_none());
        assert_eq!(default_value(" [Int]").as_deref(), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize_first_letter("fetch"), "Fetch");
        assert_eq!(capitalize_first_letter("URL"), "URL");
        assert_eq!(capitalize_first_letter(""), "");
    }
}
