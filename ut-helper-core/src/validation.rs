// input checks run before any network call

use crate::error::{WorkflowError, WorkflowResult};

/// check that a value has something other than whitespace in it
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// pattern name and content are both required
pub fn validate_pattern_fields(name: &str, content: &str) -> WorkflowResult<()> {
    if !is_present(name) || !is_present(content) {
        return Err(WorkflowError::Validation(
            "please provide both pattern name and content".to_string(),
        ));
    }
    Ok(())
}

/// file name and source code are required, and the file name must carry the
/// required suffix on its final path segment
pub fn validate_source_fields(
    file_name: &str,
    source_code: &str,
    required_suffix: &str,
) -> WorkflowResult<()> {
    if !is_present(file_name) || !is_present(source_code) {
        return Err(WorkflowError::Validation(
            "please provide both file name and source code".to_string(),
        ));
    }
    if !has_required_suffix(file_name, required_suffix) {
        return Err(WorkflowError::Validation(format!(
            "file must be a source file ending in {required_suffix}"
        )));
    }
    Ok(())
}

/// look only at the last path segment, so `pkg.go/main.txt` is rejected
pub fn has_required_suffix(file_name: &str, required_suffix: &str) -> bool {
    let trimmed = file_name.trim();
    let segment = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    segment.ends_with(required_suffix)
}

/// optional fields are passed through as given; only an empty one becomes null
pub fn optional_field(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_requires_name_and_content() {
        assert!(validate_pattern_fields("standard", "use table tests").is_ok());
        assert!(matches!(
            validate_pattern_fields("   ", "use table tests"),
            Err(WorkflowError::Validation(_))
        ));
        assert!(matches!(
            validate_pattern_fields("standard", "\n\t"),
            Err(WorkflowError::Validation(_))
        ));
    }

    #[test]
    fn source_requires_suffix_on_last_segment() {
        assert!(validate_source_fields("main.go", "package main", ".go").is_ok());
        assert!(validate_source_fields("cmd/server/main.go", "package main", ".go").is_ok());
        assert!(validate_source_fields("cmd\\server\\main.go", "package main", ".go").is_ok());

        let err = validate_source_fields("main.py", "print()", ".go").unwrap_err();
        assert_eq!(err.to_string(), "file must be a source file ending in .go");
        assert!(!has_required_suffix("pkg.go/main.txt", ".go"));
        assert!(!has_required_suffix("main.GO", ".go"));
    }

    #[test]
    fn source_requires_both_fields_before_suffix() {
        let err = validate_source_fields("main.go", "  ", ".go").unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Validation("please provide both file name and source code".to_string())
        );
    }

    #[test]
    fn only_empty_optional_fields_become_none() {
        assert_eq!(optional_field(None), None);
        assert_eq!(optional_field(Some("")), None);
        assert_eq!(optional_field(Some("  ")), Some("  ".to_string()));
        assert_eq!(optional_field(Some("billing")), Some("billing".to_string()));
    }
}
