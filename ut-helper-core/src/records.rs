// session records - what the backend has confirmed so far

/// a pattern the backend accepted. replaced wholesale by the next successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRecord {
    pub name: String,
    pub content: String,
    pub description: Option<String>,
}

/// a source file the backend accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub file_name: String,
    pub source_code: String,
    pub package_name: Option<String>,
}
