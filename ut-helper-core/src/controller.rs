// workflow controller - owns the session records and gates generate on both uploads

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{Backend, GenerateRequest, GeneratedArtifact, PatternUpload, SourceUpload};
use crate::config::Config;
use crate::control::{Control, ControlState};
use crate::error::{WorkflowError, WorkflowResult};
use crate::output::OutputPane;
use crate::records::{PatternRecord, SourceRecord};
use crate::status::{Status, StatusBanner};
use crate::validation::{optional_field, validate_pattern_fields, validate_source_fields};

pub const UPLOAD_PATTERN_LABEL: &str = "Upload Pattern";
pub const UPLOAD_SOURCE_LABEL: &str = "Upload Source Code";
pub const GENERATE_LABEL: &str = "Generate Unit Tests";
pub const GENERATING_LABEL: &str = "Generating...";

pub const GENERATING_PLACEHOLDER: &str = "Generating unit tests...";
pub const GENERATION_FAILED_PLACEHOLDER: &str = "Failed to generate unit tests. Please try again.";

/// which trigger a caller is asking about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UploadPattern,
    UploadSource,
    Generate,
}

/// one controller per session. every operation takes `&self`, so different
/// operations may be in flight at once; the same operation may not
pub struct WorkflowController<B> {
    backend: B,
    required_suffix: String,
    pattern: Mutex<Option<PatternRecord>>,
    source: Mutex<Option<SourceRecord>>,
    upload_pattern: Control,
    upload_source: Control,
    generate: Control,
    status: StatusBanner,
    output: OutputPane,
}

impl<B: Backend> WorkflowController<B> {
    pub fn new(backend: B, config: &Config) -> Self {
        let controller = Self {
            backend,
            required_suffix: config.required_suffix.clone(),
            pattern: Mutex::new(None),
            source: Mutex::new(None),
            upload_pattern: Control::new("pattern upload", UPLOAD_PATTERN_LABEL, true),
            upload_source: Control::new("source upload", UPLOAD_SOURCE_LABEL, true),
            generate: Control::new("generation", GENERATE_LABEL, false)
                .with_busy_label(GENERATING_LABEL),
            status: StatusBanner::new(config.status_auto_hide()),
            output: OutputPane::default(),
        };
        controller.refresh_generate();
        controller
    }

    pub async fn submit_pattern(
        &self,
        name: &str,
        content: &str,
        description: Option<&str>,
    ) -> WorkflowResult<PatternRecord> {
        if let Err(err) = validate_pattern_fields(name, content) {
            return Err(self.fail(err));
        }
        let _guard = self.upload_pattern.try_acquire().map_err(|e| self.refuse(e))?;

        let request = PatternUpload {
            pattern_name: name.to_string(),
            pattern_content: content.to_string(),
            description: optional_field(description),
        };

        let result = match self.backend.upload_pattern(&request).await {
            Ok(receipt) => {
                tracing::debug!(message = ?receipt.message, "pattern confirmed");
                let record = PatternRecord {
                    name: request.pattern_name,
                    content: request.pattern_content,
                    description: request.description,
                };
                *lock(&self.pattern) = Some(record.clone());
                self.status.show(Status::success(format!(
                    "Pattern '{}' uploaded successfully!",
                    record.name
                )));
                Ok(record)
            }
            Err(err) => {
                self.status
                    .show(Status::error(format!("Error uploading pattern: {err}")));
                Err(err)
            }
        };

        self.refresh_generate();
        result
    }

    pub async fn submit_source_code(
        &self,
        file_name: &str,
        source_code: &str,
        package_name: Option<&str>,
    ) -> WorkflowResult<SourceRecord> {
        if let Err(err) = validate_source_fields(file_name, source_code, &self.required_suffix) {
            return Err(self.fail(err));
        }
        let _guard = self.upload_source.try_acquire().map_err(|e| self.refuse(e))?;

        let request = SourceUpload {
            file_name: file_name.to_string(),
            source_code: source_code.to_string(),
            package_name: optional_field(package_name),
        };

        let result = match self.backend.upload_source(&request).await {
            Ok(receipt) => {
                tracing::debug!(message = ?receipt.message, "source confirmed");
                let record = SourceRecord {
                    file_name: request.file_name,
                    source_code: request.source_code,
                    package_name: request.package_name,
                };
                *lock(&self.source) = Some(record.clone());
                self.status.show(Status::success(format!(
                    "Source file '{}' uploaded successfully!",
                    record.file_name
                )));
                Ok(record)
            }
            Err(err) => {
                self.status
                    .show(Status::error(format!("Error uploading source code: {err}")));
                Err(err)
            }
        };

        self.refresh_generate();
        result
    }

    pub async fn generate_artifact(
        &self,
        additional_context: Option<&str>,
    ) -> WorkflowResult<GeneratedArtifact> {
        let (pattern, source) = match (self.pattern(), self.source()) {
            (Some(pattern), Some(source)) => (pattern, source),
            _ => {
                return Err(self.fail(WorkflowError::Precondition(
                    "please upload both pattern and source code first".to_string(),
                )));
            }
        };
        let _guard = self.generate.try_acquire().map_err(|e| self.refuse(e))?;

        self.output.set(GENERATING_PLACEHOLDER);

        let request = GenerateRequest {
            pattern_content: pattern.content,
            source_code: source.source_code,
            file_name: source.file_name,
            pattern_name: pattern.name,
            additional_context: optional_field(additional_context),
        };

        match self.backend.generate_unit_tests(&request).await {
            Ok(artifact) => {
                self.output.set(&artifact.unit_tests);
                self.status.show(Status::success(format!(
                    "Unit tests generated successfully using pattern: {}",
                    artifact.pattern_used
                )));
                Ok(artifact)
            }
            Err(err) => {
                self.output.set(GENERATION_FAILED_PLACEHOLDER);
                self.status
                    .show(Status::error(format!("Generation failed: {err}")));
                Err(err)
            }
        }
    }

    /// enabled iff both records are present
    fn refresh_generate(&self) {
        let ready = lock(&self.pattern).is_some() && lock(&self.source).is_some();
        self.generate.set_available(ready);
    }

    fn fail(&self, err: WorkflowError) -> WorkflowError {
        self.status.show(Status::error(err.to_string()));
        err
    }

    fn refuse(&self, err: WorkflowError) -> WorkflowError {
        self.status.show(Status::info(err.to_string()));
        err
    }
}

impl<B> WorkflowController<B> {
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn pattern(&self) -> Option<PatternRecord> {
        lock(&self.pattern).clone()
    }

    pub fn source(&self) -> Option<SourceRecord> {
        lock(&self.source).clone()
    }

    pub fn control(&self, action: Action) -> &Control {
        match action {
            Action::UploadPattern => &self.upload_pattern,
            Action::UploadSource => &self.upload_source,
            Action::Generate => &self.generate,
        }
    }

    pub fn control_state(&self, action: Action) -> ControlState {
        self.control(action).state()
    }

    pub fn generate_enabled(&self) -> bool {
        self.generate.is_enabled()
    }

    pub fn status(&self) -> &StatusBanner {
        &self.status
    }

    pub fn output(&self) -> &OutputPane {
        &self.output
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
