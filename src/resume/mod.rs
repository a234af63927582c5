//! Resume upload → analyze → render

use crate::api::{InterviewApi, ResumeAnalysis};
use crate::error::SessionError;
use crate::toast::Toaster;
use crate::ui::{analyze_control, ResumeView, Ui};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const INVALID_TYPE_MESSAGE: &str = "Please upload a PDF or DOCX file";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze resume. Please try again.";

/// How the file reached the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    DragDrop,
    Picker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Docx => DOCX_MIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub name: String,
    /// MIME type reported by the browser, if any
    pub mime: Option<String>,
    pub data: Vec<u8>,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, mime: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.map(str::to_string),
            data,
        }
    }

    /// Accepted if either the MIME type or the extension says PDF/DOCX
    pub fn format(&self) -> Option<ResumeFormat> {
        let by_mime = match self.mime.as_deref() {
            Some(PDF_MIME) => Some(ResumeFormat::Pdf),
            Some(DOCX_MIME) => Some(ResumeFormat::Docx),
            _ => None,
        };

        by_mime.or_else(|| {
            let ext = Path::new(&self.name)
                .extension()?
                .to_str()?
                .to_ascii_lowercase();
            match ext.as_str() {
                "pdf" => Some(ResumeFormat::Pdf),
                "docx" => Some(ResumeFormat::Docx),
                _ => None,
            }
        })
    }

    pub fn content_type(&self) -> &str {
        match (self.mime.as_deref(), self.format()) {
            (Some(mime), _) if !mime.is_empty() => mime,
            (_, Some(format)) => format.mime(),
            _ => "application/octet-stream",
        }
    }
}

pub fn validate_resume(file: &ResumeFile) -> Result<ResumeFormat, SessionError> {
    file.format()
        .ok_or_else(|| SessionError::validation(INVALID_TYPE_MESSAGE))
}

pub struct ResumeWorkflow {
    api: Arc<dyn InterviewApi>,
    ui: Ui,
    toaster: Toaster,
    selected: Mutex<Option<ResumeFile>>,
}

impl ResumeWorkflow {
    pub fn new(api: Arc<dyn InterviewApi>, ui: Ui, toaster: Toaster) -> Self {
        Self {
            api,
            ui,
            toaster,
            selected: Mutex::new(None),
        }
    }

    /// Take a dropped or picked file; enables "analyze" only for PDF/DOCX
    pub fn select(&self, file: ResumeFile, source: FileSource) -> Result<(), SessionError> {
        info!("Resume selected via {:?}: {}", source, file.name);

        if let Err(e) = validate_resume(&file) {
            warn!("Rejected resume {}: {}", file.name, e);
            *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = None;
            self.ui.update(|ui| {
                ui.resume_file_name = None;
                ui.analyze_control.enabled = false;
            });
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        }

        let name = file.name.clone();
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(file);
        self.ui.update(|ui| {
            ui.resume_file_name = Some(name);
            ui.analyze_control.enabled = true;
        });

        Ok(())
    }

    /// Upload the selected file and render the analysis
    pub async fn analyze(&self) -> Result<ResumeAnalysis, SessionError> {
        let file = self
            .selected
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let Some(file) = file else {
            let e = SessionError::validation("Please select a resume file first");
            self.toaster.show(e.toast_kind(), e.to_string());
            return Err(e);
        };

        let result = {
            let _busy = self.ui.busy(analyze_control);
            self.api.analyze_resume(&file).await
        };

        match result {
            Ok(analysis) => {
                info!(
                    "Resume scored {} ({} skills)",
                    analysis.score,
                    analysis.skills.len()
                );
                let view = ResumeView {
                    score: analysis.score,
                    experience_years: analysis.experience_years,
                    skills: analysis.skills.clone(),
                    suggestions: analysis.suggestions.clone(),
                };
                self.ui.update(|ui| ui.resume = Some(view));
                self.toaster.success("Resume analyzed successfully!");
                Ok(analysis)
            }
            Err(e) => {
                let message = match &e {
                    SessionError::ServerRejection(msg) => msg.clone(),
                    _ => GENERIC_FAILURE_MESSAGE.to_string(),
                };
                self.toaster.error(message);
                Err(e)
            }
        }
    }
}
