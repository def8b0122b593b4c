use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("resume must not be empty")]
    EmptyResume,
    #[error("job description must not be empty")]
    EmptyJobDescription,
}

/// Resume and job description that passed the setup form checks.
///
/// Text is kept as entered; only the blank check trims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewSubmission {
    resume: String,
    job_description: String,
}

impl InterviewSubmission {
    pub fn new(
        resume: impl Into<String>,
        job_description: impl Into<String>,
    ) -> Result<Self, SubmissionError> {
        let resume = resume.into();
        let job_description = job_description.into();

        if resume.trim().is_empty() {
            return Err(SubmissionError::EmptyResume);
        }
        if job_description.trim().is_empty() {
            return Err(SubmissionError::EmptyJobDescription);
        }

        Ok(Self {
            resume,
            job_description,
        })
    }

    pub fn resume(&self) -> &str {
        &self.resume
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

/// Raw form body as posted to the control API
#[derive(Debug, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
}

impl TryFrom<SubmissionForm> for InterviewSubmission {
    type Error = SubmissionError;

    fn try_from(form: SubmissionForm) -> Result<Self, Self::Error> {
        Self::new(form.resume, form.job_description)
    }
}
