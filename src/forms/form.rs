//! Form lifecycle.
//!
//! ```text
//! Closed --open--> Open --submit(valid)--> Submitting --succeed--> Closed
//!                   ^  \--submit(invalid)--> Open (field errors)      |
//!                   |                                                 |
//!                   +------------------------fail---------------------+
//! ```
//!
//! A failed submission returns to `Open` with the user's input intact and the error attached, so
//! they can resubmit. Any other transition is rejected with [`FormError::InvalidTransition`].

use super::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("cannot {action} a form that is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("{0}")]
    Invalid(ValidationErrors),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormState<D> {
    Closed,
    Open {
        draft: D,
        /// Message of the last failed submission.
        error: Option<String>,
        field_errors: ValidationErrors,
    },
    Submitting {
        draft: D,
    },
}

impl<D> Default for FormState<D> {
    fn default() -> Self {
        FormState::Closed
    }
}

impl<D> FormState<D> {
    pub fn name(&self) -> &'static str {
        match self {
            FormState::Closed => "closed",
            FormState::Open { .. } => "open",
            FormState::Submitting { .. } => "submitting",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormState::Submitting { .. })
    }

    pub fn draft(&self) -> Option<&D> {
        match self {
            FormState::Closed => None,
            FormState::Open { draft, .. } | FormState::Submitting { draft } => Some(draft),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FormState::Open { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    fn reject<T>(&self, action: &'static str) -> Result<T, FormError> {
        Err(FormError::InvalidTransition {
            action,
            state: self.name(),
        })
    }

    pub fn open(&mut self, draft: D) -> Result<(), FormError> {
        if self.is_open() {
            return self.reject("open");
        }
        *self = FormState::Open {
            draft,
            error: None,
            field_errors: ValidationErrors::new(),
        };
        Ok(())
    }

    /// Changes the draft of an open form.
    pub fn edit(&mut self, f: impl FnOnce(&mut D)) -> Result<(), FormError> {
        match self {
            FormState::Open { draft, .. } => {
                f(draft);
                Ok(())
            }
            _ => self.reject("edit"),
        }
    }

    /// Validates the draft. On success the form is `Submitting` and the validated output is
    /// returned for sending; on failure it stays `Open` with the field errors attached.
    pub fn submit<T>(
        &mut self,
        validate: impl FnOnce(&D) -> Result<T, ValidationErrors>,
    ) -> Result<T, FormError> {
        match std::mem::replace(self, FormState::Closed) {
            FormState::Open { draft, error, .. } => match validate(&draft) {
                Ok(output) => {
                    *self = FormState::Submitting { draft };
                    Ok(output)
                }
                Err(errors) => {
                    *self = FormState::Open {
                        draft,
                        error,
                        field_errors: errors.clone(),
                    };
                    Err(FormError::Invalid(errors))
                }
            },
            other => {
                *self = other;
                self.reject("submit")
            }
        }
    }

    /// The submission went through.
    pub fn succeed(&mut self) -> Result<(), FormError> {
        if !self.is_submitting() {
            return self.reject("complete");
        }
        *self = FormState::Closed;
        Ok(())
    }

    /// The submission failed remotely; reopen with the input intact.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), FormError> {
        match std::mem::replace(self, FormState::Closed) {
            FormState::Submitting { draft } => {
                *self = FormState::Open {
                    draft,
                    error: Some(message.into()),
                    field_errors: ValidationErrors::new(),
                };
                Ok(())
            }
            other => {
                *self = other;
                self.reject("fail")
            }
        }
    }

    /// Cancels an open form. A form that is submitting cannot be cancelled.
    pub fn close(&mut self) -> Result<(), FormError> {
        match self {
            FormState::Submitting { .. } => self.reject("close"),
            _ => {
                *self = FormState::Closed;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty(draft: &String) -> Result<String, ValidationErrors> {
        if draft.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add("title", "is required");
            Err(errors)
        } else {
            Ok(draft.to_uppercase())
        }
    }

    #[test]
    fn happy_path() {
        let mut form = FormState::default();
        form.open("lamp".to_string()).unwrap();
        assert_eq!(form.submit(non_empty).unwrap(), "LAMP");
        assert!(form.is_submitting());
        form.succeed().unwrap();
        assert_eq!(form, FormState::Closed);
    }

    #[test]
    fn invalid_submit_stays_open() {
        let mut form = FormState::default();
        form.open(String::new()).unwrap();
        let err = form.submit(non_empty).unwrap_err();
        assert!(matches!(err, FormError::Invalid(_)));
        match &form {
            FormState::Open { field_errors, .. } => assert_eq!(field_errors.len(), 1),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn remote_failure_keeps_input() {
        let mut form = FormState::default();
        form.open("lamp".to_string()).unwrap();
        form.submit(non_empty).unwrap();
        form.fail("HTTP 500").unwrap();
        assert_eq!(form.draft().map(String::as_str), Some("lamp"));
        assert_eq!(form.error(), Some("HTTP 500"));

        form.edit(|d| d.push('s')).unwrap();
        assert_eq!(form.submit(non_empty).unwrap(), "LAMPS");
    }

    #[test]
    fn illegal_transitions() {
        let mut form = FormState::<String>::default();
        assert!(matches!(
            form.submit(non_empty),
            Err(FormError::InvalidTransition { action: "submit", state: "closed" })
        ));
        assert!(form.succeed().is_err());
        assert!(form.fail("x").is_err());
        assert_eq!(form, FormState::Closed);

        form.open("a".into()).unwrap();
        assert!(form.open("b".into()).is_err());
        form.submit(non_empty).unwrap();
        assert!(form.close().is_err());
        assert!(form.edit(|_| {}).is_err());
    }
}
