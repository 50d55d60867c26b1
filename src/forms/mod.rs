//! Add/edit product forms: field values and validation, the form state machine, and the edit
//! dialog's target.

mod form;
mod modal;
mod validation;

pub use form::{FormError, FormState};
pub use modal::ModalState;
pub use validation::{ProductFormValues, ValidationErrors};
