pub mod compose;
pub mod errors;
pub mod machine;

pub use compose::compose_request;
pub use errors::WizardError;
pub use machine::{Step, WizardState};
