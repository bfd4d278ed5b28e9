//! The tools a Vitae agent can call.
//!
//! There are exactly two, and both do the same thing underneath: format a
//! one-line message and push it to the operator. The set is closed, so
//! names resolve through [`ToolKind`] instead of a runtime registry.

pub mod dispatcher;
pub mod record_contact;
pub mod record_unknown_question;
pub mod registry;

pub use dispatcher::{ToolDispatcher, ToolInvocation};
pub use record_contact::RecordContactArgs;
pub use record_unknown_question::RecordUnknownQuestionArgs;
pub use registry::{ToolKind, definitions};
