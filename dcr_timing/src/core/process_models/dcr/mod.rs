//! DCR Graphs
//!
//! Timed DCR relations and the line-based DCR model text used to exchange them.
mod constraint;
mod model_text;

#[doc(inline)]
pub use constraint::{ConstraintKind, ConstraintSpec, UnknownConstraintKind, DCR_RULE_MAPPING};
#[doc(inline)]
pub use model_text::{DcrLine, DcrModel, DcrModelError, DcrRelation};
