//! Stages run by the template processor for every occurrence.
//!
//! Each stage sees the occurrence three times: `enter` before its CSS is compiled, `stylis` once
//! per compiled node (parents before children), and `exit` after the CSS has been serialized.
//! Stages run in registration order in every phase.

use twstyled_stylis::Element;

use crate::occurrence::OccurrenceState;
use crate::state::FileState;
use crate::TransformError;

mod css_emitter;
mod tailwind;

pub use css_emitter::CssEmitter;
pub use tailwind::TailwindMiddleware;

pub trait Middleware: std::fmt::Debug {
  fn enter(
    &self,
    _file: &mut FileState,
    _state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    Ok(())
  }

  fn stylis(
    &self,
    _file: &mut FileState,
    _state: &mut OccurrenceState<'_>,
    element: Element,
  ) -> Result<Element, TransformError> {
    Ok(element)
  }

  fn exit(
    &self,
    _file: &mut FileState,
    _state: &mut OccurrenceState<'_>,
  ) -> Result<(), TransformError> {
    Ok(())
  }
}
