use std::sync::Arc;

use twstyled_stylis::{compile, serialize, Element};
use twstyled_tailwind::Engine;

use crate::middleware::{CssEmitter, Middleware, TailwindMiddleware};
use crate::occurrence::{OccurrenceState, TemplateOccurrence};
use crate::state::FileState;
use crate::{PluginOptions, TransformError};

/// Final CSS and class name of one occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessedTemplate {
  pub css_text: String,
  pub class_name: String,
}

/// Runs the registered middlewares over every occurrence of a file.
#[derive(Debug)]
pub struct TemplateProcessor {
  middlewares: Vec<Box<dyn Middleware>>,
}

impl TemplateProcessor {
  pub fn new(middlewares: Vec<Box<dyn Middleware>>) -> Self {
    TemplateProcessor { middlewares }
  }

  /// The standard stages: utility classes first, then the stylesheet emitter.
  pub fn for_options(options: &PluginOptions, engine: Arc<Engine>) -> Self {
    TemplateProcessor::new(vec![
      Box::new(TailwindMiddleware::new(engine)),
      Box::new(CssEmitter::new(
        options.cache_directory.clone(),
        options.extension.clone(),
      )),
    ])
  }

  pub fn process(
    &self,
    file: &mut FileState,
    index: usize,
    occurrence: &mut TemplateOccurrence,
  ) -> Result<ProcessedTemplate, TransformError> {
    let mut state = OccurrenceState::new(index, occurrence);

    for middleware in &self.middlewares {
      middleware.enter(file, &mut state)?;
    }

    let rule = format!("{}{{{}}}", state.occurrence.selector, state.css_text);
    let css_text = serialize::<TransformError>(compile(&rule), &mut |mut element: Element| {
      for middleware in &self.middlewares {
        element = middleware.stylis(file, &mut state, element)?;
      }
      Ok(element)
    })?;
    state.css_text = css_text;

    for middleware in &self.middlewares {
      middleware.exit(file, &mut state)?;
    }

    file.css_text.push_str(&state.css_text);
    file.css_text.push('\n');

    Ok(ProcessedTemplate {
      css_text: state.css_text,
      class_name: state.class_name,
    })
  }
}
