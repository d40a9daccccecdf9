use std::path::Path;

use twstyled_filesystem::normalize_path;
use twstyled_swc_runner::{try_run_with_transformation, RunOptions};

use crate::ast::require_statement;
use crate::extract::extract;
use crate::imports::ImportTracker;
use crate::literals;
use crate::preprocess::preprocess;
use crate::processor::TemplateProcessor;
use crate::session::BuildSession;
use crate::state::FileState;
use crate::TransformError;

/// Result of transforming one source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformOutput {
  /// Rewritten source
  pub code: String,
  /// Specifier of the file's stylesheet, required at the top of `code`
  pub css_filename: Option<String>,
  /// Utility classes the file contributed to the global stylesheet
  pub utility_classes: Vec<String>,
  /// CSS of the file's occurrences, before any source map is appended
  pub css_text: String,
  pub occurrences: usize,
}

/// Transform one source file: rewrite `tw`/`css` attributes and helpers, extract every style
/// template into the file's stylesheet, and fold its utility classes into the global stylesheet.
///
/// A file whose source is unchanged since the last pass reuses its previous stylesheet instead
/// of writing it again.
#[tracing::instrument(level = "debug", skip_all, fields(filename = %filename.display()))]
pub fn transform(
  session: &mut BuildSession,
  filename: &Path,
  code: &str,
) -> Result<TransformOutput, TransformError> {
  let engine = session.engine()?;
  let filename = normalize_path(&session.cwd, filename);
  let processor = TemplateProcessor::for_options(&session.options, engine.clone());
  let mut file = FileState::new(filename.clone(), session.cwd.clone(), code);

  let import_source = session.options.import_source.as_str();
  let display_name = session.options.display_name;
  let source_map = session.options.source_map;
  let fs = &*session.fs;
  let stylesheets = &mut session.stylesheets;

  let output = try_run_with_transformation(
    RunOptions {
      code,
      filename: &filename,
      syntax: None,
    },
    |context, module| {
      let mut imports = ImportTracker::scan(module, import_source);
      preprocess(module, &mut imports, &engine)?;

      file.literals = literals::collect(module);
      let occurrences = extract(
        module,
        &context.source_map,
        &imports,
        &processor,
        &mut file,
        display_name,
      )?;
      literals::apply(module, &file.literal_rewrites);

      let css_filename = match stylesheets.cached(&file) {
        Some(cached) => {
          tracing::debug!("Source unchanged, reusing stylesheet");
          cached.css_filename.clone()
        }
        None => stylesheets.write(fs, &file, source_map)?,
      };
      if let Some(css_filename) = &css_filename {
        module.body.insert(0, require_statement(css_filename));
      }

      Ok::<_, TransformError>((occurrences, css_filename))
    },
  )?;
  let (occurrences, css_filename) = output.transform_result;

  session
    .global
    .update(&*session.fs, &engine, &file.filename, &file.utility_classes)?;

  tracing::debug!(occurrences, "Transformed");
  Ok(TransformOutput {
    code: output.output_code,
    css_filename,
    utility_classes: file.utility_classes,
    css_text: file.css_text,
    occurrences,
  })
}
