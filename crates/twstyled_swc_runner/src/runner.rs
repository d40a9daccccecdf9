use std::path::Path;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use swc_core::common::input::StringInput;
use swc_core::common::sync::Lrc;
use swc_core::common::{FileName, Globals, Mark, SourceMap, GLOBALS};
use swc_core::ecma::ast::{EsVersion, Module};
use swc_core::ecma::codegen::text_writer::JsWriter;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::Parser;
use swc_core::ecma::transforms::base::resolver;
use swc_core::ecma::visit::{Visit, VisitMut, VisitMutWith, VisitWith};
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};

pub struct RunContext {
  /// Source-map in use
  pub source_map: Lrc<SourceMap>,
  /// Global mark from SWC resolver
  pub global_mark: Mark,
  /// Unresolved mark from SWC resolver
  pub unresolved_mark: Mark,
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
  #[error("Failed to parse {filename}: {message}")]
  SwcParse { filename: String, message: String },
  #[error("IO Error: {0}")]
  IoError(#[from] std::io::Error),
  #[error("Invalid utf-8 output: {0}")]
  InvalidUtf8Output(#[from] FromUtf8Error),
  #[error("Failed to generate source map")]
  SourceMap(#[from] sourcemap::Error),
}

pub struct RunOptions<'a> {
  pub code: &'a str,
  /// Used for diagnostics, source maps and to pick the parser syntax
  pub filename: &'a Path,
  /// Overrides the syntax derived from the filename extension
  pub syntax: Option<Syntax>,
}

pub struct RunOutput<R> {
  pub output_code: String,
  pub transform_result: R,
  pub source_map: Vec<u8>,
}

/// JSX is enabled for every script flavour; TypeScript is only enabled for `.ts`/`.tsx`/`.mts`.
pub fn syntax_for_path(filename: &Path) -> Syntax {
  match filename.extension().and_then(|ext| ext.to_str()) {
    Some("ts") | Some("mts") | Some("cts") => Syntax::Typescript(TsSyntax::default()),
    Some("tsx") => Syntax::Typescript(TsSyntax {
      tsx: true,
      ..Default::default()
    }),
    _ => Syntax::Es(EsSyntax {
      jsx: true,
      ..Default::default()
    }),
  }
}

/// Parse code, run resolver over it, then run the `transform` function with the parsed module.
/// Codegen and return the results.
///
/// The transform may fail; its error is returned unchanged.
pub fn try_run_with_transformation<R, E>(
  options: RunOptions<'_>,
  transform: impl FnOnce(RunContext, &mut Module) -> Result<R, E>,
) -> Result<RunOutput<R>, E>
where
  E: From<RunError>,
{
  let source_map = Lrc::new(SourceMap::default());
  let source_file = source_map.new_source_file(
    Lrc::new(FileName::Real(PathBuf::from(options.filename))),
    options.code.into(),
  );

  let syntax = options
    .syntax
    .unwrap_or_else(|| syntax_for_path(options.filename));
  let lexer = Lexer::new(
    syntax,
    EsVersion::latest(),
    StringInput::from(&*source_file),
    None,
  );

  let mut parser = Parser::new_from(lexer);
  let mut module = parser.parse_module().map_err(|err| RunError::SwcParse {
    filename: options.filename.display().to_string(),
    message: err.kind().msg().to_string(),
  })?;

  GLOBALS.set(&Globals::new(), || -> Result<RunOutput<R>, E> {
    let global_mark = Mark::new();
    let unresolved_mark = Mark::new();
    module.visit_mut_with(&mut resolver(unresolved_mark, global_mark, false));

    let context = RunContext {
      source_map: source_map.clone(),
      global_mark,
      unresolved_mark,
    };
    let transform_result = transform(context, &mut module)?;

    let (output_code, output_map) = emit(&source_map, &module).map_err(E::from)?;

    Ok(RunOutput {
      output_code,
      transform_result,
      source_map: output_map,
    })
  })
}

/// Infallible-transform form of [`try_run_with_transformation`].
pub fn run_with_transformation<R>(
  options: RunOptions<'_>,
  transform: impl FnOnce(RunContext, &mut Module) -> R,
) -> Result<RunOutput<R>, RunError> {
  try_run_with_transformation(options, |context, module| {
    Ok::<R, RunError>(transform(context, module))
  })
}

fn emit(source_map: &Lrc<SourceMap>, module: &Module) -> Result<(String, Vec<u8>), RunError> {
  let mut line_pos_buffer = vec![];
  let mut output_buffer = vec![];
  let writer = JsWriter::new(
    source_map.clone(),
    "\n",
    &mut output_buffer,
    Some(&mut line_pos_buffer),
  );
  let mut emitter = swc_core::ecma::codegen::Emitter {
    cfg: Default::default(),
    cm: source_map.clone(),
    comments: None,
    wr: writer,
  };
  emitter.emit_module(module)?;
  let output_code = String::from_utf8(output_buffer)?;
  let output_map = source_map.build_source_map(&line_pos_buffer);
  let mut output_map_buffer = vec![];
  output_map.to_writer(&mut output_map_buffer)?;

  Ok((output_code, output_map_buffer))
}

pub struct RunVisitResult<V> {
  pub output_code: String,
  pub visitor: V,
}

/// Runner of SWC transformations
///
/// * Parse `code` with SWC
/// * Run a visitor over it
/// * Return the result
///
pub fn run_visit<V: VisitMut>(
  code: &str,
  filename: &Path,
  make_visit: impl FnOnce(RunContext) -> V,
) -> Result<RunVisitResult<V>, RunError> {
  let output = run_with_transformation(
    RunOptions {
      code,
      filename,
      syntax: None,
    },
    |context, module| {
      let mut visit = make_visit(context);
      module.visit_mut_with(&mut visit);
      visit
    },
  )?;
  Ok(RunVisitResult {
    output_code: output.output_code,
    visitor: output.transform_result,
  })
}

/// Same as `run_visit` but for `Visit` instead of `VisitMut`
pub fn run_visit_const<V: Visit>(
  code: &str,
  filename: &Path,
  make_visit: impl FnOnce(RunContext) -> V,
) -> Result<RunVisitResult<V>, RunError> {
  let output = run_with_transformation(
    RunOptions {
      code,
      filename,
      syntax: None,
    },
    |context, module| {
      let mut visit = make_visit(context);
      module.visit_with(&mut visit);
      visit
    },
  )?;
  Ok(RunVisitResult {
    output_code: output.output_code,
    visitor: output.transform_result,
  })
}
