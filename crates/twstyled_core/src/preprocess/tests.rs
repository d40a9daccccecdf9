use std::path::Path;

use indoc::indoc;
use pretty_assertions::assert_eq;
use twstyled_swc_runner::{try_run_with_transformation, RunOptions};
use twstyled_tailwind::{Engine, TailwindConfig};

use super::*;

fn run(code: &str) -> Result<String, TransformError> {
  let engine = Engine::new(TailwindConfig::default())?;
  let output = try_run_with_transformation(
    RunOptions {
      code,
      filename: Path::new("test.jsx"),
      syntax: None,
    },
    |_, module| {
      let mut imports = ImportTracker::scan(module, "@twstyled/core");
      preprocess(module, &mut imports, &engine)
    },
  )?;
  Ok(output.output_code)
}

#[test]
fn test_tw_attribute_becomes_class_name() {
  let code = run(r#"const A = () => <div tw="p-4 text-red-500" />;"#).unwrap();

  assert!(code.contains("className={css`@tailwind p-4 text-red-500;`}"), "{code}");
  assert!(!code.contains("tw="), "{code}");
  assert!(code.starts_with("import { css } from \"@twstyled/core\";"), "{code}");
}

#[test]
fn test_css_attribute_merges_with_existing_class_name() {
  let code = run(indoc! {r#"
    import { css } from '@twstyled/core';
    const A = () => <div className="card" css="color: red;" />;
  "#})
  .unwrap();

  assert!(code.contains("className={`${css`color: red`} card`}"), "{code}");
  assert_eq!(code.matches("import").count(), 1);
}

#[test]
fn test_attributes_merge_in_source_order() {
  let code = run(r#"const A = () => <div tw="p-4" css="color: red" className={cls} />;"#).unwrap();

  assert!(
    code.contains("className={`${css`color: red`} ${css`@tailwind p-4;`} ${cls}`}"),
    "{code}"
  );
}

#[test]
fn test_tw_tagged_template() {
  let code = run(indoc! {r#"
    import { tw } from '@twstyled/core';
    const button = tw`
      p-4 bg-red-500
    `;
  "#})
  .unwrap();

  assert!(code.contains("import { tw, css } from '@twstyled/core';"), "{code}");
  assert!(code.contains("const button = css`@tailwind p-4 bg-red-500;`;"), "{code}");
}

#[test]
fn test_utility_attributes() {
  let code = run(r#"const A = () => <div p-={4} m-={-2} flex- bg-="red-500" />;"#).unwrap();

  for expected in [
    "@tailwind p-${4};",
    "@tailwind -m-2;",
    "@tailwind flex;",
    "@tailwind bg-red-500;",
  ] {
    assert!(code.contains(expected), "missing {expected} in {code}");
  }
  assert!(!code.contains("flex-"), "{code}");
}

#[test]
fn test_unknown_utility_attribute_is_left_alone() {
  let code = run(r#"const A = () => <div data-="x" aria-label="y" />;"#).unwrap();

  assert!(code.contains("data-=\"x\""), "{code}");
  assert!(!code.contains("className"), "{code}");
}

#[test]
fn test_variant_attribute() {
  let code = run(r#"const A = () => <div hover--={['bg-red-500', null, active && 'text-white']} />;"#)
    .unwrap();

  assert!(code.contains("css`@tailwind hover:${'bg-red-500'} hover:${active && 'text-white'};`"), "{code}");
}

#[test]
fn test_tw_variant_attribute_has_no_prefix() {
  let code = run(r#"const A = () => <div tw--={['p-4', big && 'p-8']} />;"#).unwrap();

  assert!(code.contains("css`@tailwind ${'p-4'} ${big && 'p-8'};`"), "{code}");
}

#[test]
fn test_variant_attribute_must_be_an_array() {
  let error = run(r#"const A = () => <div md--="p-4" />;"#).unwrap_err();

  assert_eq!(
    error.to_string(),
    "inline Tailwind variant md must be an array expression"
  );
}

#[test]
fn test_variant_attribute_rejects_spread() {
  let error = run(r#"const A = () => <div md--={[...rest]} />;"#).unwrap_err();

  assert!(matches!(error, TransformError::SpreadInVariantArray { .. }));
}

#[test]
fn test_object_style_is_rejected() {
  let error = run(r#"const A = () => <div css={{ color: 'red' }} />;"#).unwrap_err();

  assert!(matches!(error, TransformError::UnsupportedObjectStyle));
}

#[test]
fn test_function_interpolation_hoists_styled_component() {
  let code = run(indoc! {r#"
    const A = () => <div css={`color: ${props => props.color};`}>hi</div>;
  "#})
  .unwrap();

  assert!(code.contains("import { styled } from \"@twstyled/core\";"), "{code}");
  assert!(code.contains("<_TwCssDiv>hi</_TwCssDiv>"), "{code}");
  assert!(code.contains("var _TwCssDiv = styled(\"div\")`color: ${"), "{code}");
  assert!(!code.contains("css="), "{code}");
  assert!(!code.contains("_$p_"), "{code}");
}

#[test]
fn test_local_values_are_passed_as_props() {
  let code = run(indoc! {r#"
    import { theme } from './theme';
    function Box({ color }) {
      return <section css={`color: ${color}; background: ${theme.bg}; width: ${p => p.w}`} />;
    }
  "#})
  .unwrap();

  assert!(code.contains("_$p_={color}"), "{code}");
  assert!(code.contains("p._$p_"), "{code}");
  assert!(code.contains("${theme.bg}"), "{code}");
  assert_eq!(code.matches("_$p_={").count(), 1, "{code}");
}

#[test]
fn test_local_component_declaration_is_followed_by_styled() {
  let code = run(indoc! {r#"
    const Card = () => null;
    const App = () => <Card css={`width: ${p => p.w}`} />;
  "#})
  .unwrap();

  let card = code.find("const Card").unwrap();
  let styled = code.find("var _TwCssCard = styled(Card)").unwrap();
  let app = code.find("const App").unwrap();
  assert!(card < styled && styled < app, "{code}");
}

#[test]
fn test_generated_names_do_not_collide() {
  let code = run(indoc! {r#"
    const _TwCssDiv = 1;
    const A = () => <div css={`a: ${p => p.a}`} />;
  "#})
  .unwrap();

  assert!(code.contains("var _TwCssDiv2 = styled(\"div\")"), "{code}");
}

#[test]
fn test_namespaced_element_cannot_be_named() {
  let error = run(r#"const A = () => <svg:rect css={`a: ${p => p.a}`} />;"#).unwrap_err();

  assert!(matches!(error, TransformError::CannotInferName { .. }));
}
