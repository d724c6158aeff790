//! Rendering the client `index.html` from a template, the asset manifest and runtime config.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{BuildError, BuildResult};
use crate::models::{AssetManifest, RuntimeConfig};
use crate::template::scanner::{ScannedTemplate, Slot, Token};

/// Separator between generated elements sharing one placeholder.
const ELEMENT_SEPARATOR: &str = "\n        ";

/// Class attached to generated stylesheet links so client code can find them.
pub const CSS_LINK_CLASS: &str = "__meteor-css__";

/// Query marker appended to stylesheet hrefs.
pub const CSS_RESOURCE_QUERY: &str = "?meteor_css_resource=true";

/// Script telling the client runtime not to open a server connection.
pub const DISCONNECT_SCRIPT: &str =
  r#"<script type="text/javascript">Meteor.disconnect();</script>"#;

/// Characters `encodeURIComponent` leaves untouched, everything else is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
  .remove(b'-')
  .remove(b'_')
  .remove(b'.')
  .remove(b'!')
  .remove(b'~')
  .remove(b'*')
  .remove(b'\'')
  .remove(b'(')
  .remove(b')');

/// Inputs to a single rendering of the client document.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
  /// Template containing the placeholders.
  pub template: &'a str,
  /// Head fragment, empty when the app rendered none.
  pub head: &'a str,
  /// Asset references after path rewriting.
  pub assets: &'a AssetManifest,
  /// Runtime configuration exposed to the client.
  pub config: &'a RuntimeConfig,
  /// Whether the client was given a server to connect to.
  pub has_server_url: bool,
}

/// Render the document described by `input`.
///
/// Each placeholder is filled once. Without a `config` placeholder the configuration script
/// becomes the first element of the scripts block.
pub fn assemble_document(input: AssemblyInput<'_>) -> BuildResult<String> {
  let scanned = ScannedTemplate::scan(input.template);

  let css_block = input
    .assets
    .css
    .iter()
    .map(|href| stylesheet_link(href))
    .collect::<Vec<_>>()
    .join(ELEMENT_SEPARATOR);

  let config_script = runtime_config_script(input.config)?;
  let has_config_slot = scanned.has_slot(Slot::Config);

  let mut scripts = Vec::with_capacity(input.assets.js.len() + 2);
  if !has_config_slot {
    scripts.push(config_script.clone());
  }
  scripts.extend(input.assets.js.iter().map(|src| script_element(src)));
  if !input.has_server_url {
    scripts.push(DISCONNECT_SCRIPT.to_string());
  }

  if !css_block.is_empty() && !scanned.has_slot(Slot::Css) {
    return Err(BuildError::MissingSlot {
      slot: Slot::Css.name(),
      pending: format!("{} stylesheet link(s)", input.assets.css.len()),
    });
  }
  if !input.assets.js.is_empty() && !scanned.has_slot(Slot::Scripts) {
    return Err(BuildError::MissingSlot {
      slot: Slot::Scripts.name(),
      pending: format!("{} script asset(s)", input.assets.js.len()),
    });
  }

  let scripts_block = scripts.join(ELEMENT_SEPARATOR);
  let mut document = String::with_capacity(
    input.template.len() + input.head.len() + css_block.len() + scripts_block.len(),
  );
  for token in scanned.tokens() {
    match token {
      Token::Literal(text) => document.push_str(text),
      Token::Slot(Slot::Head) => document.push_str(input.head),
      Token::Slot(Slot::Css) => document.push_str(&css_block),
      Token::Slot(Slot::Config) => document.push_str(&config_script),
      Token::Slot(Slot::Scripts) => document.push_str(&scripts_block),
    }
  }

  Ok(document)
}

fn stylesheet_link(href: &str) -> String {
  format!(
    r#"<link rel="stylesheet" type="text/css" class="{CSS_LINK_CLASS}" href="{href}{CSS_RESOURCE_QUERY}">"#
  )
}

fn script_element(src: &str) -> String {
  format!(r#"<script type="text/javascript" src="{src}"></script>"#)
}

/// Percent-encode the compact JSON form of `config` the way `encodeURIComponent` does.
pub fn encode_runtime_config(config: &RuntimeConfig) -> BuildResult<String> {
  let json = serde_json::to_string(config).map_err(|source| BuildError::Config {
    context: "failed to serialise runtime configuration".into(),
    source,
  })?;
  Ok(utf8_percent_encode(&json, URI_COMPONENT).to_string())
}

/// Script element declaring `__meteor_runtime_config__` from the encoded configuration.
pub fn runtime_config_script(config: &RuntimeConfig) -> BuildResult<String> {
  let encoded = encode_runtime_config(config)?;
  Ok(format!(
    r#"<script type="text/javascript">__meteor_runtime_config__ = JSON.parse(decodeURIComponent("{encoded}"));</script>"#
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{StarManifest, UserSettings};
  use percent_encoding::percent_decode_str;
  use serde_json::json;

  const CSS: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f901234567.css";
  const JS_A: &str = "1111111111111111111111111111111111111111.js";
  const JS_B: &str = "2222222222222222222222222222222222222222.js";
  const FULL_TEMPLATE: &str = "<html><head>{{> head}}\n        {{> css}}</head>\
                               <body>{{> config}}\n        {{> scripts}}</body></html>";

  fn config(url: Option<&str>) -> RuntimeConfig {
    let star = StarManifest {
      meteor_release: "METEOR@2.16".into(),
    };
    let settings = UserSettings {
      public: Some(json!({"title": "</script><script>alert('x')</script>", "ratio": 0.5})),
    };
    RuntimeConfig::new(&star, &settings, url)
  }

  fn manifest(css: &[&str], js: &[&str]) -> AssetManifest {
    AssetManifest {
      css: css.iter().map(|name| format!("/{name}")).collect(),
      js: js.iter().map(|name| format!("/{name}")).collect(),
    }
  }

  fn render(template: &str, assets: &AssetManifest, url: Option<&str>) -> BuildResult<String> {
    let config = config(url);
    assemble_document(AssemblyInput {
      template,
      head: "<title>App</title>",
      assets,
      config: &config,
      has_server_url: url.is_some(),
    })
  }

  fn body_elements(document: &str) -> Vec<&str> {
    let body = document
      .split_once("<body>")
      .and_then(|(_, rest)| rest.split_once("</body>"))
      .map(|(body, _)| body)
      .unwrap();
    body.split(ELEMENT_SEPARATOR).collect()
  }

  fn decode_payload(document: &str) -> serde_json::Value {
    let (_, rest) = document.split_once("decodeURIComponent(\"").unwrap();
    let (encoded, _) = rest.split_once('"').unwrap();
    let decoded = percent_decode_str(encoded).decode_utf8().unwrap();
    serde_json::from_str(&decoded).unwrap()
  }

  #[test]
  fn fills_every_slot() {
    let assets = manifest(&[CSS], &[JS_A, JS_B]);
    let document = render(FULL_TEMPLATE, &assets, Some("https://app.example.com")).unwrap();

    assert!(document.starts_with("<html><head><title>App</title>\n        <link rel=\"stylesheet\""));
    assert!(document.contains(&format!(
      r#"<link rel="stylesheet" type="text/css" class="__meteor-css__" href="/{CSS}?meteor_css_resource=true">"#
    )));

    let elements = body_elements(&document);
    assert_eq!(elements.len(), 3);
    assert!(elements[0].contains("__meteor_runtime_config__"));
    assert_eq!(
      elements[1],
      format!(r#"<script type="text/javascript" src="/{JS_A}"></script>"#)
    );
    assert_eq!(
      elements[2],
      format!(r#"<script type="text/javascript" src="/{JS_B}"></script>"#)
    );
    assert!(!document.contains("{{"));
  }

  #[test]
  fn embedded_payload_round_trips_to_config() {
    let assets = manifest(&[], &[JS_A]);
    let config = config(Some("https://app.example.com"));
    let document = render(FULL_TEMPLATE, &assets, Some("https://app.example.com")).unwrap();

    let payload = decode_payload(&document);
    assert_eq!(payload, serde_json::to_value(&config).unwrap());
    let restored: RuntimeConfig = serde_json::from_value(payload).unwrap();
    assert_eq!(restored, config);
  }

  #[test]
  fn encoding_escapes_markup_and_quotes() {
    let encoded = encode_runtime_config(&config(None)).unwrap();

    for forbidden in ['<', '>', '"', ' ', '/', '{', ':'] {
      assert!(!encoded.contains(forbidden), "{forbidden} left unescaped");
    }
    assert!(encoded.contains("alert('x')"));
  }

  #[test]
  fn config_script_leads_scripts_without_config_slot() {
    let template = "<head>{{> head}}{{> css}}</head><body>{{> scripts}}</body>";
    let assets = manifest(&[], &[JS_A]);
    let document = render(template, &assets, Some("https://app.example.com")).unwrap();

    let elements = body_elements(&document);
    assert_eq!(elements.len(), 2);
    assert!(elements[0].starts_with("<script type=\"text/javascript\">__meteor_runtime_config__"));
    assert_eq!(document.matches("__meteor_runtime_config__").count(), 1);
  }

  #[test]
  fn appends_disconnect_without_server_url() {
    let assets = manifest(&[CSS], &[JS_A]);
    let document = render(FULL_TEMPLATE, &assets, None).unwrap();

    let elements = body_elements(&document);
    assert_eq!(elements.last(), Some(&DISCONNECT_SCRIPT));
    assert_eq!(document.matches("Meteor.disconnect()").count(), 1);
  }

  #[test]
  fn empty_manifest_leaves_only_config_and_disconnect() {
    let template = "<head>[{{> css}}]</head><body>{{> scripts}}</body>";
    let assets = AssetManifest::default();

    let with_url = render(template, &assets, Some("https://app.example.com")).unwrap();
    assert!(with_url.contains("<head>[]</head>"));
    let elements = body_elements(&with_url);
    assert_eq!(elements.len(), 1);
    assert!(elements[0].contains("__meteor_runtime_config__"));

    let without_url = render(template, &assets, None).unwrap();
    let elements = body_elements(&without_url);
    assert_eq!(elements.len(), 2);
    assert!(elements[0].contains("__meteor_runtime_config__"));
    assert_eq!(elements[1], DISCONNECT_SCRIPT);
  }

  #[test]
  fn renders_single_script_for_minimal_template() {
    let js = "abcdef0123456789abcdef0123456789abcdef01.js";
    let assets = manifest(&[], &[js]);
    let document = render(
      "<head>{{>head}}</head><body>{{>scripts}}</body>",
      &assets,
      Some("http://x"),
    )
    .unwrap();

    assert_eq!(document.matches("<script").count(), 2);
    assert_eq!(
      document
        .matches(&format!(r#"<script type="text/javascript" src="/{js}"></script>"#))
        .count(),
      1
    );
    assert!(!document.contains("Meteor.disconnect"));
  }

  #[test]
  fn prefixed_references_keep_order() {
    let assets = AssetManifest {
      css: vec![format!("https://cdn.example.com/{CSS}")],
      js: vec![
        format!("https://cdn.example.com/{JS_B}"),
        format!("https://cdn.example.com/{JS_A}"),
      ],
    };
    let config = config(Some("https://app.example.com"));
    let document = assemble_document(AssemblyInput {
      template: FULL_TEMPLATE,
      head: "",
      assets: &assets,
      config: &config,
      has_server_url: true,
    })
    .unwrap();

    let srcs: Vec<&str> = document
      .split("src=\"")
      .skip(1)
      .filter_map(|rest| rest.split_once('"').map(|(src, _)| src))
      .collect();
    assert_eq!(srcs, assets.js.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(document.contains(&format!("href=\"{}{CSS_RESOURCE_QUERY}\"", assets.css[0])));
  }

  #[test]
  fn repeated_placeholder_is_filled_once() {
    let template = "<head>{{> head}}{{> head}}</head><body>{{> scripts}}</body>";
    let document = render(template, &AssetManifest::default(), Some("https://app.example.com"))
      .unwrap();

    assert!(document.starts_with("<head><title>App</title>{{> head}}</head>"));
  }

  #[test]
  fn missing_scripts_slot_is_a_template_error() {
    let assets = manifest(&[], &[JS_A]);
    let err = render("<head>{{> head}}</head>", &assets, Some("https://app.example.com"))
      .unwrap_err();

    assert!(matches!(err, BuildError::MissingSlot { slot: "scripts", .. }));
  }

  #[test]
  fn template_without_script_slots_renders_unchanged_when_no_scripts() {
    let template = "<html><head>{{> head}}</head><body></body></html>";
    let document = render(template, &AssetManifest::default(), None).unwrap();

    assert_eq!(document, "<html><head><title>App</title></head><body></body></html>");
  }

  #[test]
  fn missing_css_slot_is_only_an_error_with_stylesheets() {
    let template = "<body>{{> scripts}}</body>";
    assert!(render(template, &AssetManifest::default(), None).is_ok());

    let err = render(template, &manifest(&[CSS], &[]), None).unwrap_err();
    assert!(matches!(err, BuildError::MissingSlot { slot: "css", .. }));
  }
}
