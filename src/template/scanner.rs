//! Single-pass tokenizer for `{{> name}}` placeholders.

/// Placeholder slots understood by the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
  /// Head fragment rendered by the app.
  Head,
  /// Stylesheet links.
  Css,
  /// Runtime configuration script.
  Config,
  /// Script elements.
  Scripts,
}

impl Slot {
  /// All slots, in the order they are usually laid out in a document.
  pub const ALL: [Slot; 4] = [Slot::Head, Slot::Css, Slot::Config, Slot::Scripts];

  /// Placeholder name as written in templates.
  pub fn name(self) -> &'static str {
    match self {
      Slot::Head => "head",
      Slot::Css => "css",
      Slot::Config => "config",
      Slot::Scripts => "scripts",
    }
  }

  fn from_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|slot| slot.name() == name)
  }

  fn index(self) -> usize {
    self as usize
  }
}

/// Piece of a scanned template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
  /// Text copied to the output unchanged.
  Literal(&'a str),
  /// Placeholder replaced by rendered content.
  Slot(Slot),
}

/// A template split into literal text and placeholder slots.
///
/// Only the first occurrence of each placeholder is a slot; repeated or unknown markers are
/// kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTemplate<'a> {
  tokens: Vec<Token<'a>>,
}

impl<'a> ScannedTemplate<'a> {
  /// Scan `source` into tokens.
  pub fn scan(source: &'a str) -> Self {
    let mut tokens = Vec::new();
    let mut seen = [false; Slot::ALL.len()];
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = source[cursor..].find("{{") {
      let start = cursor + offset;
      match parse_marker(&source[start..]) {
        Some((slot, len)) if !seen[slot.index()] => {
          seen[slot.index()] = true;
          if literal_start < start {
            tokens.push(Token::Literal(&source[literal_start..start]));
          }
          tokens.push(Token::Slot(slot));
          cursor = start + len;
          literal_start = cursor;
        }
        Some((_, len)) => cursor = start + len,
        None => cursor = start + 1,
      }
    }

    if literal_start < source.len() {
      tokens.push(Token::Literal(&source[literal_start..]));
    }

    Self { tokens }
  }

  /// Tokens in document order.
  pub fn tokens(&self) -> &[Token<'a>] {
    &self.tokens
  }

  /// Whether the template contains `slot`.
  pub fn has_slot(&self, slot: Slot) -> bool {
    self.tokens.contains(&Token::Slot(slot))
  }
}

/// Parse `{{ *> *name *}}` at the start of `input`, returning the slot and marker length.
fn parse_marker(input: &str) -> Option<(Slot, usize)> {
  let rest = input.strip_prefix("{{")?;
  let rest = rest.trim_start_matches(' ').strip_prefix('>')?;
  let rest = rest.trim_start_matches(' ');
  let name_len = rest
    .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
    .unwrap_or(rest.len());
  let slot = Slot::from_name(&rest[..name_len])?;
  let rest = rest[name_len..].trim_start_matches(' ').strip_prefix("}}")?;
  Some((slot, input.len() - rest.len()))
}
