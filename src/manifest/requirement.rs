//! Minimal dependency-specifier parsing for `project.dependencies`
//!
//! Only what the pin check needs: the name, optional extras, the specifier
//! list, and a direct URL if present. Environment markers are dropped.

use std::fmt;

/// Comparison operator of a version specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
  ArbitraryEqual,
  Compatible,
  Equal,
  NotEqual,
  LessEqual,
  GreaterEqual,
  Less,
  Greater,
}

impl Operator {
  /// Longest tokens first so `===` is not read as `==`
  const TOKENS: [(&'static str, Operator); 8] = [
    ("===", Operator::ArbitraryEqual),
    ("~=", Operator::Compatible),
    ("==", Operator::Equal),
    ("!=", Operator::NotEqual),
    ("<=", Operator::LessEqual),
    (">=", Operator::GreaterEqual),
    ("<", Operator::Less),
    (">", Operator::Greater),
  ];

  pub fn as_str(self) -> &'static str {
    Self::TOKENS
      .iter()
      .find(|(_, op)| *op == self)
      .map(|(token, _)| *token)
      .unwrap_or("?")
  }
}

impl fmt::Display for Operator {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One `<op><version>` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
  pub operator: Operator,
  pub version: String,
}

impl Specifier {
  /// `==X.Y.Z` without a wildcard
  pub fn is_exact(&self) -> bool {
    self.operator == Operator::Equal && !self.version.ends_with(".*")
  }
}

/// A parsed requirement string such as `uv[extra]==0.4.30 ; python_version >= "3.8"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
  pub name: String,
  pub extras: Vec<String>,
  pub specifiers: Vec<Specifier>,
  pub url: Option<String>,
}

impl Requirement {
  pub fn parse(input: &str) -> Result<Self, String> {
    let body = input.split(';').next().unwrap_or("").trim();

    let name_end = body
      .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
      .unwrap_or(body.len());
    let name = &body[..name_end];
    if name.is_empty() {
      return Err("missing package name".to_string());
    }

    let mut rest = body[name_end..].trim_start();

    let mut extras = Vec::new();
    if let Some(after) = rest.strip_prefix('[') {
      let close = after.find(']').ok_or_else(|| "unterminated extras list".to_string())?;
      extras = after[..close]
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect();
      rest = after[close + 1..].trim_start();
    }

    if let Some(url) = rest.strip_prefix('@') {
      let url = url.trim();
      if url.is_empty() {
        return Err("missing URL after '@'".to_string());
      }
      return Ok(Self {
        name: name.to_string(),
        extras,
        specifiers: Vec::new(),
        url: Some(url.to_string()),
      });
    }

    let rest = rest.trim();
    let rest = rest
      .strip_prefix('(')
      .and_then(|r| r.strip_suffix(')'))
      .unwrap_or(rest)
      .trim();

    let mut specifiers = Vec::new();
    if !rest.is_empty() {
      for clause in rest.split(',') {
        specifiers.push(parse_specifier(clause.trim())?);
      }
    }

    Ok(Self {
      name: name.to_string(),
      extras,
      specifiers,
      url: None,
    })
  }

  /// Whether this requirement names `package` (normalized comparison)
  pub fn names(&self, package: &str) -> bool {
    normalize_name(&self.name) == normalize_name(package)
  }
}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.name)?;
    if !self.extras.is_empty() {
      write!(f, "[{}]", self.extras.join(","))?;
    }
    if let Some(url) = &self.url {
      return write!(f, " @ {}", url);
    }
    let clauses: Vec<String> = self
      .specifiers
      .iter()
      .map(|s| format!("{}{}", s.operator, s.version))
      .collect();
    f.write_str(&clauses.join(","))
  }
}

fn parse_specifier(clause: &str) -> Result<Specifier, String> {
  let (token, operator) = Operator::TOKENS
    .iter()
    .find(|(token, _)| clause.starts_with(token))
    .ok_or_else(|| format!("'{}' has no comparison operator", clause))?;

  let version = clause[token.len()..].trim();
  if version.is_empty() {
    return Err(format!("'{}' has no version", clause));
  }

  Ok(Specifier {
    operator: *operator,
    version: version.to_string(),
  })
}

/// Lowercase, with runs of `-`, `_` and `.` collapsed to a single `-`
pub fn normalize_name(name: &str) -> String {
  let mut out = String::with_capacity(name.len());
  let mut in_separator = false;
  for c in name.chars() {
    if matches!(c, '-' | '_' | '.') {
      if !in_separator {
        out.push('-');
      }
      in_separator = true;
    } else {
      out.push(c.to_ascii_lowercase());
      in_separator = false;
    }
  }
  out
}
