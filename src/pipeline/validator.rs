use reqwest::Url;

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
  Required,
  Number,
  Positive,
  Min(f64),
  Max(f64),
  Url,
}

/// One form field: its label as shown in messages, its raw text and the rules to check in order.
pub struct Field<'a> {
  pub label: &'a str,
  pub value: &'a str,
  pub rules: &'a [Rule],
}

impl<'a> Field<'a> {
  pub fn new(label: &'a str, value: &'a str, rules: &'a [Rule]) -> Self {
    Field { label, value, rules }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
  pub errors: Vec<String>,
}

impl ValidationReport {
  pub fn is_valid(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn first_error(&self) -> Option<&str> {
    self.errors.first().map(|e| e.as_str())
  }
}

pub fn required(value: &str) -> bool {
  !value.trim().is_empty()
}

pub fn parse_number(value: &str) -> Option<f64> {
  match value.trim().parse::<f64>() {
    Ok(number) if number.is_finite() => Some(number),
    _ => None,
  }
}

pub fn number(value: &str) -> bool {
  parse_number(value).is_some()
}

pub fn positive(value: &str) -> bool {
  parse_number(value).map_or(false, |n| n > 0.0)
}

pub fn min(value: &str, min: f64) -> bool {
  parse_number(value).map_or(false, |n| n >= min)
}

pub fn max(value: &str, max: f64) -> bool {
  parse_number(value).map_or(false, |n| n <= max)
}

pub fn url(value: &str) -> bool {
  Url::parse(value.trim()).is_ok()
}

fn check(rule: &Rule, field: &Field) -> Option<String> {
  let label = field.label;
  let value = field.value;
  match rule {
    Rule::Required if !required(value) => Some(format!("{} is required", label)),
    Rule::Number if !number(value) => Some(format!("{} must be a number", label)),
    Rule::Positive if !positive(value) => Some(format!("{} must be greater than 0", label)),
    Rule::Min(bound) if !min(value, *bound) => Some(format!("{} must be at least {}", label, bound)),
    Rule::Max(bound) if !max(value, *bound) => Some(format!("{} must be at most {}", label, bound)),
    Rule::Url if !url(value) => Some(format!("{} must be a valid URL", label)),
    _ => None,
  }
}

/// Checks every field, stopping at the first failing rule of each one.
pub fn validate_fields(fields: &[Field]) -> ValidationReport {
  let mut errors: Vec<String> = Vec::new();

  for field in fields {
    if let Some(error) = field.rules.iter().find_map(|rule| check(rule, field)) {
      errors.push(error);
    }
  }

  ValidationReport { errors }
}
