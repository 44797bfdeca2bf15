use chrono::NaiveDateTime;

/// Groups integer digits the Indian way: last three, then pairs (12,34,567).
fn group_indian(digits: &str) -> String {
  if digits.len() <= 3 {
    return digits.to_string();
  }

  let (head, tail) = digits.split_at(digits.len() - 3);
  let mut groups: Vec<&str> = Vec::new();
  let mut end: usize = head.len();
  while end > 0 {
    let start: usize = end.saturating_sub(2);
    groups.push(&head[start..end]);
    end = start;
  }
  groups.reverse();
  format!("{},{}", groups.join(","), tail)
}

/// Rupee amount with no fraction digits, e.g. `₹1,00,000`.
pub fn format_inr(amount: f64) -> String {
  let rounded: f64 = amount.round();
  let sign: &str = if rounded < 0.0 { "-" } else { "" };
  let digits: String = format!("{:.0}", rounded.abs());
  format!("{}₹{}", sign, group_indian(&digits))
}

/// Indian-grouped number with up to three fraction digits.
pub fn format_number(num: f64) -> String {
  let sign: &str = if num < 0.0 { "-" } else { "" };
  let fixed: String = format!("{:.3}", num.abs());
  let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
  let fraction: &str = fraction.trim_end_matches('0');
  if fraction.is_empty() {
    format!("{}{}", sign, group_indian(whole))
  } else {
    format!("{}{}.{}", sign, group_indian(whole), fraction)
  }
}

pub fn time_only(at: NaiveDateTime) -> String {
  at.format("%I:%M %p").to_string()
}

pub fn timestamp(at: NaiveDateTime) -> String {
  at.format("%d/%m/%Y, %I:%M:%S %p").to_string()
}

/// Chart widget symbols live on the NSE feed; bare tickers get the exchange prefix.
pub fn normalize_chart_symbol(input: &str) -> Option<String> {
  let symbol: String = input.trim().to_uppercase();
  if symbol.is_empty() {
    return None;
  }
  if symbol.starts_with("NSE:") {
    Some(symbol)
  } else {
    Some(format!("NSE:{}", symbol))
  }
}
