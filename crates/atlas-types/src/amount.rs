//! Exact decimal-to-subunit conversion.
//!
//! Amounts cross the wire as human-readable decimal strings. Binary
//! floats cannot represent most decimal fractions, so the conversion to
//! integer subunits is done by shifting digits in the string itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An amount of coin subunits, as a decimal digit string.
///
/// [`to_subunits`] output contains only digits: no sign, no decimal
/// point, no leading zeros (except the single digit "0"). Construction
/// from a string or from the wire is not validated; the type carries
/// the text as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub String);

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Amount {
	fn from(s: &str) -> Self {
		Amount(s.to_string())
	}
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
	#[error("empty decimal string")]
	Empty,

	#[error("invalid decimal string {0:?}")]
	Invalid(String),

	#[error("{value:?} does not fit in {decimals} decimals")]
	ExcessPrecision { value: String, decimals: u32 },
}

/// Scales a decimal string by `10^decimals` into an exact subunit count.
///
/// `"0.00125"` at 8 decimals yields `"125000"`; `"100000"` at 8 decimals
/// yields `"10000000000000"`. Fractional digits beyond `decimals` are
/// only accepted when zero, anything else would lose precision.
pub fn to_subunits(value: &str, decimals: u32) -> Result<Amount, AmountError> {
	let value = value.trim();
	if value.is_empty() {
		return Err(AmountError::Empty);
	}

	let (int_part, frac_part) = match value.split_once('.') {
		Some((i, f)) => (i, f),
		None => (value, ""),
	};
	if int_part.is_empty() && frac_part.is_empty() {
		return Err(AmountError::Invalid(value.to_string()));
	}
	let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
	if !all_digits(int_part) || !all_digits(frac_part) {
		return Err(AmountError::Invalid(value.to_string()));
	}

	let decimals = decimals as usize;
	let (kept, excess) = if frac_part.len() > decimals {
		frac_part.split_at(decimals)
	} else {
		(frac_part, "")
	};
	if excess.bytes().any(|b| b != b'0') {
		return Err(AmountError::ExcessPrecision {
			value: value.to_string(),
			decimals: decimals as u32,
		});
	}

	let mut digits = String::with_capacity(int_part.len() + decimals);
	digits.push_str(int_part);
	digits.push_str(kept);
	for _ in kept.len()..decimals {
		digits.push('0');
	}

	let trimmed = digits.trim_start_matches('0');
	if trimmed.is_empty() {
		Ok(Amount("0".to_string()))
	} else {
		Ok(Amount(trimmed.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fractional_scaling() {
		assert_eq!(to_subunits("0.00125", 8).unwrap(), Amount::from("125000"));
		assert_eq!(
			to_subunits("1.00000000", 8).unwrap(),
			Amount::from("100000000")
		);
		assert_eq!(
			to_subunits("2.10572645", 8).unwrap(),
			Amount::from("210572645")
		);
	}

	#[test]
	fn test_integer_scaling() {
		assert_eq!(
			to_subunits("100000", 8).unwrap(),
			Amount::from("10000000000000")
		);
		assert_eq!(to_subunits("1", 0).unwrap(), Amount::from("1"));
	}

	#[test]
	fn test_zero() {
		assert_eq!(to_subunits("0", 8).unwrap(), Amount::from("0"));
		assert_eq!(to_subunits("0.0000", 8).unwrap(), Amount::from("0"));
	}

	#[test]
	fn test_trailing_zero_excess_is_exact() {
		assert_eq!(to_subunits("0.1230", 3).unwrap(), Amount::from("123"));
	}

	#[test]
	fn test_excess_precision_rejected() {
		let err = to_subunits("0.1234", 3).unwrap_err();
		assert!(matches!(err, AmountError::ExcessPrecision { .. }));
	}

	#[test]
	fn test_invalid_input_rejected() {
		assert_eq!(to_subunits("", 8).unwrap_err(), AmountError::Empty);
		assert!(matches!(
			to_subunits("-1", 8).unwrap_err(),
			AmountError::Invalid(_)
		));
		assert!(matches!(
			to_subunits("1.2.3", 8).unwrap_err(),
			AmountError::Invalid(_)
		));
		assert!(matches!(
			to_subunits("1e8", 8).unwrap_err(),
			AmountError::Invalid(_)
		));
		assert!(matches!(
			to_subunits(".", 8).unwrap_err(),
			AmountError::Invalid(_)
		));
	}

	#[test]
	fn test_wire_text_passes_through_unvalidated() {
		let amount: Amount = serde_json::from_str(r#""00125""#).unwrap();
		assert_eq!(amount, Amount::from("00125"));
		assert_eq!(serde_json::to_string(&amount).unwrap(), r#""00125""#);
	}

	#[test]
	fn test_bare_fraction() {
		assert_eq!(to_subunits(".5", 1).unwrap(), Amount::from("5"));
		assert_eq!(to_subunits("5.", 1).unwrap(), Amount::from("50"));
	}
}
