//! Redacting wrapper shared by tokens, derived headers, and passwords.

// crates.io
use reqwest::header::HeaderValue;
// self
use crate::_prelude::*;

/// Secret string that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw value. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the secret is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Converts the secret into a header value flagged as sensitive, so reqwest and hyper keep it
	/// out of their own debug output. `None` when the value contains bytes a header cannot carry.
	pub fn header_value(&self) -> Option<HeaderValue> {
		let mut value = HeaderValue::from_str(&self.0).ok()?;

		value.set_sensitive(true);

		Some(value)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for TokenSecret {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenSecret(<redacted>)")
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn formatters_redact() {
		let secret = TokenSecret::from("what are you token about?");

		assert_eq!(format!("{secret:?}"), "TokenSecret(<redacted>)");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.expose(), "what are you token about?");
	}

	#[test]
	fn header_value_is_sensitive_and_validated() {
		let value = TokenSecret::new("Token abc123")
			.header_value()
			.expect("Printable ASCII should form a header value.");

		assert!(value.is_sensitive());
		assert_eq!(value, "Token abc123");
		assert!(TokenSecret::new("line\r\nbreak").header_value().is_none());
		assert!(TokenSecret::new("").is_empty());
	}
}
