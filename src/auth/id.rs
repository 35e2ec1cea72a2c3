//! Strongly typed identifiers interpolated into platform URL paths.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_segment($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_segment($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl TryFrom<&str> for $name {
			type Error = IdentifierError;

			fn try_from(value: &str) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl std::str::FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (asset, instance, attachment).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (asset, instance, attachment).
		kind: &'static str,
	},
	/// The identifier contains a character that would change the URL path or query.
	#[error("{kind} identifier contains the reserved character `{character}`.")]
	ReservedCharacter {
		/// Kind of identifier (asset, instance, attachment).
		kind: &'static str,
		/// Offending character.
		character: char,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (asset, instance, attachment).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AssetUid, "Kobo asset (form) uid, e.g. `aBcD1234`.", "Asset" }
def_id! { InstanceId, "Kobo submission instance identifier.", "Instance" }
def_id! { AttachmentId, "Kobo attachment identifier within a submission.", "Attachment" }

/// Identifier the iNaturalist API assigns to a created observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationId(pub u64);
impl ObservationId {
	/// Returns the raw numeric identifier.
	pub const fn get(self) -> u64 {
		self.0
	}
}
impl From<u64> for ObservationId {
	fn from(value: u64) -> Self {
		Self(value)
	}
}
impl Display for ObservationId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}

fn validate_segment(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if let Some(character) = view.chars().find(|c| matches!(c, '/' | '?' | '#' | '%')) {
		return Err(IdentifierError::ReservedCharacter { kind, character });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}
