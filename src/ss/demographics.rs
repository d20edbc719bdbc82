//! Demographics extraction from the Shared Service's FHIR-flavored user
//! document.
//!
//! The document nests names under `name.given`/`name.family`, carries email in
//! a `telecom` array keyed by `system`, and hides the service-assigned user id
//! and username in a labeled `identifier` array. Every field is optional on the
//! wire and stays optional here.

// crates.io
use serde_json::Value;
use time::{Date, macros::format_description};
// self
use crate::_prelude::*;

/// Wire names for the demographics document.
mod wire {
	pub const BIRTH_DATE: &str = "birthDate";
	pub const GENDER: &str = "gender";
	pub const GENDER_FEMALE: &str = "female";
	pub const GENDER_MALE: &str = "male";
	pub const IDENTIFIER: &str = "identifier";
	pub const IDENTIFIER_LABEL: &str = "label";
	pub const IDENTIFIER_USER_ID: &str = "Truenth identifier";
	pub const IDENTIFIER_USERNAME: &str = "Truenth username";
	pub const IDENTIFIER_VALUE: &str = "value";
	pub const NAME: &str = "name";
	pub const NAME_FAMILY: &str = "family";
	pub const NAME_GIVEN: &str = "given";
	pub const PHOTO: &str = "photo";
	pub const PHOTO_URL: &str = "url";
	pub const TELECOM: &str = "telecom";
	pub const TELECOM_SYSTEM: &str = "system";
	pub const TELECOM_SYSTEM_EMAIL: &str = "email";
	pub const TELECOM_VALUE: &str = "value";
}

/// Genders the Shared Service reports; anything else is treated as absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
	/// Wire value `female`.
	Female,
	/// Wire value `male`.
	Male,
}

/// Demographics record extracted from a user document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
	/// Service-assigned numeric user id.
	pub user_id: Option<i64>,
	/// Service-assigned username.
	pub username: Option<String>,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
	/// Email address from the telecom list.
	pub email: Option<String>,
	/// Reported gender, when recognizable.
	pub gender: Option<Gender>,
	/// Birth date, when present and parseable as `yyyy-MM-dd`.
	pub birth_date: Option<Date>,
	/// First photo URL, when present and parseable.
	pub photo_url: Option<Url>,
}

/// Extracts every known demographics field from a user document.
pub fn extract_demographics(data: &Value) -> Demographics {
	Demographics {
		user_id: extract_user_id(data),
		username: extract_username(data),
		first_name: extract_first_name(data),
		last_name: extract_last_name(data),
		email: extract_email(data),
		gender: extract_gender(data),
		birth_date: extract_birth_date(data),
		photo_url: extract_photo_url(data),
	}
}

/// Extracts the service-assigned numeric user id from the identifier list.
pub fn extract_user_id(data: &Value) -> Option<i64> {
	labeled_identifier(data, wire::IDENTIFIER_USER_ID)?.as_i64()
}

/// Extracts the service-assigned username from the identifier list.
pub fn extract_username(data: &Value) -> Option<String> {
	Some(labeled_identifier(data, wire::IDENTIFIER_USERNAME)?.as_str()?.to_owned())
}

/// Extracts the given name from the nested name object.
pub fn extract_first_name(data: &Value) -> Option<String> {
	Some(data.get(wire::NAME)?.get(wire::NAME_GIVEN)?.as_str()?.to_owned())
}

/// Extracts the family name from the nested name object.
pub fn extract_last_name(data: &Value) -> Option<String> {
	Some(data.get(wire::NAME)?.get(wire::NAME_FAMILY)?.as_str()?.to_owned())
}

/// Extracts the first email entry from the telecom list.
pub fn extract_email(data: &Value) -> Option<String> {
	data.get(wire::TELECOM)?.as_array()?.iter().find_map(|entry| {
		let system = entry.get(wire::TELECOM_SYSTEM)?.as_str()?;

		if system != wire::TELECOM_SYSTEM_EMAIL {
			return None;
		}

		Some(entry.get(wire::TELECOM_VALUE)?.as_str()?.to_owned())
	})
}

/// Extracts the gender, accepting only the wire values `male` and `female`.
pub fn extract_gender(data: &Value) -> Option<Gender> {
	match data.get(wire::GENDER)?.as_str()? {
		wire::GENDER_FEMALE => Some(Gender::Female),
		wire::GENDER_MALE => Some(Gender::Male),
		_ => None,
	}
}

/// Extracts the birth date; unparseable dates are treated as absent.
pub fn extract_birth_date(data: &Value) -> Option<Date> {
	let format = format_description!("[year]-[month]-[day]");

	Date::parse(data.get(wire::BIRTH_DATE)?.as_str()?, &format).ok()
}

/// Extracts the first photo URL; unparseable URLs are treated as absent.
pub fn extract_photo_url(data: &Value) -> Option<Url> {
	let raw = data.get(wire::PHOTO)?.as_array()?.first()?.get(wire::PHOTO_URL)?.as_str()?;

	Url::parse(raw).ok()
}

fn labeled_identifier<'d>(data: &'d Value, label: &str) -> Option<&'d Value> {
	data.get(wire::IDENTIFIER)?.as_array()?.iter().find_map(|entry| {
		if entry.get(wire::IDENTIFIER_LABEL)?.as_str()? == label {
			entry.get(wire::IDENTIFIER_VALUE)
		} else {
			None
		}
	})
}
