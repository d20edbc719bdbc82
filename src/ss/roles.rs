//! Role list extraction.
//!
//! Wire format: `{"roles": [{"name": "...", "description": "..."}, ...]}`.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Wire names for the roles document.
mod wire {
	pub const DESCRIPTION: &str = "description";
	pub const NAME: &str = "name";
	pub const ROOT: &str = "roles";
}

/// A role the Shared Service associates with a user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	/// Role name, e.g. `admin`.
	pub name: String,
	/// Human-readable description.
	pub description: String,
}

/// Extracts a single role entry; entries missing either field are skipped.
pub fn extract_role(data: &Value) -> Option<Role> {
	let name = data.get(wire::NAME)?.as_str()?.to_owned();
	let description = data.get(wire::DESCRIPTION)?.as_str()?.to_owned();

	Some(Role { name, description })
}

/// Extracts the role list from a roles document.
///
/// A document without a `roles` key yields an empty list rather than an error;
/// the Shared Service omits the key for users with no roles.
pub fn extract_roles(data: &Value) -> Vec<Role> {
	data.get(wire::ROOT)
		.and_then(Value::as_array)
		.map(|entries| entries.iter().filter_map(extract_role).collect())
		.unwrap_or_default()
}
