//! User records for the greeter surface.
//!
//! This layer is a sibling consumer of session data, not a dependency of
//! seat provisioning: the greeter needs to show who can log in, nothing
//! more. Accordingly it is pure property storage with two behaviors:
//!
//! - a user's **display name falls back to the username** when no real
//!   name is known ([`UserRecord::display_name`]);
//! - per-user defaults (language, keyboard layout, session) and the user
//!   list itself are **populated once** behind an explicit guard, not
//!   re-fetched on every access.

mod error;
mod roster;
mod user;

pub use error::UserError;
pub use roster::{PasswdFile, UserRoster, UserSource, parse_passwd};
pub use user::{DefaultsSource, UserDefaults, UserRecord};
