pub mod copier;
pub mod location;

pub use copier::PreferenceCopier;
pub use location::{file_name, user_preferences_dir};
