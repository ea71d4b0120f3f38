pub mod interaction;
pub mod manifest_editor;
pub mod update_checker;

pub use interaction::UpdateInteraction;
pub use manifest_editor::ManifestEditor;
pub use update_checker::{ApplyReport, CheckReport, UpdateChecker};
