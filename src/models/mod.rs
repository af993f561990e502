pub mod note;
pub mod settings;
pub mod user;

pub use note::{Note, NoteDraft, Suggestion};
pub use settings::{AppSettings, Theme};
pub use user::{Preferences, PreferencesPatch, User, UserProfile};
