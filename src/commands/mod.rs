pub mod assume;
pub mod completions;

pub use assume::{AssumeCommand, Delivery};
pub use completions::CompletionsCommand;
