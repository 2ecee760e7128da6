//! Remote diagram generation for pyuml
//!
//! This crate sends Python source to a chat-completion service and pulls
//! the PlantUML block out of the answer. It is an alternative to the local
//! class model builder, selected by configuration, and never mixed with it.

pub mod bridge;
pub mod extract;
pub mod prompt;
pub mod providers;


pub use bridge::{ChatCompletion, ChatProvider, RemoteSource};
pub use extract::extract_plantuml_block;
pub use providers::{create_provider, ProviderOptions};
