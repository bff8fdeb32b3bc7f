pub mod hooks;
pub mod macmeta;

pub use hooks::SessionHooks;
pub use macmeta::{MacMetadata, NoopMacMetadata};
