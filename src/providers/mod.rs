pub mod json_reference;

pub use json_reference::JsonReferenceProvider;
