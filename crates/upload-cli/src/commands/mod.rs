//! Command implementations for upload-form

pub mod stored;
pub mod upload;

pub use stored::stored;
pub use upload::upload;
