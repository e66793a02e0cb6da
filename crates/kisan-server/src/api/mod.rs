pub mod chat;
pub mod error;
pub mod languages;
pub mod response;
pub mod state;

pub use error::ApiError;
pub use response::ApiResponse;
