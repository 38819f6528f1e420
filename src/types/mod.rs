//! Shared wire types.

pub mod pagination;
pub mod response;

pub use pagination::PaginationParams;
pub use response::{ApiResponse, Created, NoContent};
