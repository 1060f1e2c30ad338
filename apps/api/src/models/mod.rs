pub mod response;
pub mod session;

pub use response::{AuditMetadata, Response};
pub use session::SessionContext;
