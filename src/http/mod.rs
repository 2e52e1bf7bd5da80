pub mod charset;
pub mod formheaders;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use formheaders::FormHeaders;
pub use request::{FormMethod, FormRequest};
pub use response::HttpResponse;
