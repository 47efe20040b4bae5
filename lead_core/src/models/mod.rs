pub mod lead;
pub mod request;

pub use lead::{LeadSubmission, PhotoAttachment, Service, SubmissionResult};
pub use request::ApiResponse;
