pub mod file_summary_request;
pub mod file_summary_response;
pub mod file_summary_route;
