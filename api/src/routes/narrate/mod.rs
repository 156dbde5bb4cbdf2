pub mod narrate_request;
pub mod narrate_response;
pub mod narrate_route;
