pub mod impact_request;
pub mod impact_route;
