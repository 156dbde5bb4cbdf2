pub mod risk_request;
pub mod risk_route;
