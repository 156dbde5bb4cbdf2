pub mod file_summary;
pub mod impact;
pub mod narrate;
pub mod risk;
pub mod search;
