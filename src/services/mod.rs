pub mod admission;
pub mod user_schema;
