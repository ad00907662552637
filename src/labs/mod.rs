pub mod hidden_endpoint;
pub mod private_fields;
pub mod private_posts;
