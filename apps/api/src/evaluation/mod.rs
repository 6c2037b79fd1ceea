pub mod cache;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod requester;
