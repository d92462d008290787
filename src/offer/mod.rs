pub mod handlers;
pub mod identifier;
pub mod models;
pub mod pipeline;
pub mod validation;

#[cfg(test)]
mod tests;
