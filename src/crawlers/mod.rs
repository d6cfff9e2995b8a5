pub mod controller;
pub mod fetch;
pub mod pagination;
pub mod surface;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod tests;
