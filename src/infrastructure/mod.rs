pub mod collectors;
pub mod mail;
pub mod output;
