pub mod assess;
pub mod compare;
pub mod init;
pub mod list_models;
pub mod score;
pub mod validate;
