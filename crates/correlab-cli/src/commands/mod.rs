pub mod analyze;
pub mod init;
pub mod play;
pub mod quest;
pub mod validate;
