pub mod helper;
pub mod init;
pub mod localize;
pub mod repair;
pub mod restore;
pub mod scan;

mod command_result;

pub use command_result::*;
