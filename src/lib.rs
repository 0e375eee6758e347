pub mod commands;
pub mod fs;
pub mod release;
