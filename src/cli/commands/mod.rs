//! One module per subcommand, each exposing `execute`.

pub mod add;
pub mod add_file;
pub mod completions;
pub mod delete;
pub mod export;
pub mod generate;
pub mod get;
pub mod init;
pub mod list;
pub mod reset;
pub mod status;
