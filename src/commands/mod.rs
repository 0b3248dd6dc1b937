pub mod check_tools;
pub mod init_config;
pub mod run;
pub mod stage;
