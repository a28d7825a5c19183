pub mod install;
pub mod list;
pub mod ops;
pub mod publish;
pub mod uninstall;
