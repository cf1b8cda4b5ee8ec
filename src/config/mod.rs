pub mod credentials;
pub mod proc_loader;
pub mod settings;
