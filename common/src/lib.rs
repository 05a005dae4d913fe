pub mod capture;
pub mod settings;
