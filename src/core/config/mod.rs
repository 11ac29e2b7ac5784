pub mod data;
pub mod defaults;
pub mod io;


pub use data::Config;
pub use defaults::Settings;
pub use io::ConfigError;
