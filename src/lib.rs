pub mod capture;
pub mod cli;
pub mod config;
pub mod receipt;
pub mod state;
pub mod store;
pub mod tui;
pub mod utils;
pub mod wizard;

pub use config::Config;
pub use state::AppState;
pub use store::Store;
pub use utils::Profile;
