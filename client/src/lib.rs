pub mod domain;
pub mod infrastructure;

pub use domain::AppState;
pub use infrastructure::AppStateImpl;
pub use infrastructure::settings::Settings;
