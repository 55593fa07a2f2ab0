pub mod errors;
pub mod forms;
pub mod models;
pub mod settings;
pub mod validation;

pub use errors::*;
pub use forms::*;
pub use models::*;
pub use settings::*;
pub use validation::*;
