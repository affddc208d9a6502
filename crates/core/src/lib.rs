pub mod columns;
pub mod models;
pub mod period;
pub mod series_set;
pub mod traits;

pub use columns::*;
pub use models::*;
pub use period::*;
pub use series_set::*;
pub use traits::*;
