pub mod error;
pub mod load;
pub mod normalize;
pub mod types;

pub use error::DataLoadError;
pub use load::{load_dataset, DataSource, LoadOptions};
pub use normalize::{normalize, normalize_default};
pub use types::{Dataset, NormalizeReport};
