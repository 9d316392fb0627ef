pub mod error;
pub mod obs;
pub mod table;
pub mod trail;

pub use crate::error::{Error, Result};
pub use crate::table::double_key::DoubleKeyTable;
pub use crate::table::infinite::InfiniteTable;
pub use crate::table::linear_probe::LinearProbeTable;
pub use crate::trail::mountain::Mountain;
pub use crate::trail::path::{Trail, TrailSeries, TrailSplit, TrailStore};
