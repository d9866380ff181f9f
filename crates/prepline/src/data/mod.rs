//! Table, column and value types shared by every stage.

mod column;
mod table;
mod types;
mod value;

pub use column::Column;
pub use table::Table;
pub use types::{ColumnType, Role};
pub use value::Value;

pub(crate) use value::ValueKey;
