pub mod cell;
pub mod sheet;

pub use cell::Cell;
pub use sheet::{AppendResponse, SheetData, SheetRecord, SheetRow};
