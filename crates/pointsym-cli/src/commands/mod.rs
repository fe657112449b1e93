pub mod analyze;
pub mod animate;
pub mod list;
pub mod survey;
pub mod table;
