//! Holiday sources: offline rule tables and the Nager.Date HTTP API.

pub mod builtin;
pub mod nager;
pub mod rules;

pub use builtin::BuiltinHolidays;
pub use nager::NagerHolidays;
