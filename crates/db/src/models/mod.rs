pub mod attribute;
pub mod criterion;
pub mod device;
