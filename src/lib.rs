pub mod analysis;
pub mod cli;
pub mod ctx;
pub mod error;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod subset;
