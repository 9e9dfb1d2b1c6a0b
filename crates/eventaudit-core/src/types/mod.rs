mod bus;
mod issue;
mod records;
mod report;
mod rule;
mod tags;
mod target;
mod topology;

pub use bus::*;
pub use issue::*;
pub use records::*;
pub use report::*;
pub use rule::*;
pub use tags::*;
pub use target::*;
pub use topology::*;
