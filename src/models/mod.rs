pub(crate) mod lenient;
mod switches;
mod tunnels;
mod vlans;
mod vxlans;

pub use switches::*;
pub use tunnels::*;
pub use vlans::*;
pub use vxlans::*;
