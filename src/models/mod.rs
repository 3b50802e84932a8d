pub mod academics;
pub mod attendance;
pub mod common;
pub mod finance;
pub mod messaging;
pub mod people;

pub use academics::*;
pub use attendance::*;
pub use common::*;
pub use finance::*;
pub use messaging::*;
pub use people::*;
