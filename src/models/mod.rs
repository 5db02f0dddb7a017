pub use presence::*;
pub use snapshot::*;
pub use trader::*;

pub mod presence;
pub mod snapshot;
pub mod trader;
