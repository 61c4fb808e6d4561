pub mod ids;
pub mod invoice;
pub mod page;
pub mod trip;
pub mod trucker;

pub use ids::*;
pub use invoice::*;
pub use page::*;
pub use trip::*;
pub use trucker::*;
