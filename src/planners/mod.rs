mod policy;
mod projection;
mod route;
mod search;

pub use policy::{Action, DecisionPolicy};
pub use projection::{NoProjection, OpponentModel, SelfPreservingBombers};
pub use route::{Route, Step};
pub use search::{ITEM_BONUS, RouteSearch};
