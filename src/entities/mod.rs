mod map;
mod route;
mod zone;

pub use map::{Map, MapDraft, MAP_SERVICE_PREFIX};
pub use route::{Route, RouteDetail, RouteDraft, RouteSummary};
pub use zone::Zone;
