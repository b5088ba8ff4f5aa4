//! View synchronizer: filters the canonical checkpoint list and keeps the
//! map, the side panel and the selection consistent with it.

pub mod debounce;
pub mod error;
pub mod filter;
pub mod list;
pub mod reconcile;
pub mod selection;
pub mod session;
pub mod snapshot;
pub mod stats;
pub mod style;
pub mod surface;

pub use debounce::Debouncer;
pub use error::ViewError;
pub use filter::{compute_view, compute_view_records, filter_options, CategoryFilter, FilterOptions, ViewQuery};
pub use list::{build_list, ListGroup, ListRow, ListSnapshot};
pub use reconcile::{fail_load, ViewController, ViewSettings};
pub use selection::{Selection, SelectionChange};
pub use session::{forward_map_ready, wait_for_map_ready, Session, UiEvent};
pub use snapshot::{map_snapshot, MapFeature, MapFeatureCollection};
pub use stats::{compute_stats, Stats};
pub use style::{legend, LayerId, LegendEntry, MapStyle, PointPaint};
pub use surface::{MapSurface, Panel, PopupDetail};
