//! Radar sweep engine: polar geometry, a scattered marker field, a time-driven sweep beam
//! and the selection state behind it, composed into one drawable frame per refresh.

mod macros;

pub mod beam;
pub mod category;
pub mod clock;
pub mod error;
pub mod field;
pub mod geometry;
pub mod scene;
pub mod selection;

pub use category::{Categories, Category, CategoryLabel, IconName};
pub use clock::{Animator, CancelGuard, CancelToken, Clock, ManualClock, SweepState, SystemClock};
pub use error::SceneError;
pub use field::{Field, FieldSource, FixedField, Marker, MarkerId, MarkerLabel, RandomField};
pub use geometry::{Point, SectorPath, Viewport};
pub use scene::{Frame, Interaction, LabelBox, Outline, Primitive, Radar, SceneConfig, Target};
pub use selection::{Notification, NotificationSink, Selection};
