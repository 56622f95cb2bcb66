//! # Stagecraft Core
//!
//! Retained-mode 2D scene graph: positioned, styled, drawable nodes that are
//! advanced once per animation frame and receive pointer and keyboard input
//! through nested coordinate spaces.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 stage-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Scene           │  Input                   │
//! │  - SceneNode     │  - Pointer / key events  │
//! │  - Containers    │  - Enter / leave / claim │
//! │  - Registry      │  - Drag behavior         │
//! ├─────────────────────────────────────────────┤
//! │  Properties      │  Time                    │
//! │  - PropertyBag   │  - TickScheduler         │
//! │  - Snapshots     │  - Animation             │
//! ├─────────────────────────────────────────────┤
//! │  Geometry: vectors, frames, paths, colors   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nothing here draws directly. Nodes emit operations onto a
//! [`DrawingSurface`], which a renderer backs with a real graphics API.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod error;
pub mod event;
pub mod geometry;
pub mod interactive;
pub mod node;
pub mod path;
pub mod presets;
pub mod props;
pub mod scene;
pub mod scheduler;
pub mod shared;
pub mod snapshot;
pub mod surface;
pub mod transform;
pub mod widgets;

pub use container::FractionalFrame;
pub use error::{StageError, StageResult};
pub use event::{InputEvent, KeyEvent, KeyModifiers, KeyPhase, PointerEvent, PointerKind};
pub use geometry::{Color, Rect2D, Rotation2D, Vector2D, EPSILON};
pub use interactive::{EventKind, ListenerId, NodeEvent};
pub use node::{NodeId, NodeKind, NodeStyle, SceneNode};
pub use path::{Graphic, PathCommand, PathError, PathGraphic, TextGraphic};
pub use presets::{PathPreset, PresetTable};
pub use props::{AssignMode, AttributeHandle, DeepClone, Fields, PropertyBag, Value};
pub use scene::Scene;
pub use scheduler::{TickId, TickScheduler, TickState, REPEAT_FOREVER};
pub use shared::Shared;
pub use snapshot::{SnapshotKey, StateSnapshotSet};
pub use surface::{DrawingSurface, EllipseSpec, RecordingSurface, SurfaceOp, TextMetrics};
pub use transform::{SharedFrame, TransformFrame};
pub use widgets::{Button, ButtonStyle, Label};

/// Stagecraft core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
