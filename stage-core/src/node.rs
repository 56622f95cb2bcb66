//! Scene nodes.
//!
//! A [`SceneNode`] is one positioned, styled, drawable entity. Position,
//! rotation and stretch live in a [`SharedFrame`] that other nodes may alias;
//! the body scale is shared the same way.
//! Optional capabilities are composed in rather than inherited:
//!
//! - a child list with its own inner frame (see [`crate::container`]),
//! - pointer and keyboard interaction (see [`crate::interactive`]),
//! - a [`StateSnapshotSet`] of named overlays,
//! - a fractional frame resolved against the parent's size.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::container::{ChildList, FractionalFrame};
use crate::interactive::InteractionState;
use crate::path::{Graphic, PathGraphic, TextGraphic};
use crate::props::{self, AssignMode, DeepClone, Fields, PropertyBag, Value};
use crate::scheduler::{TickId, TickScheduler};
use crate::shared::Shared;
use crate::snapshot::{SnapshotKey, StateSnapshotSet};
use crate::surface::DrawingSurface;
use crate::transform::{SharedFrame, TransformFrame};
use crate::{Color, Rect2D, Rotation2D, Vector2D};

/// Unique identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node was built as. Serials are counted per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A drawable path.
    Shape,
    /// A line of text.
    Text,
    /// A group of children with no body of its own.
    Container,
    /// A body plus children that reacts to input.
    Interactive,
}

/// Fill, border and glow.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    /// Fill color; `None` disables filling.
    pub fill: Option<Color>,
    /// Border color; `None` disables stroking.
    pub border: Option<Color>,
    /// Border width.
    pub line_width: f64,
    /// Glow blur radius; zero disables the glow.
    pub emissive: f64,
    /// Glow color.
    pub emissive_color: Color,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::from_bytes(Color::WHITE)),
            border: None,
            line_width: 1.0,
            emissive: 0.0,
            emissive_color: Color::from_bytes(Color::WHITE),
        }
    }
}

impl NodeStyle {
    /// Default style of a node kind. Text fills black, everything else white.
    #[must_use]
    pub fn for_kind(kind: NodeKind) -> Self {
        let mut style = Self::default();
        if kind == NodeKind::Text {
            style.fill = Some(Color::from_bytes(Color::BLACK));
        }
        style
    }
}

/// Stroke color used for debug bound outlines.
pub const DEBUG_BOUND_COLOR: [u8; 4] = [255, 0, 255, 255];

const POSITION_FIELDS: [&str; 3] = ["pos", "rotation", "stretch"];

/// A positioned, styled, drawable scene entity.
pub struct SceneNode {
    id: NodeId,
    kind: NodeKind,
    serial: Option<u64>,
    frame: SharedFrame,
    scale: Shared<Vector2D>,
    graphic: Graphic,
    /// Fill, border and glow.
    pub style: NodeStyle,
    /// Whether the node (and its children) render.
    pub visible: bool,
    /// Draw the bound outline on top of the body.
    pub debug_bound: bool,
    /// Timed callbacks run by [`update`](Self::update) with this node as context.
    pub scheduler: TickScheduler<SceneNode>,
    states: Option<StateSnapshotSet>,
    pub(crate) children: Option<ChildList>,
    pub(crate) interaction: Option<InteractionState>,
    pub(crate) fraction: Option<FractionalFrame>,
    pub(crate) body: bool,
}

impl SceneNode {
    /// Create a node of `kind` drawing `graphic`, with kind defaults.
    #[must_use]
    pub fn new(kind: NodeKind, graphic: impl Into<Graphic>) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            serial: None,
            frame: Shared::new(TransformFrame::IDENTITY),
            scale: Shared::new(Vector2D::ONE),
            graphic: graphic.into(),
            style: NodeStyle::for_kind(kind),
            visible: true,
            debug_bound: false,
            scheduler: TickScheduler::new(),
            states: None,
            children: matches!(kind, NodeKind::Container | NodeKind::Interactive)
                .then(ChildList::default),
            interaction: (kind == NodeKind::Interactive).then(InteractionState::default),
            fraction: None,
            body: kind != NodeKind::Container,
        }
    }

    /// A shape node.
    #[must_use]
    pub fn shape(graphic: impl Into<Graphic>) -> Self {
        Self::new(NodeKind::Shape, graphic)
    }

    /// A text node.
    #[must_use]
    pub fn text(text: &str, size: f64) -> Self {
        Self::new(NodeKind::Text, TextGraphic::new(text, size))
    }

    /// A container with no body. Its bound is the unit square, so its size
    /// is its scale.
    #[must_use]
    pub fn container() -> Self {
        Self::new(NodeKind::Container, PathGraphic::default())
    }

    /// An interactive node with a drawable body.
    #[must_use]
    pub fn interactive(graphic: impl Into<Graphic>) -> Self {
        Self::new(NodeKind::Interactive, graphic)
    }

    /// Build a node by seeding kind defaults and merging `values` under `mode`.
    ///
    /// A `frame` value is aliased rather than copied, and the frame's
    /// position, rotation and stretch are then kept instead of being reset
    /// to defaults.
    #[must_use]
    pub fn from_fields(kind: NodeKind, graphic: impl Into<Graphic>, values: &Fields, mode: AssignMode) -> Self {
        let mut node = Self::new(kind, graphic);
        if mode == AssignMode::Uninitialized {
            return node;
        }
        let mut values = values.clone();
        let mut defaults = Self::defaults(kind);
        if let Some(frame) = values.remove("frame").as_ref().and_then(Self::frame_value) {
            node.frame = frame;
            for name in POSITION_FIELDS {
                defaults.remove(name);
            }
        }
        props::initialize(&mut node, &values, &defaults, mode);
        node
    }

    fn frame_value(value: &Value) -> Option<SharedFrame> {
        match value {
            Value::Frame(frame) => Some(frame.clone()),
            _ => None,
        }
    }

    /// Default field values for a node kind.
    #[must_use]
    pub fn defaults(kind: NodeKind) -> Fields {
        let style = NodeStyle::for_kind(kind);
        Fields::new()
            .with("pos", Vector2D::ZERO)
            .with("rotation", Rotation2D::ZERO)
            .with("stretch", Vector2D::ONE)
            .with("scale", Vector2D::ONE)
            .with("fill", style.fill)
            .with("border", style.border)
            .with("line_width", style.line_width)
            .with("emissive", style.emissive)
            .with("emissive_color", style.emissive_color)
            .with("visible", true)
            .with("debug_bound", false)
    }

    // ---- identity ----

    /// Unique identifier.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Kind the node was built as.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Per-kind serial assigned by a [`Scene`](crate::Scene).
    #[must_use]
    pub const fn serial(&self) -> Option<u64> {
        self.serial
    }

    pub(crate) fn set_serial(&mut self, serial: u64) {
        self.serial = Some(serial);
    }

    /// Builder-style field merge in clone mode.
    #[must_use]
    pub fn with(mut self, values: &Fields) -> Self {
        props::update_values(&mut self, values, AssignMode::Clone);
        self
    }

    // ---- geometry ----

    /// The shared frame (aliased, not copied).
    #[must_use]
    pub fn frame(&self) -> SharedFrame {
        self.frame.clone()
    }

    /// Alias another frame.
    pub fn set_frame(&mut self, frame: SharedFrame) {
        self.frame = frame;
    }

    /// Position in parent space.
    #[must_use]
    pub fn position(&self) -> Vector2D {
        self.frame.borrow().translate
    }

    /// Move to `pos`.
    pub fn set_position(&mut self, pos: Vector2D) {
        self.frame.borrow_mut().translate = pos;
    }

    /// Rotation.
    #[must_use]
    pub fn rotation(&self) -> Rotation2D {
        self.frame.borrow().rotate
    }

    /// Rotate to `rotation`.
    pub fn set_rotation(&mut self, rotation: Rotation2D) {
        self.frame.borrow_mut().rotate = rotation;
    }

    /// Stretch: the frame scale, applied to the body and children alike.
    #[must_use]
    pub fn stretch(&self) -> Vector2D {
        self.frame.borrow().scale
    }

    /// Set the stretch.
    pub fn set_stretch(&mut self, stretch: Vector2D) {
        self.frame.borrow_mut().scale = stretch;
    }

    /// Scale applied to the body only.
    #[must_use]
    pub fn scale(&self) -> Vector2D {
        self.scale.get()
    }

    /// Set the body scale. Nodes aliasing this scale see the change.
    pub fn set_scale(&mut self, scale: Vector2D) {
        self.scale.set(scale);
    }

    /// What the node draws.
    #[must_use]
    pub const fn graphic(&self) -> &Graphic {
        &self.graphic
    }

    /// Mutable access to the graphic.
    pub fn graphic_mut(&mut self) -> &mut Graphic {
        &mut self.graphic
    }

    /// Replace the graphic.
    pub fn set_graphic(&mut self, graphic: impl Into<Graphic>) {
        self.graphic = graphic.into();
    }

    /// Authored bound of the graphic.
    #[must_use]
    pub fn bound(&self) -> Rect2D {
        self.graphic.bound()
    }

    /// Displayed width: `bound.width · scale.x · stretch.x`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bound().width * self.scale.borrow().x * self.stretch().x
    }

    /// Displayed height: `bound.height · scale.y · stretch.y`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bound().height * self.scale.borrow().y * self.stretch().y
    }

    fn solve(desired: f64, authored: f64, stretch: f64) -> f64 {
        let denominator = authored * stretch;
        if denominator == 0.0 {
            0.0
        } else {
            desired / denominator
        }
    }

    /// Resize by solving the body scale; stretch is left alone.
    pub fn set_width(&mut self, width: f64) {
        let x = Self::solve(width, self.bound().width, self.stretch().x);
        self.scale.borrow_mut().x = x;
    }

    /// Resize by solving the body scale; stretch is left alone.
    pub fn set_height(&mut self, height: f64) {
        let y = Self::solve(height, self.bound().height, self.stretch().y);
        self.scale.borrow_mut().y = y;
    }

    /// Set both dimensions.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.set_width(width);
        self.set_height(height);
    }

    /// Map a parent-space point into the node's local space.
    #[must_use]
    pub fn to_local(&self, point: Vector2D) -> Vector2D {
        self.frame.borrow().apply(point)
    }

    /// Whether the parent-space `point` hits the scaled graphic.
    #[must_use]
    pub fn is_inside(&self, point: Vector2D) -> bool {
        self.graphic.contains(self.to_local(point), self.scale())
    }

    /// Whether the parent-space `point` falls inside the scaled bound.
    #[must_use]
    pub fn is_in_bound(&self, point: Vector2D) -> bool {
        self.graphic.bound_contains(self.to_local(point), self.scale())
    }

    // ---- states ----

    /// The snapshot set, if any state was added.
    #[must_use]
    pub fn states(&self) -> Option<&StateSnapshotSet> {
        self.states.as_ref()
    }

    /// Register or replace a named state overlay.
    pub fn add_state(&mut self, name: &str, overlay: Fields) -> usize {
        self.states
            .get_or_insert_with(StateSnapshotSet::new)
            .put(name, overlay)
    }

    fn with_states<R>(&mut self, f: impl FnOnce(&mut StateSnapshotSet, &mut Self) -> R) -> Option<R> {
        let mut states = self.states.take()?;
        let out = f(&mut states, self);
        self.states = Some(states);
        Some(out)
    }

    /// Switch to a state, capturing the baseline first.
    pub fn switch_state<'k>(&mut self, key: impl Into<SnapshotKey<'k>>) -> bool {
        let key = key.into();
        self.with_states(|states, node| states.switch_to(node, key))
            .unwrap_or(false)
    }

    /// Return to the captured baseline.
    pub fn restore_state(&mut self) {
        self.with_states(|states, node| states.restore(node));
    }

    /// Advance to the next state, wrapping to the baseline.
    pub fn toggle_state(&mut self) -> usize {
        self.with_states(|states, node| states.toggle(node))
            .unwrap_or(0)
    }

    /// Turn the bound outline on or off for this node and its descendants.
    pub fn set_debug_bounds(&mut self, on: bool) {
        self.debug_bound = on;
        for child in self.children_mut() {
            child.set_debug_bounds(on);
        }
    }

    /// Lay out fractional children (recursively), then re-merge the selected
    /// state onto this node.
    pub fn refresh(&mut self) {
        self.layout_children();
        self.with_states(|states, node| states.apply_current(node));
    }

    // ---- frame lifecycle ----

    /// Advance this node's scheduler, then every child's.
    pub fn update(&mut self, delta: f64) {
        let mut scheduler = self.scheduler.detach();
        scheduler.update(delta, self);
        self.scheduler.reattach(scheduler);
        if let Some(children) = self.children.as_mut() {
            for child in &mut children.nodes {
                child.update(delta);
            }
        }
    }

    /// Move the field at `path` toward `target` over `frames` updates of
    /// one normalized frame each. The final step writes `target` exactly.
    ///
    /// Returns `None` (and logs a warning) when the path does not resolve or
    /// `target` cannot be read as that field's type. A new animation of the
    /// same path replaces the previous one.
    pub fn animate(&mut self, path: &str, target: impl Into<Value>, frames: f64) -> Option<TickId> {
        let Some(start) = self.handle(path).get() else {
            tracing::warn!("Cannot animate missing field {path:?}");
            return None;
        };
        let start = start.deep_clone();
        let target = target.into();
        if start.lerp(&target, 1.0).is_none() {
            tracing::warn!("Cannot animate {path:?} ({}) toward a {}", start.kind(), target.kind());
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let steps = frames.ceil().max(1.0) as i64;
        let name = format!("animate:{path}");
        self.scheduler.remove_named(&name);

        let path = path.to_string();
        let mut step = 0_i64;
        Some(self.scheduler.schedule(Some(&name), 1.0, steps, move |_, node: &mut SceneNode| {
            step += 1;
            let value = if step >= steps {
                target.coerce_like(&start)
            } else {
                #[allow(clippy::cast_precision_loss)]
                let t = step as f64 / steps as f64;
                start.lerp(&target, t)
            };
            if let Some(value) = value {
                node.handle(&path).set(value);
            }
        }))
    }

    /// Draw the node and its children.
    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        self.render_with(surface, &[]);
    }

    /// Draw the node, its children, then `extras` inside the inner frame.
    pub fn render_with(&self, surface: &mut dyn DrawingSurface, extras: &[&SceneNode]) {
        if !self.visible {
            return;
        }
        surface.save();
        self.frame.borrow().transform(surface);
        self.render_body(surface);
        if self.children.is_some() || !extras.is_empty() {
            self.render_children(surface, extras);
        }
        surface.restore();
    }

    fn render_body(&self, surface: &mut dyn DrawingSurface) {
        if !self.body {
            return;
        }
        let style = &self.style;
        if style.emissive > 0.0 {
            surface.set_shadow(style.emissive, &style.emissive_color);
        }
        if let Some(fill) = &style.fill {
            surface.set_fill_color(fill);
        }
        if let Some(border) = &style.border {
            surface.set_stroke_color(border);
            surface.set_line_width(style.line_width);
        }
        let scale = self.scale();
        self.graphic
            .render(surface, scale, style.border.is_some(), style.fill.is_some());

        if self.debug_bound {
            if style.emissive > 0.0 {
                surface.set_shadow(0.0, &style.emissive_color);
            }
            surface.set_stroke_color(&Color::from_bytes(DEBUG_BOUND_COLOR));
            surface.set_line_width(1.0);
            self.graphic.render_bound(surface, scale, true, false);
        }
    }
}

impl PropertyBag for SceneNode {
    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Self::defaults(self.kind).names().map(str::to_string).collect();
        if matches!(self.graphic, Graphic::Text(_)) {
            names.push("text".to_string());
        }
        names
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "pos" => self.position().into(),
            "rotation" => self.rotation().into(),
            "stretch" => self.stretch().into(),
            "scale" => Value::Vector(self.scale.clone()),
            "fill" => self.style.fill.clone().into(),
            "border" => self.style.border.clone().into(),
            "line_width" => self.style.line_width.into(),
            "emissive" => self.style.emissive.into(),
            "emissive_color" => self.style.emissive_color.clone().into(),
            "visible" => self.visible.into(),
            "debug_bound" => self.debug_bound.into(),
            "width" => self.width().into(),
            "height" => self.height().into(),
            "frame" => Value::Frame(self.frame.clone()),
            "text" => match &self.graphic {
                Graphic::Text(text) => text.text().into(),
                Graphic::Path(_) => return None,
            },
            _ => return None,
        })
    }

    fn assign(&mut self, name: &str, value: Value) -> bool {
        let optional_color = |value: &Value| match value {
            Value::Bool(false) => Some(None),
            other => other.to_color().map(Some),
        };
        match name {
            "pos" => match value.to_vector() {
                Some(v) => self.set_position(v),
                None => return false,
            },
            "x" | "y" => {
                let Some(n) = value.to_number() else {
                    return false;
                };
                let mut pos = self.position();
                if name == "x" {
                    pos.x = n;
                } else {
                    pos.y = n;
                }
                self.set_position(pos);
            }
            "rotation" => match value.to_rotation() {
                Some(r) => self.set_rotation(r),
                None => return false,
            },
            "stretch" => match value.to_vector() {
                Some(v) => self.set_stretch(v),
                None => return false,
            },
            "scale" => match value {
                Value::Vector(shared) => self.scale = shared,
                other => match other.to_vector() {
                    Some(v) => self.scale = Shared::new(v),
                    None => return false,
                },
            },
            "width" => match value.to_number() {
                Some(w) => self.set_width(w),
                None => return false,
            },
            "height" => match value.to_number() {
                Some(h) => self.set_height(h),
                None => return false,
            },
            "fill" => match optional_color(&value) {
                Some(c) => self.style.fill = c,
                None => return false,
            },
            "border" => match optional_color(&value) {
                Some(c) => self.style.border = c,
                None => return false,
            },
            "emissive_color" => match value.to_color() {
                Some(c) => self.style.emissive_color = c,
                None => return false,
            },
            "line_width" | "emissive" => {
                let Some(n) = value.to_number() else {
                    return false;
                };
                if name == "line_width" {
                    self.style.line_width = n;
                } else {
                    self.style.emissive = n;
                }
            }
            "visible" | "debug_bound" => {
                let Some(b) = value.to_bool() else {
                    return false;
                };
                if name == "visible" {
                    self.visible = b;
                } else {
                    self.debug_bound = b;
                }
            }
            "frame" => match Self::frame_value(&value) {
                Some(frame) => self.frame = frame,
                None => return false,
            },
            "text" => match (&mut self.graphic, value.to_text()) {
                (Graphic::Text(text), Some(s)) => text.set_text(s),
                _ => return false,
            },
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("serial", &self.serial)
            .field("frame", &self.frame)
            .field("scale", &self.scale)
            .field("style", &self.style)
            .field("visible", &self.visible)
            .field("children", &self.children.as_ref().map(|c| c.nodes.len()))
            .field("interactive", &self.interaction.is_some())
            .field("ticks", &self.scheduler.len())
            .finish_non_exhaustive()
    }
}
