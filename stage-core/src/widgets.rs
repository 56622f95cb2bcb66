//! Small widgets assembled from scene nodes.

use crate::interactive::{EventKind, Listener, NodeEvent};
use crate::node::SceneNode;
use crate::path::{PathGraphic, TextGraphic};
use crate::props::Fields;
use crate::{Color, Rect2D, Vector2D};

/// A text node builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    size: f64,
    color: Color,
    family: Option<String>,
}

impl Label {
    /// Black text at `size` pixels.
    #[must_use]
    pub fn new(text: impl Into<String>, size: f64) -> Self {
        Self {
            text: text.into(),
            size,
            color: Color::from_bytes(Color::BLACK),
            family: None,
        }
    }

    /// Set the text color.
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the font family.
    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Build the text node, centered on its position.
    #[must_use]
    pub fn build(self) -> SceneNode {
        let mut graphic = TextGraphic::new(self.text, self.size);
        if let Some(family) = self.family {
            graphic = graphic.with_family(family);
        }
        let mut node = SceneNode::text("", self.size);
        node.set_graphic(graphic);
        node.style.fill = Some(self.color);
        node
    }
}

/// Colors of a [`Button`].
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonStyle {
    /// Resting fill.
    pub fill: Color,
    /// Fill while the pointer is over the button.
    pub hover: Color,
    /// Fill while pressed.
    pub press: Color,
    /// Border color.
    pub border: Color,
    /// Caption color.
    pub text: Color,
    /// Caption size in pixels.
    pub font_size: f64,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            fill: Color::rgb(0xee, 0xee, 0xee),
            hover: Color::rgb(0xdd, 0xdd, 0xff),
            press: Color::rgb(0xaa, 0xaa, 0xee),
            border: Color::rgb(0x44, 0x44, 0x44),
            text: Color::from_bytes(Color::BLACK),
            font_size: 14.0,
        }
    }
}

/// Click callback of a [`Button`].
pub type ClickHandler = Box<dyn FnMut(&mut SceneNode)>;

/// Snapshot name applied while hovered.
pub const HOVER_STATE: &str = "hover";
/// Snapshot name applied while pressed.
pub const PRESS_STATE: &str = "press";

/// An interactive rectangle with a caption and a click callback.
///
/// Hover and press are state snapshots, so the resting look is whatever the
/// node showed before the pointer arrived.
pub struct Button {
    caption: String,
    rect: Rect2D,
    style: ButtonStyle,
    on_click: Option<ClickHandler>,
}

impl Button {
    /// A button covering `rect` in its parent's space.
    #[must_use]
    pub fn new(caption: impl Into<String>, rect: Rect2D) -> Self {
        Self {
            caption: caption.into(),
            rect,
            style: ButtonStyle::default(),
            on_click: None,
        }
    }

    /// Replace the style.
    #[must_use]
    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Run `handler` when a press is released over the button.
    #[must_use]
    pub fn on_click(mut self, handler: impl FnMut(&mut SceneNode) + 'static) -> Self {
        self.on_click = Some(Box::new(handler));
        self
    }

    /// Build the interactive node.
    #[must_use]
    pub fn build(self) -> SceneNode {
        let Rect2D { width, height, .. } = self.rect;
        let mut node =
            SceneNode::interactive(PathGraphic::rect(Rect2D::new(0.0, 0.0, width, height)));
        node.set_position(self.rect.position());
        node.style.fill = Some(self.style.fill.clone());
        node.style.border = Some(self.style.border.clone());

        node.add_state(HOVER_STATE, Fields::new().with("fill", self.style.hover.clone()));
        node.add_state(PRESS_STATE, Fields::new().with("fill", self.style.press.clone()));

        let mut caption = Label::new(self.caption, self.style.font_size)
            .color(self.style.text.clone())
            .build();
        caption.set_position(Vector2D::new(width / 2.0, height / 2.0));
        node.add_extra(caption);

        let mut on_click = self.on_click;
        let enter: Listener = Box::new(|node: &mut SceneNode, _: &NodeEvent| {
            node.switch_state(HOVER_STATE);
        });
        let leave: Listener = Box::new(|node: &mut SceneNode, _: &NodeEvent| {
            node.restore_state();
        });
        let down: Listener = Box::new(|node: &mut SceneNode, event: &NodeEvent| {
            if !event.claimed {
                node.switch_state(PRESS_STATE);
            }
        });
        let up: Listener = Box::new(move |node: &mut SceneNode, _: &NodeEvent| {
            let pressed = node
                .states()
                .and_then(|states| states.current_name())
                == Some(PRESS_STATE);
            if !pressed {
                return;
            }
            node.switch_state(HOVER_STATE);
            if let Some(handler) = on_click.as_mut() {
                tracing::debug!("Button {} clicked", node.id());
                handler(node);
            }
        });
        node.install_behavior(
            "button",
            vec![
                (EventKind::Enter, enter),
                (EventKind::Leave, leave),
                (EventKind::Down, down),
                (EventKind::Up, up),
            ],
        );
        node
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("caption", &self.caption)
            .field("rect", &self.rect)
            .field("style", &self.style)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}
