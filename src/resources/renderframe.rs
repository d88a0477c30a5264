//! Per-frame draw list.
//!
//! Screens never draw directly. They push [`DrawItem`]s into a
//! [`RenderFrame`] and the frontend replays them through a [`Renderer`] in
//! a fixed order:
//!
//! 1. by [`RenderLayer`], in declaration order,
//! 2. within a layer by ascending `depth` (usually the y of an entity's
//!    base, so things lower on screen are drawn later and appear in front),
//! 3. ties broken by the `tie` key, then by push order.
//!
//! Sorting does not mutate the frame, so dispatching the same frame twice
//! issues the same calls in the same order.

use std::cmp::Ordering;

use crate::components::mapposition::Vec2;
use crate::resources::animationstore::FrameId;

/// Draw layers from back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    Background,
    Water,
    Ground,
    Soil,
    SoilWater,
    RainFloor,
    HouseBottom,
    GroundPlant,
    Main,
    HouseTop,
    Fruit,
    RainDrops,
    Sky,
    Ui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(230, 41, 55);
    pub const GREEN: Color = Color::rgb(0, 228, 48);
    pub const GOLD: Color = Color::rgb(255, 203, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }
}

/// Coordinate space of a draw item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// World units; the camera offset applies.
    World,
    /// Screen pixels; fixed on screen.
    Screen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite {
        frame: FrameId,
        pos: Vec2,
        tint: Color,
    },
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
        filled: bool,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
    },
    /// Cover the whole viewport; `Multiply` tints what is below.
    Fill { color: Color, mode: BlendMode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Alpha,
    Multiply,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub layer: RenderLayer,
    pub depth: f32,
    pub tie: u64,
    pub space: Space,
    pub cmd: DrawCmd,
}

impl DrawItem {
    fn order(&self, other: &DrawItem) -> Ordering {
        self.layer
            .cmp(&other.layer)
            .then_with(|| self.depth.total_cmp(&other.depth))
            .then_with(|| self.tie.cmp(&other.tie))
    }
}

/// Backend that turns draw items into pixels (or counts them).
pub trait Renderer {
    /// `camera` is the world position shown at the viewport's top-left.
    fn draw(&mut self, item: &DrawItem, camera: Vec2);
}

/// Draw items collected for one frame plus the view they are seen through.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    items: Vec<DrawItem>,
    next_tie: u64,
    pub camera: Vec2,
    pub viewport: Vec2,
    pub clear: Color,
}

impl RenderFrame {
    pub fn new(viewport: Vec2) -> Self {
        RenderFrame {
            items: Vec::new(),
            next_tie: 0,
            camera: Vec2::ZERO,
            viewport,
            clear: Color::BLACK,
        }
    }

    /// Drop last frame's items, keeping the allocation and the viewport.
    pub fn reset(&mut self) {
        self.items.clear();
        self.next_tie = 0;
        self.camera = Vec2::ZERO;
        self.clear = Color::BLACK;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Push with a tie key taken from push order.
    pub fn push(&mut self, layer: RenderLayer, depth: f32, space: Space, cmd: DrawCmd) {
        let tie = self.next_tie;
        self.push_with_tie(layer, depth, tie, space, cmd);
    }

    /// Push with an explicit tie key (an entity id, say) so equal depths
    /// order the same way regardless of query order.
    pub fn push_with_tie(
        &mut self,
        layer: RenderLayer,
        depth: f32,
        tie: u64,
        space: Space,
        cmd: DrawCmd,
    ) {
        self.next_tie = self.next_tie.max(tie) + 1;
        self.items.push(DrawItem {
            layer,
            depth,
            tie,
            space,
            cmd,
        });
    }

    pub fn sprite(&mut self, layer: RenderLayer, depth: f32, frame: &FrameId, pos: Vec2) {
        self.push(
            layer,
            depth,
            Space::World,
            DrawCmd::Sprite {
                frame: frame.clone(),
                pos,
                tint: Color::WHITE,
            },
        );
    }

    /// Screen-space text on the UI layer.
    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.push(
            RenderLayer::Ui,
            y,
            Space::Screen,
            DrawCmd::Text {
                text: text.into(),
                pos: Vec2::new(x, y),
                size,
                color,
            },
        );
    }

    /// Items in draw order.
    pub fn sorted(&self) -> Vec<&DrawItem> {
        let mut order: Vec<&DrawItem> = self.items.iter().collect();
        order.sort_by(|a, b| a.order(b));
        order
    }

    /// World rectangle currently on screen, as (min, max).
    pub fn visible_rect(&self) -> (Vec2, Vec2) {
        (self.camera, self.camera + self.viewport)
    }

    /// Whether a world-space box touches the visible rectangle.
    pub fn is_visible(&self, pos: Vec2, size: Vec2) -> bool {
        let (min, max) = self.visible_rect();
        !(pos.x + size.x < min.x || pos.x > max.x || pos.y + size.y < min.y || pos.y > max.y)
    }

    /// Replay every item in draw order. Returns the number of calls made.
    pub fn dispatch(&self, renderer: &mut dyn Renderer) -> usize {
        let order = self.sorted();
        for item in &order {
            renderer.draw(item, self.camera);
        }
        order.len()
    }
}

/// Renderer that only records what it was asked to draw.
#[derive(Debug, Default)]
pub struct DrawLog {
    pub calls: Vec<DrawItem>,
}

impl Renderer for DrawLog {
    fn draw(&mut self, item: &DrawItem, _camera: Vec2) {
        self.calls.push(item.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(frame: &mut RenderFrame, layer: RenderLayer, depth: f32) {
        frame.push(
            layer,
            depth,
            Space::World,
            DrawCmd::Rect {
                pos: Vec2::ZERO,
                size: Vec2::new(1.0, 1.0),
                color: Color::WHITE,
                filled: true,
            },
        );
    }

    #[test]
    fn test_layer_then_depth_order() {
        let mut frame = RenderFrame::new(Vec2::new(100.0, 100.0));
        rect(&mut frame, RenderLayer::Main, 50.0);
        rect(&mut frame, RenderLayer::Ground, 90.0);
        rect(&mut frame, RenderLayer::Main, 10.0);
        rect(&mut frame, RenderLayer::Ui, 0.0);
        let order: Vec<(RenderLayer, f32)> =
            frame.sorted().iter().map(|i| (i.layer, i.depth)).collect();
        assert_eq!(
            order,
            vec![
                (RenderLayer::Ground, 90.0),
                (RenderLayer::Main, 10.0),
                (RenderLayer::Main, 50.0),
                (RenderLayer::Ui, 0.0),
            ]
        );
    }

    #[test]
    fn test_dispatch_is_idempotent() {
        let mut frame = RenderFrame::new(Vec2::new(100.0, 100.0));
        for i in 0..20 {
            rect(&mut frame, RenderLayer::Main, (i % 3) as f32);
        }
        let mut a = DrawLog::default();
        let mut b = DrawLog::default();
        assert_eq!(frame.dispatch(&mut a), 20);
        frame.dispatch(&mut b);
        assert_eq!(a.calls, b.calls);
    }

    #[test]
    fn test_explicit_tie_breaks_equal_depth() {
        let mut frame = RenderFrame::new(Vec2::new(10.0, 10.0));
        let cmd = DrawCmd::Fill {
            color: Color::BLACK,
            mode: BlendMode::Alpha,
        };
        frame.push_with_tie(RenderLayer::Main, 1.0, 9, Space::World, cmd.clone());
        frame.push_with_tie(RenderLayer::Main, 1.0, 3, Space::World, cmd);
        let ties: Vec<u64> = frame.sorted().iter().map(|i| i.tie).collect();
        assert_eq!(ties, vec![3, 9]);
    }

    #[test]
    fn test_visibility_uses_camera() {
        let mut frame = RenderFrame::new(Vec2::new(100.0, 100.0));
        frame.camera = Vec2::new(200.0, 0.0);
        assert!(!frame.is_visible(Vec2::new(0.0, 0.0), Vec2::new(64.0, 64.0)));
        assert!(frame.is_visible(Vec2::new(250.0, 50.0), Vec2::new(64.0, 64.0)));
    }
}
