//! Snake on a grid of cell nodes.
//!
//! The board is a container holding one shape per grid cell, laid out with
//! fractional frames so the whole grid follows the board size. Cells are
//! hidden until the snake or the food occupies them. Steps are driven by a
//! scheduler owned by the game; key events reach the board through the
//! scene and are applied on the next step.

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stage_core::{
    Color, DrawingSurface, EventKind, FractionalFrame, KeyEvent, Label, NodeEvent, NodeId,
    PathGraphic, PropertyBag, Rect2D, Scene, SceneNode, Shared, TickId, TickScheduler, Vector2D,
    REPEAT_FOREVER,
};
use stage_renderer::FrameTarget;

use crate::DemoConfig;

const MIN_GRID: u32 = 5;
const MAX_GRID: u32 = 200;
const FOOD_GLOW: f64 = 8.0;

fn snake_color() -> Color {
    Color::rgb(80, 200, 120)
}

fn food_color() -> Color {
    Color::rgb(230, 80, 60)
}

/// A cell coordinate; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl GridCell {
    /// Create a cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    const fn distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Heading of the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward row 0.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column 0.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Cell offset of one step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// The reverse heading.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Map arrow keys and WASD.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            _ => None,
        }
    }
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    /// The head left the board.
    Wall,
    /// The head ran into the body.
    SelfHit,
    /// The snake fills every cell.
    BoardFull,
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved one cell.
    Moved,
    /// Moved onto the food and grew.
    Ate,
    /// The game is over.
    Over(GameEnd),
}

/// A running snake game.
pub struct SnakeGame {
    scene: Scene,
    board: NodeId,
    score_label: NodeId,
    grid: i32,
    segments: VecDeque<GridCell>,
    direction: Direction,
    requested: Shared<Option<Direction>>,
    food: Option<GridCell>,
    food_pulse: Option<TickId>,
    rng: StdRng,
    ended: Option<GameEnd>,
    score: u32,
    steps: u64,
    autopilot: bool,
    step_interval: f64,
    scheduler: TickScheduler<SnakeGame>,
}

impl SnakeGame {
    /// Build the board, place a 3-segment snake at the center heading up
    /// and drop the first food.
    #[must_use]
    pub fn new(config: &DemoConfig) -> Self {
        let clamped = config.grid.clamp(MIN_GRID, MAX_GRID);
        if clamped != config.grid {
            tracing::warn!("Grid {} out of range, using {}", config.grid, clamped);
        }
        let grid = i32::try_from(clamped).unwrap_or(20);

        let side = f64::from(config.width.min(config.height));
        let mut scene = Scene::new(f64::from(config.width), f64::from(config.height));
        scene.background = Some(Color::rgb(24, 24, 32));

        let requested = Shared::new(None);
        let mut board = Self::build_board(grid, side, &requested);
        board.set_position(Vector2D::new(
            (f64::from(config.width) - side) / 2.0,
            (f64::from(config.height) - side) / 2.0,
        ));
        let board = scene.add_node(board);

        let mut label = Label::new("Score 0", 14.0)
            .color(Color::from_bytes(Color::WHITE))
            .build();
        label.set_position(Vector2D::new(f64::from(config.width) / 2.0, 12.0));
        let score_label = scene.add_node(label);

        let center = grid / 2;
        let segments = (0..3).map(|i| GridCell::new(center, center + i)).collect();

        let step_interval = if config.step_interval > 0.0 {
            config.step_interval
        } else {
            tracing::warn!("Step interval {} not positive, using 1", config.step_interval);
            1.0
        };

        let mut game = Self {
            scene,
            board,
            score_label,
            grid,
            segments,
            direction: Direction::Up,
            requested,
            food: None,
            food_pulse: None,
            rng: StdRng::seed_from_u64(config.seed),
            ended: None,
            score: 0,
            steps: 0,
            autopilot: config.autopilot,
            step_interval,
            scheduler: TickScheduler::new(),
        };
        game.scene.set_debug_bounds(config.debug_bounds);
        game.paint_snake();
        game.place_food();
        game.scheduler
            .schedule(Some("step"), step_interval, REPEAT_FOREVER, |state, game: &mut SnakeGame| {
                if let StepOutcome::Over(end) = game.proceed() {
                    tracing::info!("Game over after {} steps: {:?}", game.steps, end);
                    state.repeat = 0;
                }
            });
        tracing::debug!("Snake ready on a {grid}x{grid} board");
        game
    }

    fn build_board(grid: i32, side: f64, requested: &Shared<Option<Direction>>) -> SceneNode {
        let mut board = SceneNode::container();
        board.set_size(side, side);
        let unit = 1.0 / f64::from(grid);
        for y in 0..grid {
            for x in 0..grid {
                let mut cell = SceneNode::shape(PathGraphic::rect(Rect2D::new(0.0, 0.0, 1.0, 1.0)))
                    .with_fraction(FractionalFrame::new(
                        f64::from(x) * unit,
                        f64::from(y) * unit,
                        unit,
                        unit,
                    ));
                cell.visible = false;
                cell.style.border = None;
                board.add(cell);
            }
        }

        let requested = requested.clone();
        board.on(EventKind::KeyDown, move |_: &mut SceneNode, event: &NodeEvent| {
            if let Some(direction) = event.key.as_ref().and_then(|k| Direction::from_key(&k.key)) {
                requested.set(Some(direction));
            }
        });
        board
    }

    /// Advance the snake one cell.
    pub fn proceed(&mut self) -> StepOutcome {
        if let Some(end) = self.ended {
            return StepOutcome::Over(end);
        }
        if let Some(direction) = self.requested.replace(None) {
            self.steer(direction);
        }
        if self.autopilot {
            if let Some(direction) = self.autopilot_direction() {
                self.direction = direction;
            }
        }

        let head = self.head().step(self.direction);
        if !self.in_bounds(head) {
            return self.finish(GameEnd::Wall);
        }

        let ate = self.food == Some(head);
        if !ate {
            if let Some(tail) = self.segments.pop_back() {
                self.paint(tail, None);
            }
        }
        self.segments.push_front(head);
        if self.segments.iter().skip(1).any(|&c| c == head) {
            return self.finish(GameEnd::SelfHit);
        }
        self.paint(head, Some(snake_color()));
        self.steps += 1;

        if !ate {
            return StepOutcome::Moved;
        }
        self.score += 1;
        self.update_score();
        self.food = None;
        self.place_food();
        if self.food.is_none() {
            return self.finish(GameEnd::BoardFull);
        }
        StepOutcome::Ate
    }

    /// Turn toward `direction` unless that reverses the snake. Returns
    /// whether the heading changed.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            tracing::debug!("Ignoring reverse turn to {:?}", direction);
            return false;
        }
        let changed = direction != self.direction;
        self.direction = direction;
        changed
    }

    /// Route a key event through the scene; arrow keys queue a turn for
    /// the next step.
    pub fn dispatch_key(&mut self, event: &KeyEvent) {
        self.scene.dispatch_key(event);
    }

    /// Advance the step scheduler and every node by `delta` frames.
    pub fn update(&mut self, delta: f64) {
        let mut scheduler = self.scheduler.detach();
        scheduler.update(delta, self);
        self.scheduler.reattach(scheduler);
        self.scene.update(delta);
    }

    /// Replace the snake, head first.
    pub fn set_snake(&mut self, segments: impl IntoIterator<Item = GridCell>, direction: Direction) {
        let old: Vec<GridCell> = self.segments.drain(..).collect();
        for cell in old {
            self.paint(cell, None);
        }
        self.segments = segments.into_iter().collect();
        self.direction = direction;
        self.ended = None;
        self.paint_snake();
        if self.food.is_some_and(|f| self.segments.contains(&f)) {
            self.food = None;
            self.place_food();
        }
    }

    /// Move the food to `cell`, or remove it. Cells under the snake are
    /// rejected.
    pub fn set_food(&mut self, cell: Option<GridCell>) -> bool {
        if cell.is_some_and(|c| !self.in_bounds(c) || self.segments.contains(&c)) {
            return false;
        }
        if let Some(old) = self.food {
            self.paint(old, None);
        }
        self.food = cell;
        if let Some(cell) = cell {
            self.paint(cell, Some(food_color()));
        }
        true
    }

    fn finish(&mut self, end: GameEnd) -> StepOutcome {
        self.ended = Some(end);
        StepOutcome::Over(end)
    }

    fn autopilot_direction(&self) -> Option<Direction> {
        let head = self.head();
        let tail = self.segments.back().copied();
        let current = self.direction;
        std::iter::once(current)
            .chain(Direction::ALL.into_iter().filter(move |&d| d != current))
            .filter(|&d| d != current.opposite())
            .filter(|&d| {
                let next = head.step(d);
                self.in_bounds(next)
                    && !self.segments.iter().any(|&c| c == next && Some(c) != tail)
            })
            .min_by_key(|&d| self.food.map_or(0, |f| head.step(d).distance(f)))
    }

    fn place_food(&mut self) {
        let free: Vec<GridCell> = (0..self.grid)
            .flat_map(|y| (0..self.grid).map(move |x| GridCell::new(x, y)))
            .filter(|c| !self.segments.contains(c))
            .collect();
        if free.is_empty() {
            return;
        }
        let food = free[self.rng.gen_range(0..free.len())];
        self.food = Some(food);
        self.paint(food, Some(food_color()));
        let frames = self.step_interval;
        let pulse = self
            .cell_mut(food)
            .and_then(|cell| cell.animate("emissive", FOOD_GLOW, frames));
        self.food_pulse = pulse;
        tracing::debug!("Food at ({}, {})", food.x, food.y);
    }

    fn paint_snake(&mut self) {
        let cells: Vec<GridCell> = self.segments.iter().copied().collect();
        for cell in cells {
            self.paint(cell, Some(snake_color()));
        }
    }

    /// Show `cell` in `color`, or hide it.
    fn paint(&mut self, cell: GridCell, color: Option<Color>) {
        if self.food == Some(cell) {
            if let Some(pulse) = self.food_pulse.take() {
                if let Some(node) = self.cell_mut(cell) {
                    node.scheduler.remove(pulse);
                }
            }
        }
        let Some(node) = self.cell_mut(cell) else {
            return;
        };
        node.style.emissive = 0.0;
        node.visible = color.is_some();
        if let Some(color) = color {
            node.style.emissive_color = color.clone();
            node.style.fill = Some(color);
        }
    }

    fn update_score(&mut self) {
        let text = format!("Score {}", self.score);
        if let Some(label) = self.scene.get_mut(self.score_label) {
            if !label.handle("text").set(text) {
                tracing::warn!("Score label rejected its text");
            }
        }
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        usize::try_from(cell.y * self.grid + cell.x).ok()
    }

    fn cell_mut(&mut self, cell: GridCell) -> Option<&mut SceneNode> {
        let index = self.index(cell)?;
        self.scene
            .get_mut(self.board)?
            .children_mut()
            .get_mut(index)
    }

    /// The node drawing `cell`.
    #[must_use]
    pub fn cell(&self, cell: GridCell) -> Option<&SceneNode> {
        let index = self.index(cell)?;
        self.scene.get(self.board)?.children().get(index)
    }

    fn in_bounds(&self, cell: GridCell) -> bool {
        (0..self.grid).contains(&cell.x) && (0..self.grid).contains(&cell.y)
    }

    /// The head cell.
    #[must_use]
    pub fn head(&self) -> GridCell {
        self.segments.front().copied().unwrap_or(GridCell::new(0, 0))
    }

    /// Segments, head first.
    #[must_use]
    pub fn segments(&self) -> &VecDeque<GridCell> {
        &self.segments
    }

    /// Current heading.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current food cell.
    #[must_use]
    pub fn food(&self) -> Option<GridCell> {
        self.food
    }

    /// Food eaten so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Successful steps taken.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Why the game ended, if it did.
    #[must_use]
    pub fn ended(&self) -> Option<GameEnd> {
        self.ended
    }

    /// Cells per side.
    #[must_use]
    pub fn grid(&self) -> i32 {
        self.grid
    }

    /// The scene holding the board.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The board container.
    #[must_use]
    pub fn board(&self) -> Option<&SceneNode> {
        self.scene.get(self.board)
    }
}

impl fmt::Debug for SnakeGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnakeGame")
            .field("grid", &self.grid)
            .field("segments", &self.segments)
            .field("direction", &self.direction)
            .field("food", &self.food)
            .field("score", &self.score)
            .field("ended", &self.ended)
            .finish_non_exhaustive()
    }
}

impl FrameTarget for SnakeGame {
    fn advance(&mut self, delta: f64) {
        self.update(delta);
    }

    fn draw(&self, surface: &mut dyn DrawingSurface) {
        self.scene.render(surface);
    }

    fn background(&self) -> Option<Color> {
        self.scene.background.clone()
    }

    fn show_bounds(&mut self, on: bool) {
        self.scene.set_debug_bounds(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(grid: u32) -> SnakeGame {
        SnakeGame::new(&DemoConfig {
            grid,
            ..DemoConfig::new()
        })
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::from_key("d"), Some(Direction::Right));
        assert_eq!(Direction::from_key("Enter"), None);
    }

    #[test]
    fn test_reverse_turn_ignored() {
        let mut game = game(10);
        assert!(!game.steer(Direction::Down));
        assert_eq!(game.direction(), Direction::Up);
        assert!(game.steer(Direction::Left));
    }

    #[test]
    fn test_wall_ends_game() {
        let mut game = game(5);
        game.set_snake([GridCell::new(2, 0), GridCell::new(2, 1)], Direction::Up);
        assert_eq!(game.proceed(), StepOutcome::Over(GameEnd::Wall));
        assert_eq!(game.proceed(), StepOutcome::Over(GameEnd::Wall));
    }

    #[test]
    fn test_grid_is_clamped() {
        assert_eq!(game(2).grid(), 5);
    }

    #[test]
    fn test_food_is_free_and_glows() {
        let game = game(8);
        let food = game.food().unwrap();
        assert!(!game.segments().contains(&food));
        let cell = game.cell(food).unwrap();
        assert!(cell.visible);
        assert_eq!(cell.style.fill, Some(food_color()));
    }
}
