//! Session module - one game from spawn to game over
//!
//! Owns the field, the active/ghost/held pieces, the lookahead queue, the
//! piece source and the notification bus. Everything happens inside
//! [`Session::update`] (once per frame) or [`Session::handle`] (once per
//! input event); the session never spawns threads or blocks.
//!
//! Listeners run while the session is mid-call. To react with a command they
//! push it through a [`CommandSender`]; queued commands run in FIFO order at
//! the end of the outermost `update`/`handle`, at most
//! [`MAX_DEFERRED_PER_CALL`] per call.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use arrayvec::ArrayVec;
use tracing::{debug, info, trace};

use crate::bus::{ListenerId, NotificationBus};
use crate::grid::Grid;
use crate::piece::Piece;
use crate::rules::{Rules, RulesError, Timing};
use crate::scoring::{drop_score, goal_reduction, line_clear_score, line_score_category};
use crate::source::{PieceSource, SevenBag};
use crate::types::{
    Cell, CellTag, Command, Coord, LineScore, Notification, NotificationKind, PieceKind,
    FIELD_HEIGHT, FIELD_WIDTH, KICK_TESTS, QUEUE_LENGTH, SPAWN_MARGIN, VISIBLE_ROWS,
};

/// Deferred commands applied per `update`/`handle` call
pub const MAX_DEFERRED_PER_CALL: usize = 64;

/// Bottom row of the hidden spawn margin
const SPAWN_BUFFER_ROW: i32 = FIELD_HEIGHT - 1 - SPAWN_MARGIN;

/// Highest row a piece can occupy
const TOP_INTERIOR_ROW: i32 = FIELD_HEIGHT - 2;

/// T box corners, piece-local
const T_CORNERS: [(i32, i32); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Running,
    Paused,
    GameOver,
}

/// Queues commands for a session from inside a notification listener
#[derive(Debug, Clone)]
pub struct CommandSender {
    queue: Rc<RefCell<VecDeque<Command>>>,
}

impl CommandSender {
    pub fn send(&self, command: Command) {
        self.queue.borrow_mut().push_back(command);
    }

    /// Commands not yet applied
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[derive(Debug)]
pub struct Session<S: PieceSource = SevenBag> {
    rules: Rules,
    timing: Timing,
    source: S,
    bus: NotificationBus,
    deferred: Rc<RefCell<VecDeque<Command>>>,

    field: Grid,
    spawn_buffer: Grid,
    active: Piece,
    position: Coord,
    ghost: Piece,
    held: Option<Piece>,
    queue: ArrayVec<Piece, QUEUE_LENGTH>,

    start_level: u32,
    level: u32,
    score: u32,
    goal: i32,
    last_clear: u32,
    state: SessionState,

    fall_timer: f64,
    lock_timer: f64,
    shift_timer: f64,
    held_this_turn: bool,
    lock_resets: u8,
    left: bool,
    right: bool,
    soft_drop: bool,
    last_action_rotation: bool,
}

impl Session<SevenBag> {
    /// New game with default rules and a 7-bag seeded with `seed`
    pub fn new(seed: u32, start_level: u32) -> Self {
        Self::build(SevenBag::new(seed), start_level, Rules::default())
    }

    pub fn with_rules(seed: u32, start_level: u32, rules: Rules) -> Result<Self, RulesError> {
        Self::with_source(SevenBag::new(seed), start_level, rules)
    }
}

impl<S: PieceSource> Session<S> {
    /// New game drawing from `source`. A start level of 0 is treated as 1
    pub fn with_source(source: S, start_level: u32, rules: Rules) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self::build(source, start_level, rules))
    }

    /// `rules` must already be valid
    fn build(source: S, start_level: u32, rules: Rules) -> Self {
        let start_level = start_level.max(1);
        let placeholder = Piece::spawn(PieceKind::I);
        let mut session = Self {
            timing: Timing::for_level(&rules, start_level),
            rules,
            source,
            bus: NotificationBus::new(),
            deferred: Rc::new(RefCell::new(VecDeque::new())),
            field: bordered_field(),
            spawn_buffer: spawn_buffer(),
            ghost: placeholder.clone(),
            active: placeholder,
            position: Coord::ZERO,
            held: None,
            queue: ArrayVec::new(),
            start_level,
            level: start_level,
            score: 0,
            goal: 0,
            last_clear: 0,
            state: SessionState::Running,
            fall_timer: 0.0,
            lock_timer: 0.0,
            shift_timer: 0.0,
            held_this_turn: false,
            lock_resets: 0,
            left: false,
            right: false,
            soft_drop: false,
            last_action_rotation: false,
        };
        session.reset_state();
        session
    }

    /// Advance the game by `dt` seconds. Does nothing unless running
    pub fn update(&mut self, dt: f64) {
        if self.state == SessionState::Running {
            self.tick(dt);
        }
        self.drain_deferred();
    }

    /// Apply one input event; returns whether anything changed
    pub fn handle(&mut self, command: Command) -> bool {
        let changed = self.apply(command);
        self.drain_deferred();
        changed
    }

    fn drain_deferred(&mut self) {
        for _ in 0..MAX_DEFERRED_PER_CALL {
            let Some(command) = self.deferred.borrow_mut().pop_front() else {
                break;
            };
            trace!(command = command.as_str(), "deferred command");
            self.apply(command);
        }
    }

    fn apply(&mut self, command: Command) -> bool {
        match self.state {
            SessionState::GameOver => match command {
                Command::Restart => self.restart(),
                _ => false,
            },
            SessionState::Paused => match command {
                Command::Pause | Command::Unpause => self.set_paused(false),
                Command::Restart => self.restart(),
                // Releases still count so keys let go during a pause don't repeat
                Command::MoveLeft(false) => std::mem::take(&mut self.left),
                Command::MoveRight(false) => std::mem::take(&mut self.right),
                Command::SoftDrop(false) => std::mem::take(&mut self.soft_drop),
                _ => false,
            },
            SessionState::Running => match command {
                Command::MoveLeft(true) => {
                    let was_held = std::mem::replace(&mut self.left, true);
                    self.shift(-1) || !was_held
                }
                Command::MoveRight(true) => {
                    let was_held = std::mem::replace(&mut self.right, true);
                    self.shift(1) || !was_held
                }
                Command::MoveLeft(false) => std::mem::take(&mut self.left),
                Command::MoveRight(false) => std::mem::take(&mut self.right),
                Command::SoftDrop(true) => {
                    if self.soft_drop {
                        return false;
                    }
                    self.soft_drop = true;
                    self.fall_timer = 0.0;
                    true
                }
                Command::SoftDrop(false) => std::mem::take(&mut self.soft_drop),
                Command::RotateLeft => self.rotate(false),
                Command::RotateRight => self.rotate(true),
                Command::HardDrop => {
                    self.hard_drop();
                    true
                }
                Command::Hold => self.hold(),
                Command::Pause => self.set_paused(true),
                Command::Unpause => false,
                Command::Restart => self.restart(),
            },
        }
    }

    fn tick(&mut self, dt: f64) {
        // Auto-repeat
        if self.left != self.right {
            let dx = if self.left { -1 } else { 1 };
            let (delay, interval) = (self.rules.auto_shift_delay, self.rules.auto_repeat_interval);
            self.shift_timer += dt;
            while self.shift_timer >= delay {
                if !self.shift(dx) {
                    // Against a wall: skip the repeats that would all fail
                    let excess = self.shift_timer - delay;
                    self.shift_timer = delay - interval + excess % interval;
                    break;
                }
                self.shift_timer -= interval;
            }
        } else {
            self.shift_timer = 0.0;
        }

        // Lock delay
        if self.blocked_below() {
            self.lock_timer += dt;
        } else {
            self.lock_timer = 0.0;
        }

        let threshold = self.timing.lock;
        if self.lock_timer >= threshold {
            if !self.lock() {
                return;
            }
            self.lock_timer -= threshold;
        } else {
            self.fall_timer += dt;
        }

        // Gravity
        let (interval, points) = if self.soft_drop {
            (self.timing.soft_drop, self.rules.soft_drop_points)
        } else {
            (self.timing.fall, 0)
        };
        while self.fall_timer >= interval {
            if self.blocked_below() {
                self.fall_timer %= interval;
                break;
            }
            self.position.y -= 1;
            if self.soft_drop {
                self.score = self.score.saturating_add(points);
                self.post(Notification::SoftDropped);
            }
            self.fall_timer -= interval;
        }
    }

    fn blocked_below(&self) -> bool {
        self.collides_at(self.position.offset(0, -1))
    }

    fn collides_at(&self, pos: Coord) -> bool {
        self.field.intersects(self.active.grid(), pos.x, pos.y)
    }

    /// Rows the active piece can fall before it rests
    fn drop_distance(&self) -> i32 {
        let mut rows = 0;
        while rows < FIELD_HEIGHT && !self.collides_at(self.position.offset(0, -rows - 1)) {
            rows += 1;
        }
        rows
    }

    fn shift(&mut self, dx: i32) -> bool {
        if self.collides_at(self.position.offset(dx, 0)) {
            return false;
        }
        self.position.x += dx;
        self.last_action_rotation = false;
        self.reset_lock_delay();
        self.post(Notification::Shifted);
        true
    }

    fn rotate(&mut self, clockwise: bool) -> bool {
        let mut candidate = self.active.clone();
        if clockwise {
            candidate.rotate_cw();
        } else {
            candidate.rotate_ccw();
        }
        let from = self.active.orientation();
        let to = candidate.orientation();

        for i in 0..KICK_TESTS {
            let target = self.position + self.active.kick_translation(from, to, i);
            if self.field.intersects(candidate.grid(), target.x, target.y) {
                continue;
            }
            self.position = target;
            self.active = candidate;
            if clockwise {
                self.ghost.rotate_cw();
            } else {
                self.ghost.rotate_ccw();
            }
            self.last_action_rotation = true;
            self.reset_lock_delay();
            return true;
        }

        trace!(kind = self.active.kind().as_str(), ?from, ?to, "rotation rejected");
        false
    }

    /// Resets the lock timer while the piece can still fall, up to the cap
    fn reset_lock_delay(&mut self) {
        if self.ghost_position() != self.position && self.lock_resets < self.rules.lock_reset_cap {
            self.lock_timer = 0.0;
            self.lock_resets += 1;
        }
    }

    fn hard_drop(&mut self) {
        let rows = self.drop_distance();
        self.position.y -= rows;
        let rows = rows as u32;
        self.score = self
            .score
            .saturating_add(drop_score(&self.rules, rows, true));
        self.post(Notification::HardDropped { rows });
        self.lock();
    }

    fn hold(&mut self) -> bool {
        if self.held_this_turn {
            return false;
        }
        let kind = self.active.kind();
        let swap = self.held.take();
        self.spawn(swap);
        self.held = Some(self.source.piece(kind));
        self.held_this_turn = true;
        debug!(kind = kind.as_str(), "held");
        true
    }

    /// Merge the active piece and spawn the next one.
    /// Returns false (and ends the game) when the piece can't be locked
    fn lock(&mut self) -> bool {
        let pos = self.position;
        let grid = self.active.grid();
        if self.field.intersects(grid, pos.x, pos.y)
            || self
                .spawn_buffer
                .intersects(grid, pos.x - 1, pos.y - SPAWN_BUFFER_ROW)
        {
            self.state = SessionState::GameOver;
            info!(score = self.score, level = self.level, "game over");
            self.post(Notification::GameOver { score: self.score });
            return false;
        }

        for (x, y, cell) in grid.occupied_cells() {
            self.field.set_cell(pos.x + x, pos.y + y, cell);
        }

        let kind = self.active.kind();
        let t_spin = self.is_t_spin();
        let lines = self.clear_full_rows();
        self.score_clear(lines, t_spin);
        debug!(kind = kind.as_str(), lines, score = self.score, "locked");
        self.post(Notification::LockedIn { kind });

        self.spawn(None);
        self.held_this_turn = false;
        self.lock_resets = 0;
        true
    }

    /// Call after merging, before clearing rows
    fn is_t_spin(&self) -> bool {
        if self.active.kind() != PieceKind::T || !self.last_action_rotation {
            return false;
        }
        let pos = self.position;
        let filled = T_CORNERS
            .iter()
            .filter(|&&(cx, cy)| self.field.get(pos.x + cx, pos.y + cy))
            .count();
        filled >= 3
    }

    fn clear_full_rows(&mut self) -> usize {
        let mut lines = 0;
        let mut y = 1;
        while y <= VISIBLE_ROWS {
            if (1..FIELD_WIDTH - 1).all(|x| self.field.get(x, y)) {
                self.collapse_row(y);
                self.post(Notification::RowCleared {
                    row: y + lines as i32 - 1,
                });
                lines += 1;
            } else {
                y += 1;
            }
        }
        lines
    }

    /// Remove row `y`, moving everything above down by one
    fn collapse_row(&mut self, y: i32) {
        for row in y..TOP_INTERIOR_ROW {
            for x in 1..FIELD_WIDTH - 1 {
                let above = self.field.cell(x, row + 1);
                self.field.set_cell(x, row, above);
            }
        }
        for x in 1..FIELD_WIDTH - 1 {
            self.field.set_cell(x, TOP_INTERIOR_ROW, Cell::EMPTY);
        }
    }

    fn score_clear(&mut self, lines: usize, t_spin: bool) {
        let back_to_back = lines == 4 && self.last_clear == 4;
        let points = line_clear_score(&self.rules, lines, self.level, back_to_back);
        self.score = self.score.saturating_add(points);
        self.goal -= goal_reduction(&self.rules, lines, back_to_back);

        if let Some(category) = line_score_category(lines, back_to_back) {
            self.post(Notification::Scored(category));
        }
        if t_spin {
            self.post(Notification::Scored(LineScore::TSpin));
        }
        self.last_clear = lines as u32;

        if self.goal <= 0 {
            self.level_up();
        }
    }

    fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
        self.goal = self.rules.goal_for_level(self.level);
        self.timing = Timing::for_level(&self.rules, self.level);
        info!(level = self.level, fall = self.timing.fall, "level up");
        self.post(Notification::LevelUp { level: self.level });
    }

    /// Make the next piece active: `supplied` on a hold swap, else the queue front
    fn spawn(&mut self, supplied: Option<Piece>) {
        let piece = match supplied {
            Some(piece) => piece,
            None => self.pop_queue(),
        };
        self.place(piece);
    }

    fn pop_queue(&mut self) -> Piece {
        let next = self.source.next_piece();
        let front = self.queue.remove(0);
        self.queue.push(next);
        front
    }

    fn place(&mut self, piece: Piece) {
        self.position = Coord::new(
            FIELD_WIDTH / 2 - (piece.width() + 1) / 2,
            FIELD_HEIGHT - 1 - piece.height(),
        ) + piece.spawn_offset();
        self.ghost = piece.clone();
        self.ghost.set_all_tags(CellTag::Ghost);
        self.shift_timer = 0.0;
        self.last_action_rotation = false;
        debug!(
            kind = piece.kind().as_str(),
            x = self.position.x,
            y = self.position.y,
            "spawned"
        );
        self.active = piece;
    }

    fn set_paused(&mut self, paused: bool) -> bool {
        let target = if paused {
            SessionState::Paused
        } else {
            SessionState::Running
        };
        if self.state == target {
            return false;
        }
        self.state = target;
        info!(paused, "pause changed");
        self.post(Notification::Paused(paused));
        true
    }

    fn restart(&mut self) -> bool {
        let was_paused = self.state == SessionState::Paused;
        self.source.reset();
        self.reset_state();
        info!(level = self.level, "restarted");
        if was_paused {
            self.post(Notification::Paused(false));
        }
        true
    }

    /// Everything except the piece source and the listeners back to a new game
    fn reset_state(&mut self) {
        self.field = bordered_field();
        self.held = None;
        self.queue.clear();
        for _ in 0..QUEUE_LENGTH {
            self.queue.push(self.source.next_piece());
        }

        self.level = self.start_level;
        self.goal = self.rules.goal_for_level(self.level);
        self.timing = Timing::for_level(&self.rules, self.level);
        self.score = 0;
        self.last_clear = 0;
        self.state = SessionState::Running;

        self.fall_timer = 0.0;
        self.lock_timer = 0.0;
        self.held_this_turn = false;
        self.lock_resets = 0;
        self.left = false;
        self.right = false;
        self.soft_drop = false;

        self.spawn(None);
    }

    fn post(&mut self, notification: Notification) {
        self.bus.post(&notification);
    }

    pub fn field(&self) -> &Grid {
        &self.field
    }

    /// Direct field access, for setting up positions in tests and benches
    #[cfg(any(test, feature = "test-support"))]
    pub fn field_mut(&mut self) -> &mut Grid {
        &mut self.field
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    /// Field position of the active piece's local (0, 0)
    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn ghost(&self) -> &Piece {
        &self.ghost
    }

    /// Where the active piece would land after a hard drop
    pub fn ghost_position(&self) -> Coord {
        self.position.offset(0, -self.drop_distance())
    }

    pub fn held(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    /// Upcoming pieces, next first
    pub fn queue(&self) -> &[Piece] {
        &self.queue
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Line credits left before the next level
    pub fn goal(&self) -> i32 {
        self.goal
    }

    /// Rows cleared by the most recent lock
    pub fn last_clear(&self) -> u32 {
        self.last_clear
    }

    pub fn is_loss(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn lock_resets(&self) -> u8 {
        self.lock_resets
    }

    pub fn can_hold(&self) -> bool {
        !self.held_this_turn
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn subscribe_to<F>(&mut self, kind: NotificationKind, callback: F) -> ListenerId
    where
        F: FnMut(&Notification) + 'static,
    {
        self.bus.subscribe_to(kind, callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn command_sender(&self) -> CommandSender {
        CommandSender {
            queue: Rc::clone(&self.deferred),
        }
    }
}

/// 12x24 field with a solid one-cell border
fn bordered_field() -> Grid {
    let mut field = Grid::new(FIELD_WIDTH, FIELD_HEIGHT);
    for x in 0..FIELD_WIDTH {
        field.set(x, 0, true);
        field.set(x, FIELD_HEIGHT - 1, true);
    }
    for y in 0..FIELD_HEIGHT {
        field.set(0, y, true);
        field.set(FIELD_WIDTH - 1, y, true);
    }
    field
}

/// Solid block covering the hidden rows, anchored at (1, SPAWN_BUFFER_ROW)
fn spawn_buffer() -> Grid {
    let mut grid = Grid::new(FIELD_WIDTH - 2, SPAWN_MARGIN);
    for y in 0..SPAWN_MARGIN {
        for x in 0..FIELD_WIDTH - 2 {
            grid.set(x, y, true);
        }
    }
    grid
}
