//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the rules engine, the input mapper and the terminal renderer alike.
//!
//! # Field Dimensions
//!
//! The playing field is a 12x24 grid with the origin at the bottom-left:
//!
//! - **Row 0** and **row 23**: solid border
//! - **Column 0** and **column 11**: solid border
//! - **Rows 1-20**: the visible playing field
//! - **Rows 21-22**: hidden spawn margin above the visible field
//!
//! # Tuning Defaults
//!
//! Times are in seconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_AUTO_SHIFT_DELAY` | 0.2666666 | Hold time before auto-repeat starts (DAS) |
//! | `DEFAULT_AUTO_REPEAT_INTERVAL` | 0.0388888 | Interval between auto-repeat shifts (ARR) |
//! | `GRAVITY_BASE` | 1.3 | Fall interval is `1 / 1.3^(level-1)` |
//! | `SOFT_DROP_INTERVAL` | 0.068 | Soft drop interval at level 1 |
//! | `SOFT_DROP_BASE` | 1.15 | Soft drop interval is `0.068 / 1.15^(level-1)` |
//! | `LOCK_RESET_CAP` | 5 | Lock delay resets allowed per piece |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Coord, Orientation, PieceKind, FIELD_HEIGHT, FIELD_WIDTH};
//!
//! let kind = PieceKind::from_str("t").unwrap();
//! assert_eq!(kind, PieceKind::T);
//!
//! assert_eq!(Orientation::Up.rotate_cw(), Orientation::Right);
//!
//! let p = Coord::new(4, 19) + Coord::new(0, -1);
//! assert_eq!(p, Coord::new(4, 18));
//!
//! assert_eq!(FIELD_WIDTH, 12);
//! assert_eq!(FIELD_HEIGHT, 24);
//! ```

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Field width in cells, including the left and right border columns.
pub const FIELD_WIDTH: i32 = 12;

/// Field height in cells, including the top and bottom border rows.
pub const FIELD_HEIGHT: i32 = 24;

/// Hidden rows between the visible field and the top border.
pub const SPAWN_MARGIN: i32 = 2;

/// Rows a player can see (field height minus borders and the spawn margin).
pub const VISIBLE_ROWS: i32 = FIELD_HEIGHT - 2 - SPAWN_MARGIN;

/// Number of upcoming pieces kept in the lookahead queue.
pub const QUEUE_LENGTH: usize = 3;

/// Kick candidates tried per rotation.
pub const KICK_TESTS: usize = 5;

/// Points per cleared line count at level 1 (0, single, double, triple, tetris).
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Goal reduction per cleared line count.
pub const GOAL_REDUCTIONS: [i32; 5] = [0, 1, 3, 5, 8];

/// Goal reduction for a back-to-back tetris.
pub const BACK_TO_BACK_GOAL_REDUCTION: i32 = 12;

/// Score multiplier for a back-to-back tetris.
pub const BACK_TO_BACK_MULTIPLIER: f64 = 1.5;

/// Lines of goal per level (`goal = level * GOAL_PER_LEVEL`).
pub const GOAL_PER_LEVEL: i32 = 5;

/// Gravity growth per level.
pub const GRAVITY_BASE: f64 = 1.3;

/// Soft drop interval at level 1, in seconds.
pub const SOFT_DROP_INTERVAL: f64 = 0.068;

/// Soft drop speed-up per level.
pub const SOFT_DROP_BASE: f64 = 1.15;

/// Delayed auto-shift threshold, in seconds.
pub const DEFAULT_AUTO_SHIFT_DELAY: f64 = 0.266_666_6;

/// Auto-repeat interval once DAS has elapsed, in seconds.
pub const DEFAULT_AUTO_REPEAT_INTERVAL: f64 = 0.038_888_8;

/// Maximum lock delay resets per piece.
pub const LOCK_RESET_CAP: u8 = 5;

/// Score per row of soft drop.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Score per row of hard drop.
pub const HARD_DROP_POINTS: u32 = 2;


/// Integer 2D vector used for field positions and offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ZERO: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Coord {
    fn sub_assign(&mut self, rhs: Coord) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord::new(-self.x, -self.y)
    }
}

/// The seven tetromino piece kinds
///
/// - **I**: Cyan, 4-long bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in bag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position in [`PieceKind::ALL`]; used to index per-kind tables.
    pub const fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::S => 3,
            PieceKind::Z => 4,
            PieceKind::J => 5,
            PieceKind::L => 6,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("ghost"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter, as shown in next/hold previews.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Orientation of a piece relative to its spawn state.
///
/// The cycle goes Up → Right → Down → Left → Up when rotating clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    /// Row of this orientation in a kick-offset table.
    pub const fn index(self) -> usize {
        match self {
            Orientation::Up => 0,
            Orientation::Right => 1,
            Orientation::Down => 2,
            Orientation::Left => 3,
        }
    }

    pub fn rotate_cw(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    pub fn rotate_ccw(self) -> Self {
        Self::ALL[(self.index() + 3) % 4]
    }
}

/// What a cell shows. Only [`Cell::occupied`] takes part in collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellTag {
    #[default]
    Empty,
    /// Landing preview skin.
    Ghost,
    Piece(PieceKind),
}

impl From<PieceKind> for CellTag {
    fn from(kind: PieceKind) -> Self {
        CellTag::Piece(kind)
    }
}

impl CellTag {
    pub fn piece(self) -> Option<PieceKind> {
        match self {
            CellTag::Piece(kind) => Some(kind),
            _ => None,
        }
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub occupied: bool,
    pub tag: CellTag,
}

impl Cell {
    /// Returned for every out-of-bounds read.
    pub const EMPTY: Cell = Cell {
        occupied: false,
        tag: CellTag::Empty,
    };

    pub const fn new(occupied: bool, tag: CellTag) -> Self {
        Self { occupied, tag }
    }
}

/// Discrete commands accepted by the session.
///
/// Movement and soft drop carry a pressed flag: `true` on key-down,
/// `false` on key-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft(bool),
    MoveRight(bool),
    SoftDrop(bool),
    /// Rotate counter-clockwise
    RotateLeft,
    /// Rotate clockwise
    RotateRight,
    HardDrop,
    Hold,
    /// Toggle pause
    Pause,
    Unpause,
    Restart,
}

impl Command {
    /// camelCase name, used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft(true) => "moveLeft",
            Command::MoveLeft(false) => "releaseLeft",
            Command::MoveRight(true) => "moveRight",
            Command::MoveRight(false) => "releaseRight",
            Command::SoftDrop(true) => "softDrop",
            Command::SoftDrop(false) => "releaseSoftDrop",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::HardDrop => "hardDrop",
            Command::Hold => "hold",
            Command::Pause => "pause",
            Command::Unpause => "unpause",
            Command::Restart => "restart",
        }
    }

    /// Whether this is a key-up for a held input.
    pub fn is_release(&self) -> bool {
        matches!(
            self,
            Command::MoveLeft(false) | Command::MoveRight(false) | Command::SoftDrop(false)
        )
    }
}

/// Scoring category of a lock, for audio and particle collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineScore {
    Single,
    Double,
    Triple,
    Tetris,
    BackToBack,
    TSpin,
}

/// Events announced by the session through the notification bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    /// A full row was removed; `row` is the zero-based visible row index.
    RowCleared { row: i32 },
    HardDropped { rows: u32 },
    /// One row of soft drop.
    SoftDropped,
    /// The active piece moved one column.
    Shifted,
    LockedIn { kind: PieceKind },
    LevelUp { level: u32 },
    GameOver { score: u32 },
    Paused(bool),
    Scored(LineScore),
}

/// Payload-free discriminant of [`Notification`], used for filtered subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    RowCleared,
    HardDropped,
    SoftDropped,
    Shifted,
    LockedIn,
    LevelUp,
    GameOver,
    Paused,
    Scored,
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::RowCleared { .. } => NotificationKind::RowCleared,
            Notification::HardDropped { .. } => NotificationKind::HardDropped,
            Notification::SoftDropped => NotificationKind::SoftDropped,
            Notification::Shifted => NotificationKind::Shifted,
            Notification::LockedIn { .. } => NotificationKind::LockedIn,
            Notification::LevelUp { .. } => NotificationKind::LevelUp,
            Notification::GameOver { .. } => NotificationKind::GameOver,
            Notification::Paused(_) => NotificationKind::Paused,
            Notification::Scored(_) => NotificationKind::Scored,
        }
    }
}
