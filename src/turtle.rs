//! Turtle graphics interpretation of the expanded L-system string.
//!
//! The turtle starts at the origin facing up (`+y`), angles are in degrees and
//! grow counter-clockwise. Every drawing move produces a [`Segment`] in
//! drawing-space coordinates.
use crate::{Error, Point, Scalar, Transform};
use std::fmt;

/// Default bound on the `[` nesting depth
pub const DEFAULT_MAX_STACK_DEPTH: usize = 1 << 16;

/// Straight line segment produced by a drawing move
#[derive(Clone, Copy, PartialEq)]
pub struct Segment(pub [Point; 2]);

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Segment([p0, p1]) = self;
        write!(f, "Segment {:?} {:?}", p0, p1)
    }
}

impl Segment {
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Self {
        Self([p0.into(), p1.into()])
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.0[0]
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.0[1]
    }

    #[inline]
    pub fn points(&self) -> [Point; 2] {
        self.0
    }

    pub fn length(&self) -> Scalar {
        self.start().dist(self.end())
    }

    /// Apply affine transformation to both ends of the segment
    pub fn transform(&self, tr: Transform) -> Self {
        let Segment([p0, p1]) = self;
        Self([tr.apply(*p0), tr.apply(*p1)])
    }
}

/// Position and heading (in degrees) of the turtle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleState {
    pub position: Point,
    pub heading: Scalar,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            position: Point::new(0.0, 0.0),
            heading: 0.0,
        }
    }
}

impl TurtleState {
    /// Unit vector the turtle is facing
    pub fn direction(&self) -> Point {
        Point::from_heading(self.heading)
    }

    /// State after moving `step` forward
    pub fn forward(&self, step: Scalar) -> Self {
        Self {
            position: self.position + step * self.direction(),
            heading: self.heading,
        }
    }

    /// State after turning counter-clockwise by `angle` degrees
    pub fn turn(&self, angle: Scalar) -> Self {
        Self {
            position: self.position,
            heading: self.heading + angle,
        }
    }
}

/// Set of symbols understood by the turtle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CommandSet {
    /// `F + - [ ]`
    #[default]
    Basic,
    /// [`CommandSet::Basic`] plus `f` (move without drawing) and `|` (turn around)
    Extended,
}

/// Operations performed by the turtle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurtleCmd {
    /// Move forward drawing a segment (`F`).
    Forward,
    /// Move forward without drawing (`f`).
    Move,
    /// Turn counter-clockwise (`+`).
    TurnLeft,
    /// Turn clockwise (`-`).
    TurnRight,
    /// Turn 180 degrees (`|`).
    TurnAround,
    /// Save turtle state onto the stack (`[`).
    Push,
    /// Restore the most recently pushed state (`]`).
    Pop,
    /// Symbol has no meaning for the turtle.
    Ignore,
}

impl TurtleCmd {
    pub fn from_symbol(symbol: char, commands: CommandSet) -> Self {
        use TurtleCmd::*;
        match (symbol, commands) {
            ('F', _) => Forward,
            ('+', _) => TurnLeft,
            ('-', _) => TurnRight,
            ('[', _) => Push,
            (']', _) => Pop,
            ('f', CommandSet::Extended) => Move,
            ('|', CommandSet::Extended) => TurnAround,
            _ => Ignore,
        }
    }
}

/// Turtle interpreter configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Turtle {
    angle: Scalar,
    step: Scalar,
    commands: CommandSet,
    max_stack_depth: usize,
}

impl Turtle {
    /// Create turtle turning by `angle` degrees and moving by `step`
    pub fn new(angle: Scalar, step: Scalar) -> Result<Self, Error> {
        if !angle.is_finite() {
            return Err(Error::InvalidParameter {
                name: "angle",
                value: angle,
            });
        }
        if !step.is_finite() {
            return Err(Error::InvalidParameter {
                name: "step",
                value: step,
            });
        }
        Ok(Self {
            angle,
            step,
            commands: CommandSet::default(),
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        })
    }

    pub fn with_commands(self, commands: CommandSet) -> Self {
        Self { commands, ..self }
    }

    pub fn with_max_stack_depth(self, max_stack_depth: usize) -> Self {
        Self {
            max_stack_depth,
            ..self
        }
    }

    pub fn angle(&self) -> Scalar {
        self.angle
    }

    pub fn step(&self) -> Scalar {
        self.step
    }

    pub fn commands(&self) -> CommandSet {
        self.commands
    }

    /// Walk `lstring` and collect all drawn segments in the drawing order
    ///
    /// Unknown symbols are ignored. `]` with an empty stack and `[` nested deeper
    /// than the configured bound are errors, no segments are returned in that case.
    pub fn interpret(&self, lstring: &str) -> Result<Vec<Segment>, Error> {
        let mut segments = Vec::new();
        let mut state = TurtleState::default();
        let mut stack: Vec<TurtleState> = Vec::new();

        for (offset, symbol) in lstring.chars().enumerate() {
            match TurtleCmd::from_symbol(symbol, self.commands) {
                TurtleCmd::Forward => {
                    let next = state.forward(self.step);
                    segments.push(Segment([state.position, next.position]));
                    state = next;
                }
                TurtleCmd::Move => state = state.forward(self.step),
                TurtleCmd::TurnLeft => state = state.turn(self.angle),
                TurtleCmd::TurnRight => state = state.turn(-self.angle),
                TurtleCmd::TurnAround => state = state.turn(180.0),
                TurtleCmd::Push => {
                    if stack.len() >= self.max_stack_depth {
                        return Err(Error::StackOverflow {
                            offset,
                            depth: self.max_stack_depth,
                        });
                    }
                    stack.push(state);
                }
                TurtleCmd::Pop => {
                    state = stack.pop().ok_or(Error::UnmatchedPop { offset })?;
                }
                TurtleCmd::Ignore => {}
            }
        }

        Ok(segments)
    }
}

/// Interpret `lstring` with the basic command set, see [`Turtle::interpret`]
pub fn interpret(lstring: &str, angle: Scalar, step: Scalar) -> Result<Vec<Segment>, Error> {
    Turtle::new(angle, step)?.interpret(lstring)
}
