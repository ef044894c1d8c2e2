//! Direction-relative chain code walk.
//!
//! Absolute directions are numbered clockwise from "right":
//!
//! ```text
//! 5 6 7
//! 4 . 0
//! 3 2 1
//! ```
//!
//! The walk starts heading down (direction 2). Each unit move is written
//! relative to the current heading: `0` straight, `1`/`2` turn 45 degrees
//! clockwise/counter-clockwise, `3`/`4` turn 90 degrees clockwise/
//! counter-clockwise. `5` reverses the heading without moving. `6` and `7`
//! stand for 3 and 15 straight moves respectively.

use crate::error::VcdError;

/// Unit displacement for each absolute direction.
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const INITIAL_DIRECTION: u8 = 2;

pub const STRAIGHT: u8 = 0;
pub const REVERSE: u8 = 5;
pub const LOW_RUN: u8 = 6;
pub const HIGH_RUN: u8 = 7;
pub const LOW_RUN_LENGTH: usize = 3;
pub const HIGH_RUN_LENGTH: usize = 15;

/// Upper bound on the unit moves a single polygon may encode to.
pub const MAX_PATH_STEPS: u64 = 1 << 24;

fn step(coordinate: i64, unit: i64, steps: i64) -> Option<i64> {
    unit.checked_mul(steps).and_then(|d| coordinate.checked_add(d))
}

fn direction_of(dx: i64, dy: i64) -> u8 {
    match (dx.signum(), dy.signum()) {
        (1, 0) => 0,
        (1, 1) => 1,
        (0, 1) => 2,
        (-1, 1) => 3,
        (-1, 0) => 4,
        (-1, -1) => 5,
        (0, -1) => 6,
        _ => 7,
    }
}

struct Encoder {
    heading: u8,
    symbols: Vec<u8>,
}

impl Encoder {
    fn push_moves(&mut self, direction: u8, count: i64) {
        for _ in 0..count {
            let mut delta = (8 + direction - self.heading) % 8;
            if matches!(delta, 3..=5) {
                self.symbols.push(REVERSE);
                self.heading = (self.heading + 4) % 8;
                delta = (8 + direction - self.heading) % 8;
            }
            let symbol = match delta {
                0 => STRAIGHT,
                1 => 1,
                7 => 2,
                2 => 3,
                _ => 4,
            };
            self.symbols.push(symbol);
            self.heading = direction;
        }
    }
}

/// Converts a flat `[x0, y0, x1, y1, ...]` list into relative move symbols
/// (before run compression).
///
/// A displacement that is not along one of the 8 directions is walked as
/// diagonal moves followed by axis moves.
pub fn moves_from_points(points: &[i64]) -> Result<Vec<u8>, VcdError> {
    if points.is_empty() || points.len() % 2 != 0 {
        return Err(VcdError::ChainCode(format!(
            "expected a non-empty list of x, y pairs, got {} value(s)",
            points.len()
        )));
    }

    let mut encoder = Encoder {
        heading: INITIAL_DIRECTION,
        symbols: Vec::with_capacity(points.len()),
    };

    let mut total: u64 = 0;
    for pair in points.chunks_exact(2).collect::<Vec<_>>().windows(2) {
        let displacement = |to: i64, from: i64| {
            to.checked_sub(from)
                .and_then(|d| d.checked_abs().map(|magnitude| (d, magnitude)))
        };
        let (Some((dx, adx)), Some((dy, ady))) = (
            displacement(pair[1][0], pair[0][0]),
            displacement(pair[1][1], pair[0][1]),
        ) else {
            return Err(VcdError::ChainCode(format!(
                "displacement from ({}, {}) to ({}, {}) does not fit in a 64-bit integer",
                pair[0][0], pair[0][1], pair[1][0], pair[1][1]
            )));
        };

        // One symbol per unit step, so the longer axis is the step count.
        total = total.saturating_add(adx.max(ady) as u64);
        if total > MAX_PATH_STEPS {
            return Err(VcdError::ChainCode(format!(
                "polygon path exceeds {} unit steps",
                MAX_PATH_STEPS
            )));
        }

        let diagonal = adx.min(ady);
        let axis = adx.max(ady) - diagonal;
        if diagonal > 0 {
            encoder.push_moves(direction_of(dx, dy), diagonal);
        }
        if axis > 0 {
            let direction = if adx > ady {
                direction_of(dx, 0)
            } else {
                direction_of(0, dy)
            };
            encoder.push_moves(direction, axis);
        }
    }

    Ok(encoder.symbols)
}

/// Replaces every run of straight moves with as many high-run symbols as
/// fit, then low-run symbols, then literal straight symbols.
pub fn compress_runs(moves: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(moves.len());
    let mut run = 0usize;

    let flush = |run: usize, out: &mut Vec<u8>| {
        out.extend(std::iter::repeat(HIGH_RUN).take(run / HIGH_RUN_LENGTH));
        out.extend(std::iter::repeat(LOW_RUN).take(run % HIGH_RUN_LENGTH / LOW_RUN_LENGTH));
        out.extend(std::iter::repeat(STRAIGHT).take(run % HIGH_RUN_LENGTH % LOW_RUN_LENGTH));
    };

    for &symbol in moves {
        if symbol == STRAIGHT {
            run += 1;
        } else {
            flush(run, &mut out);
            run = 0;
            out.push(symbol);
        }
    }
    flush(run, &mut out);
    out
}

/// Walks a symbol stream from `(xinit, yinit)` and returns the polygon
/// vertices: the start, every point where the heading of movement changes,
/// and the end.
pub fn points_from_symbols(xinit: i64, yinit: i64, symbols: &[u8]) -> Result<Vec<i64>, VcdError> {
    let mut heading = INITIAL_DIRECTION;
    let mut position = (xinit, yinit);
    let mut last_move: Option<u8> = None;
    let mut out = vec![xinit, yinit];

    for (i, &symbol) in symbols.iter().enumerate() {
        let (direction, steps) = match symbol {
            STRAIGHT => (heading, 1),
            1 => ((heading + 1) % 8, 1),
            2 => ((heading + 7) % 8, 1),
            3 => ((heading + 2) % 8, 1),
            4 => ((heading + 6) % 8, 1),
            REVERSE => {
                heading = (heading + 4) % 8;
                continue;
            }
            LOW_RUN => (heading, LOW_RUN_LENGTH as i64),
            HIGH_RUN => (heading, HIGH_RUN_LENGTH as i64),
            other => {
                return Err(VcdError::ChainCode(format!(
                    "symbol {} at position {} is outside the chain code alphabet",
                    other, i
                )))
            }
        };

        if last_move.is_some_and(|last| last != direction) {
            out.push(position.0);
            out.push(position.1);
        }
        let (ux, uy) = DIRECTIONS[direction as usize];
        position = match (step(position.0, ux, steps), step(position.1, uy, steps)) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(VcdError::ChainCode(format!(
                    "symbol {} at position {} moves outside the integer coordinate range",
                    symbol, i
                )))
            }
        };
        heading = direction;
        last_move = Some(direction);
    }

    if last_move.is_some() {
        out.push(position.0);
        out.push(position.1);
    }
    Ok(out)
}
