//! Toolpath generation
//!
//! Walks a quantized grid in serpentine order and produces the feed moves
//! that burn it. Even rows run left to right, odd rows right to left, so the
//! head never makes a long return stroke. Runs of equal shade collapse into a
//! single move, but every row keeps a move at both edges.

mod gcode;

use log::debug;

use crate::error::{BurnError, Result};
use crate::params::{GenerationParameters, validate_shades};
use crate::raster::QuantizedGrid;

pub use gcode::{emit_gcode, format_command, preamble, write_gcode};

/// One motion instruction in plot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionCommand {
    /// Positioning move at the machine's rapid rate.
    Rapid { x: f64, y: f64 },
    /// Burning move at `speed`.
    Feed { x: f64, y: f64, speed: f64 },
}

impl MotionCommand {
    pub fn x(&self) -> f64 {
        match self {
            MotionCommand::Rapid { x, .. } | MotionCommand::Feed { x, .. } => *x,
        }
    }

    pub fn y(&self) -> f64 {
        match self {
            MotionCommand::Rapid { y, .. } | MotionCommand::Feed { y, .. } => *y,
        }
    }

    /// Feed speed, `None` for rapid moves.
    pub fn speed(&self) -> Option<f64> {
        match self {
            MotionCommand::Rapid { .. } => None,
            MotionCommand::Feed { speed, .. } => Some(*speed),
        }
    }

    pub fn is_feed(&self) -> bool {
        matches!(self, MotionCommand::Feed { .. })
    }
}

/// Ordered moves for one plot. Starts with a rapid move to the origin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Toolpath {
    pub commands: Vec<MotionCommand>,
}

impl Toolpath {
    /// Number of burning moves, excluding positioning.
    pub fn feed_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_feed()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionCommand> {
        self.commands.iter()
    }
}

/// Linear map from grid index to plot coordinate along one axis.
#[derive(Debug, Clone, Copy)]
struct Axis {
    origin: f64,
    size: f64,
    last_index: f64,
}

impl Axis {
    fn new(origin: f64, size: f64, cells: u32) -> Self {
        Self {
            origin,
            size,
            last_index: f64::from(cells - 1),
        }
    }

    fn position(&self, index: u32) -> f64 {
        f64::from(index) * self.size / self.last_index + self.origin
    }
}

/// Feed speed for a shade. Shade 0 is `min_speed`, the top shade `max_speed`.
pub fn shade_speed(shade: u8, num_shades: u32, min_speed: f64, max_speed: f64) -> Result<f64> {
    validate_shades(num_shades)?;
    if u32::from(shade) >= num_shades {
        return Err(BurnError::InvalidParameter(format!(
            "shade {shade} out of range for {num_shades} shades"
        )));
    }
    Ok(feed_speed(shade, num_shades, min_speed, max_speed))
}

/// Linear shade to speed map. Callers guarantee `shade < num_shades` and `num_shades >= 2`.
fn feed_speed(shade: u8, num_shades: u32, min_speed: f64, max_speed: f64) -> f64 {
    let top = num_shades - 1;
    if u32::from(shade) == top {
        return max_speed;
    }
    let t = f64::from(shade) / f64::from(top);
    min_speed + t * (max_speed - min_speed)
}

/// Column indices of `row` in visiting order.
fn visit_order(row: u32, columns: u32) -> impl Iterator<Item = u32> {
    let reverse = row % 2 == 1;
    (0..columns).map(move |i| if reverse { columns - 1 - i } else { i })
}

/// Build the toolpath for a quantized grid.
pub fn generate(grid: &QuantizedGrid, params: &GenerationParameters) -> Result<Toolpath> {
    if grid.width < 2 || grid.height < 2 {
        return Err(BurnError::InvalidDimensions {
            width: grid.width,
            height: grid.height,
        });
    }
    grid.validate()?;
    if grid.num_shades != params.num_shades {
        return Err(BurnError::InvalidParameter(format!(
            "grid has {} shades but parameters expect {}",
            grid.num_shades, params.num_shades
        )));
    }

    let x_axis = Axis::new(params.origin_x, params.size_x, grid.width);
    let y_axis = Axis::new(params.origin_y, params.size_y, grid.height);

    let mut commands = vec![MotionCommand::Rapid {
        x: params.origin_x,
        y: params.origin_y,
    }];
    for row in 0..grid.height {
        commands.extend(scan_row(grid, row, &x_axis, y_axis.position(row), params));
    }

    let toolpath = Toolpath { commands };
    debug!(
        "Generated {} feed moves for {} cells",
        toolpath.feed_count(),
        grid.cell_count()
    );
    Ok(toolpath)
}

/// Feed moves for one row.
///
/// A move is emitted at a cell when its shade differs from the previous cell,
/// and always at the first and last cell visited.
fn scan_row(
    grid: &QuantizedGrid,
    row: u32,
    x_axis: &Axis,
    y: f64,
    params: &GenerationParameters,
) -> Vec<MotionCommand> {
    let last = grid.width as usize - 1;

    let (_, moves) = visit_order(row, grid.width).enumerate().fold(
        (None, Vec::new()),
        |(last_shade, mut moves): (Option<u8>, Vec<MotionCommand>), (i, col)| {
            let shade = grid.shade(col, row);
            if i == 0 || i == last || last_shade != Some(shade) {
                moves.push(MotionCommand::Feed {
                    x: x_axis.position(col),
                    y,
                    speed: feed_speed(
                        shade,
                        grid.num_shades,
                        params.min_speed,
                        params.max_speed,
                    ),
                });
            }
            (Some(shade), moves)
        },
    );

    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, height: u32, num_shades: u32, shades: Vec<u8>) -> QuantizedGrid {
        QuantizedGrid {
            width,
            height,
            num_shades,
            shades,
            min_luminance: 0.0,
            max_luminance: 255.0,
        }
    }

    fn params(num_shades: u32) -> GenerationParameters {
        GenerationParameters {
            size_x: 1.0,
            size_y: 1.0,
            columns: 2,
            rows: 2,
            num_shades,
            ..Default::default()
        }
    }

    #[test]
    fn test_shade_speed_endpoints() {
        assert_eq!(shade_speed(0, 8, 10.0, 30.0).unwrap(), 10.0);
        assert_eq!(shade_speed(7, 8, 10.0, 30.0).unwrap(), 30.0);
        assert_eq!(shade_speed(0, 3, 0.1, 0.3).unwrap(), 0.1);
        assert_eq!(shade_speed(2, 3, 0.1, 0.3).unwrap(), 0.3);
    }

    #[test]
    fn test_shade_speed_interior_is_linear_offset() {
        for (shade, n, min, max) in [(1, 3, 10.0, 30.0), (3, 7, 0.1, 0.3), (5, 8, 7.3, 41.9)] {
            let t = f64::from(shade) / f64::from(n - 1);
            let expected = min + t * (max - min);
            assert_eq!(
                shade_speed(shade, n, min, max).unwrap().to_bits(),
                expected.to_bits()
            );
        }
    }

    #[test]
    fn test_shade_speed_rejects_bad_input() {
        assert!(matches!(
            shade_speed(0, 1, 10.0, 30.0),
            Err(BurnError::InvalidParameter(_))
        ));
        assert!(matches!(
            shade_speed(8, 8, 10.0, 30.0),
            Err(BurnError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_visit_order_alternates() {
        assert_eq!(visit_order(0, 4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(visit_order(1, 4).collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(visit_order(2, 4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_axis_maps_ends_to_plot_edges() {
        let axis = Axis::new(2.0, 5.0, 32);
        assert_eq!(axis.position(0), 2.0);
        assert_eq!(axis.position(31), 7.0);
    }

    #[test]
    fn test_interior_run_collapses() {
        let g = grid(5, 2, 2, vec![0, 0, 0, 0, 0, 1, 1, 0, 0, 0]);
        let path = generate(&g, &params(2)).unwrap();

        // Rapid, row 0 edges only, row 1 right edge, change to 1 at col 1, left edge
        assert_eq!(path.commands.len(), 6);
        assert_eq!(path.feed_count(), 5);
        let xs: Vec<f64> = path.iter().skip(1).map(|c| c.x()).collect();
        assert_eq!(xs, vec![0.0, 1.0, 1.0, 0.25, 0.0]);
    }

    #[test]
    fn test_rejects_single_column() {
        let g = grid(1, 3, 2, vec![0, 1, 0]);
        assert!(matches!(
            generate(&g, &params(2)),
            Err(BurnError::InvalidDimensions { width: 1, height: 3 })
        ));
    }

    #[test]
    fn test_rejects_short_shade_buffer() {
        let g = grid(3, 2, 2, vec![0, 1, 0]);
        assert!(matches!(
            generate(&g, &params(2)),
            Err(BurnError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_shade_above_range() {
        let g = grid(2, 2, 2, vec![9, 0, 0, 0]);
        assert!(matches!(
            generate(&g, &params(2)),
            Err(BurnError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_shade_mismatch() {
        let g = grid(2, 2, 4, vec![0, 1, 2, 3]);
        assert!(matches!(
            generate(&g, &params(2)),
            Err(BurnError::InvalidParameter(_))
        ));
    }
}
