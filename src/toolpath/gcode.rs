//! G-code output
//!
//! Three preamble lines (absolute positioning, units, feed per minute)
//! followed by one `G0`/`G1` line per command. Numbers are always written in
//! plain fixed-point notation so line-oriented post-processors can read them.

use std::io::{self, Write};

use super::{MotionCommand, Toolpath};
use crate::params::Units;

/// Format a number with `precision` decimals, treating -0 as 0
fn num(n: f64, precision: usize) -> String {
    let n = if n == 0.0 { 0.0 } else { n };
    format!("{n:.precision$}")
}

/// Modal setup emitted before any motion.
pub fn preamble(units: Units) -> [&'static str; 3] {
    let unit_code = match units {
        Units::Inches => "G20",
        Units::Millimeters => "G21",
    };
    ["G90", unit_code, "G94"]
}

/// Render a single command as a G-code line, without line terminator.
pub fn format_command(command: &MotionCommand, precision: usize) -> String {
    match *command {
        MotionCommand::Rapid { x, y } => {
            format!("G0 X{} Y{}", num(x, precision), num(y, precision))
        }
        MotionCommand::Feed { x, y, speed } => format!(
            "G1 X{} Y{} F{}",
            num(x, precision),
            num(y, precision),
            num(speed, precision)
        ),
    }
}

/// Render a whole toolpath.
pub fn emit_gcode(toolpath: &Toolpath, units: Units, precision: usize) -> String {
    preamble(units)
        .iter()
        .map(|line| line.to_string())
        .chain(toolpath.iter().map(|c| format_command(c, precision)))
        .map(|line| line + "\n")
        .collect()
}

/// Stream a toolpath to a writer.
pub fn write_gcode<W: Write>(
    out: &mut W,
    toolpath: &Toolpath,
    units: Units,
    precision: usize,
) -> io::Result<()> {
    for line in preamble(units) {
        writeln!(out, "{line}")?;
    }
    for command in toolpath.iter() {
        writeln!(out, "{}", format_command(command, precision))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Toolpath {
        Toolpath {
            commands: vec![
                MotionCommand::Rapid { x: 0.0, y: 0.0 },
                MotionCommand::Feed {
                    x: 0.16129032258,
                    y: -0.0,
                    speed: 12.857142857,
                },
            ],
        }
    }

    #[test]
    fn test_preamble_units() {
        assert_eq!(preamble(Units::Inches), ["G90", "G20", "G94"]);
        assert_eq!(preamble(Units::Millimeters), ["G90", "G21", "G94"]);
    }

    #[test]
    fn test_format_command() {
        let path = sample();
        assert_eq!(format_command(&path.commands[0], 4), "G0 X0.0000 Y0.0000");
        assert_eq!(
            format_command(&path.commands[1], 3),
            "G1 X0.161 Y0.000 F12.857"
        );
    }

    #[test]
    fn test_large_values_stay_fixed_point() {
        let cmd = MotionCommand::Feed {
            x: 1.0e20,
            y: 1.0e-9,
            speed: 10.0,
        };
        let line = format_command(&cmd, 2);
        assert!(!line.contains('e'), "{line}");
        assert!(line.starts_with("G1 X100000000000000000000.00 Y0.00"));
    }

    #[test]
    fn test_emit_and_write_agree() {
        let path = sample();
        let text = emit_gcode(&path, Units::Inches, 4);
        let mut buf = Vec::new();
        write_gcode(&mut buf, &path, Units::Inches, 4).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), text);
        assert_eq!(
            text,
            "G90\nG20\nG94\nG0 X0.0000 Y0.0000\nG1 X0.1613 Y0.0000 F12.8571\n"
        );
    }
}
