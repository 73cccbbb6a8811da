//! Line commands read from stdin.

use wall::camera::Point;
use wall::tile::TileId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FindStory,
    Intro,
    Goto(TileId),
    Cancel,
    Regenerate,
    Wheel(f64),
    Click(Point),
    Hover(Point),
    Drag { from: Point, to: Point },
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    Arguments { command: &'static str, expected: &'static str },
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();
        let cmd = match head.to_ascii_lowercase().as_str() {
            "find" => Self::FindStory,
            "intro" => Self::Intro,
            "goto" => Self::Goto(single(&args, "goto", "a tile id")?),
            "cancel" => Self::Cancel,
            "regen" | "regenerate" => Self::Regenerate,
            "wheel" => Self::Wheel(single(&args, "wheel", "a delta")?),
            "click" => Self::Click(point(&args, "click")?),
            "hover" => Self::Hover(point(&args, "hover")?),
            "drag" => {
                let err = CommandError::Arguments { command: "drag", expected: "x0 y0 x1 y1" };
                let [x0, y0, x1, y1] = numbers::<4>(&args).ok_or(err)?;
                Self::Drag { from: Point::new(x0, y0), to: Point::new(x1, y1) }
            }
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };
        Ok(Some(cmd))
    }
}

fn single<T: std::str::FromStr>(args: &[&str], command: &'static str, expected: &'static str) -> Result<T, CommandError> {
    match args {
        [one] => one.parse().map_err(|_| CommandError::Arguments { command, expected }),
        _ => Err(CommandError::Arguments { command, expected }),
    }
}

fn point(args: &[&str], command: &'static str) -> Result<Point, CommandError> {
    let [x, y] = numbers::<2>(args).ok_or(CommandError::Arguments { command, expected: "x y" })?;
    Ok(Point::new(x, y))
}

fn numbers<const N: usize>(args: &[&str]) -> Option<[f64; N]> {
    if args.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, raw) in out.iter_mut().zip(args) {
        *slot = raw.parse().ok().filter(|v: &f64| v.is_finite())?;
    }
    Some(out)
}

#[cfg(test)]
#[path = "command_test.rs"]
mod tests;
