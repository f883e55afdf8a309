// Copyright (c) 2026 rezky_nightky

pub const ROBOT: &str = "\
╔═══════════╗
║  ◕     ◕  ║
║     ∩     ║
║   ◡───◡   ║
╚═══════════╝
   [█████]
   ║     ║
 ╔═╩═══╦═╩═╗
 ║ ▄▄▄ ║ ▄▄▄ ║
 ╚═════╩═════╝";

/// A multi-line ASCII art asset, measured in chars.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Art {
    pub name: String,
    pub lines: Vec<String>,
    pub width: usize,
}

impl Art {
    pub fn new(name: &str, content: &str) -> Self {
        let lines: Vec<String> = content
            .trim_matches('\n')
            .split('\n')
            .map(|l| l.trim_end().to_string())
            .collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        Self {
            name: name.to_string(),
            lines,
            width,
        }
    }

    pub fn robot() -> Self {
        Self::new("Robot Friend", ROBOT)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robot_dimensions() {
        let a = Art::robot();
        assert_eq!(a.height(), 10);
        assert_eq!(a.width, 14);
        assert_eq!(a.lines[0], "╔═══════════╗");
    }

    #[test]
    fn surrounding_newlines_are_dropped() {
        let a = Art::new("x", "\nab\ncde  \n");
        assert_eq!(a.lines, vec!["ab".to_string(), "cde".to_string()]);
        assert_eq!(a.width, 3);
    }
}
