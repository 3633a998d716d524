//! Plain-text project files and PPM export
//!
//! A project file is whitespace separated:
//!
//! ```text
//! <project name>
//! <width> <height>
//! <max value>
//! <layer name> <filter>
//! <r> <g> <b> <a>        (height * width lines, row-major)
//! ...                    (repeated per layer, bottom first)
//! ```
//!
//! Names are single tokens. Pixels are written from the unfiltered grid; the
//! filter is recorded and reapplied on the next refresh.

use crate::error::CollageError;
use crate::filter::Filter;
use crate::layer::Layer;
use crate::pixel::Pixel;
use crate::project::Project;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;
use thiserror::Error;

/// Error reading or writing a project file
#[derive(Debug, Error)]
pub enum ProjectFileError {
    #[error("Failed to access project file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected end of project file, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("Invalid {expected} '{token}' in project file")]
    InvalidNumber { token: String, expected: &'static str },
    #[error(transparent)]
    Collage(#[from] CollageError),
}

/// Serialize a project, including every layer's unfiltered grid and filter.
///
/// Channels are written at the project's depth so the file always parses.
pub fn write_project(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", project.name());
    let _ = writeln!(out, "{} {}", project.width(), project.height());
    let _ = writeln!(out, "{}", project.max_value());
    for layer in project.layers() {
        let _ = writeln!(out, "{} {}", layer.name(), layer.filter());
        for pixel in layer.original_rows().flatten() {
            let (r, g, b, a) = pixel.to_rgb().rescaled(project.max_value()).rgba();
            let _ = writeln!(out, "{} {} {} {}", r, g, b, a);
        }
    }
    out
}

/// Parse a project previously produced by [`write_project`].
pub fn parse_project(input: &str) -> Result<Project, ProjectFileError> {
    let mut tokens = Tokens { inner: input.split_whitespace() };

    let name = tokens.word("project name")?;
    let width = tokens.number::<usize>("project width")?;
    let height = tokens.number::<usize>("project height")?;
    let max_value = tokens.number::<u16>("max value")?;

    let mut layers = Vec::new();
    while let Some(layer_name) = tokens.inner.next() {
        let filter: Filter = tokens.word("layer filter")?.parse()?;
        let mut grid = Vec::with_capacity(height);
        for _ in 0..height {
            let mut row = Vec::with_capacity(width);
            for _ in 0..width {
                let r = tokens.number::<u16>("red channel")?;
                let g = tokens.number::<u16>("green channel")?;
                let b = tokens.number::<u16>("blue channel")?;
                let a = tokens.number::<u16>("alpha channel")?;
                row.push(Pixel::rgb_with_max(r, g, b, a, max_value)?);
            }
            grid.push(row);
        }
        layers.push(Layer::with_filter(layer_name, grid, filter, height, width)?);
    }

    Ok(Project::from_layers(name, height, width, max_value, layers)?)
}

/// Write a project file to disk.
pub fn save_project(project: &Project, path: &Path) -> Result<(), ProjectFileError> {
    fs::write(path, write_project(project))?;
    Ok(())
}

/// Read and parse a project file from disk.
pub fn load_project(path: &Path) -> Result<Project, ProjectFileError> {
    let contents = fs::read_to_string(path)?;
    parse_project(&contents)
}

/// Render a layer's display grid as an ASCII PPM (P3). Alpha is dropped.
///
/// The header depth is the deepest RGB depth in the grid; shallower pixels
/// are rescaled to it.
pub fn layer_to_ppm(layer: &Layer) -> String {
    let max_value = layer.rows().flatten().map(|pixel| pixel.to_rgb().max_value()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "P3");
    let _ = writeln!(out, "# {}.ppm", layer.name());
    let _ = writeln!(out, "{} {}", layer.width(), layer.height());
    let _ = writeln!(out, "{}", max_value);
    for row in layer.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|pixel| {
                let (r, g, b, _) = pixel.to_rgb().rescaled(max_value).rgba();
                format!("{} {} {}", r, g, b)
            })
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }
    out
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn word(&mut self, expected: &'static str) -> Result<&'a str, ProjectFileError> {
        self.inner.next().ok_or(ProjectFileError::UnexpectedEof { expected })
    }

    fn number<T: std::str::FromStr>(&mut self, expected: &'static str) -> Result<T, ProjectFileError> {
        let token = self.word(expected)?;
        token.parse().map_err(|_| ProjectFileError::InvalidNumber { token: token.to_string(), expected })
    }
}
