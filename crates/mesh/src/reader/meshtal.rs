// crate modules
use crate::error::{Error, Result};
use crate::grid::{ColumnLayout, MeshGrid};
use crate::group::Group;
use crate::reader::{file_lines, mesh_index};
use crate::voxel::Voxel;

// mctools modules
use mctools_scan::{classify, number, Axis, BinKind, ColumnKind, Line};

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, trace, warn};
use std::path::Path;

/// A reader for column-format meshtal files
///
/// Lines are classified one at a time and fed to the mesh currently open. A
/// mesh is closed by the next `Mesh Tally Number` header or the end of the
/// file.
///
/// Minimal Example:
/// ```rust, no_run
/// # use mctools_mesh::reader::MeshtalReader;
/// let mut reader = MeshtalReader::new();
/// let mesh_list = reader.parse("path/to/file.msht").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MeshtalReader {
    /// List of extracted [MeshGrid] tallies
    mesh_list: Vec<MeshGrid>,
    /// Optionally extract only a specific mesh
    target_id: Option<u32>,
    /// Mesh currently being read
    current: Option<MeshBuilder>,
    /// Disable progress bar?
    disable_progress: bool,
}

// ! ------------------------------------------------------------------------
// !                                Public API
// ! ------------------------------------------------------------------------

impl MeshtalReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Only read the mesh with this id
    pub fn set_target_id(&mut self, id: u32) {
        self.target_id = Some(id);
    }

    /// Do not show the progress bar while reading
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Parses all mesh data from a meshtal file
    ///
    /// With a target set, the file is checked for the target id first and
    /// reading stops as soon as the target mesh is complete.
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> Result<Vec<MeshGrid>> {
        let path = path.as_ref();
        info!("Parsing {}", path.display());
        self.mesh_list.clear();
        self.current = None;

        // just make sure the requested id is in the file somewhere
        if let Some(id) = self.target_id {
            if !mesh_index(path)?.contains_key(&id) {
                return Err(Error::MeshNotFound(id));
            }
        }

        let mut progress_bar = self.init_progress_bar()?;
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        for (i, line) in file_lines(path)?.enumerate() {
            progress_bar.update(1)?;
            if self.process(i + 1, &line?)? {
                break;
            }
        }
        self.close_mesh()?;

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        info!("Found {} meshes", self.mesh_list.len());
        Ok(std::mem::take(&mut self.mesh_list))
    }
}

// ! ------------------------------------------------------------------------
// !                           Line processing
// ! ------------------------------------------------------------------------

impl MeshtalReader {
    /// Handle the next line, returning `true` once the target is complete
    fn process(&mut self, line: usize, raw: &str) -> Result<bool> {
        let event = classify(raw);

        if let Line::MeshHeader(id) = event {
            let target_done = self.current.is_some() && self.target_id.is_some();
            self.close_mesh()?;
            if target_done {
                return Ok(true);
            }

            if self.target_id.map_or(true, |target| target == id) {
                self.current = Some(MeshBuilder::new(id));
            }
            return Ok(false);
        }

        if let Some(builder) = &mut self.current {
            builder.push(line, raw, event)?;
        }

        Ok(false)
    }

    fn close_mesh(&mut self) -> Result<()> {
        if let Some(builder) = self.current.take() {
            self.mesh_list.push(builder.finish()?);
        }
        Ok(())
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .unit(" lines")
            .unit_scale(true)
            .disable(self.disable_progress)
            .bar_format("{count} lines [{rate} lines/s]   ")
            .build()
            .map_err(Error::ProgressBarError)
    }
}

/// Accumulates the header and data rows of a single mesh
#[derive(Debug)]
struct MeshBuilder {
    mesh: MeshGrid,
    layout: Option<ColumnLayout>,
    dropped: usize,
}

impl MeshBuilder {
    fn new(id: u32) -> Self {
        debug!("---------------------");
        debug!(" Parsing Mesh {id:<7}");
        debug!("---------------------");
        Self {
            mesh: MeshGrid::new(id),
            layout: None,
            dropped: 0,
        }
    }

    fn push(&mut self, line: usize, raw: &str, event: Line) -> Result<()> {
        match event {
            Line::MeshParticle(particle) => {
                debug!("Particle    = {particle}");
                self.mesh.particle = particle.to_string();
            }
            Line::AxisBounds(axis, bounds) => {
                trace!("{axis:?} bounds = {bounds:?}");
                match axis {
                    Axis::X => self.mesh.set_x_bounds(bounds),
                    Axis::Y => self.mesh.set_y_bounds(bounds),
                    Axis::Z => self.mesh.set_z_bounds(bounds),
                }
            }
            Line::BinBoundaries(kind, labels) => {
                let labels = labels.iter().map(|l| l.to_string()).collect();
                match kind {
                    BinKind::Energy => self.mesh.e_bounds = labels,
                    BinKind::Time => self.mesh.t_bounds = labels,
                }
            }
            Line::ColumnHeader(kind) => self.column_header(raw, kind)?,
            Line::DataRow(tokens) => self.data_row(line, raw, &tokens)?,
            _ => (),
        }
        Ok(())
    }

    fn column_header(&mut self, raw: &str, kind: ColumnKind) -> Result<()> {
        let layout = match kind {
            ColumnKind::Position => ColumnLayout::Position,
            ColumnKind::Energy => ColumnLayout::Energy,
            ColumnKind::Time => ColumnLayout::Time,
            ColumnKind::Unsupported => {
                return Err(Error::UnsupportedColumnLayout {
                    id: self.mesh.id,
                    header: raw.split_whitespace().collect::<Vec<&str>>().join(" "),
                })
            }
        };

        debug!("Layout      = {layout}");
        self.mesh.layout = layout;
        self.layout = Some(layout);
        Ok(())
    }

    fn data_row(&mut self, line: usize, raw: &str, tokens: &[&str]) -> Result<()> {
        // numbers before the column header are not results
        let Some(layout) = self.layout else {
            trace!("Skipped: {}", raw.trim());
            return Ok(());
        };

        let malformed = || Error::MalformedRow {
            id: self.mesh.id,
            line,
            text: raw.trim().to_string(),
        };

        if tokens.len() != layout.columns() {
            return Err(malformed());
        }

        let (group, values) = match layout {
            ColumnLayout::Position => (None, tokens),
            _ => (
                Some(Group::from_label(tokens[0]).ok_or_else(malformed)?),
                &tokens[1..],
            ),
        };

        // time meshes do not keep the total or zero time rows
        if layout == ColumnLayout::Time
            && group.is_some_and(|g| g.is_total() || g == Group::Value(0.0))
        {
            self.dropped += 1;
            return Ok(());
        }

        let values = values
            .iter()
            .map(|v| number(v))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(malformed)?;

        self.mesh.voxels.push(Voxel {
            group,
            x: values[0],
            y: values[1],
            z: values[2],
            result: values[3],
            error: values[4],
        });

        Ok(())
    }

    fn finish(self) -> Result<MeshGrid> {
        let mesh = self.mesh;

        if self.dropped > 0 {
            debug!("Dropped {} total or zero time rows", self.dropped);
        }

        let n = mesh.number_voxels();
        if n > 0 && mesh.voxels.len() % n != 0 {
            warn!(
                "Mesh {} has {} rows, which is not a multiple of {n} voxels",
                mesh.id,
                mesh.voxels.len()
            );
        }

        debug!("Rows        = {}", mesh.voxels.len());
        Ok(mesh)
    }
}
