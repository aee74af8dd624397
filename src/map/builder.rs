use super::{Cell, IntensityMap, MapError, MapKind, MapShape};

/// How coincident cells are combined when a map is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// First value wins (presence maps)
    Keep,
    /// Largest value wins (ordinal classes)
    Max,
    /// Values add up (raw intensities)
    Sum,
}

impl MergePolicy {
    fn merge(self, current: f64, incoming: f64) -> f64 {
        match self {
            MergePolicy::Keep => current,
            MergePolicy::Max => current.max(incoming),
            MergePolicy::Sum => current + incoming,
        }
    }
}

impl From<MapKind> for MergePolicy {
    fn from(kind: MapKind) -> Self {
        match kind {
            MapKind::Binary => MergePolicy::Keep,
            MapKind::Classes => MergePolicy::Max,
            MapKind::Intensity => MergePolicy::Sum,
        }
    }
}

/// Collects `(row, col, value)` triples and turns them into an immutable map
#[derive(Debug, Clone)]
pub struct MapBuilder {
    name: String,
    shape: MapShape,
    kind: MapKind,
    merge: MergePolicy,
    cells: Vec<Cell>,
}

impl MapBuilder {
    /// Start an empty builder for a map of the given shape and kind
    pub fn new(shape: MapShape, kind: MapKind) -> Self {
        Self {
            name: String::new(),
            shape,
            kind,
            merge: kind.into(),
            cells: Vec::new(),
        }
    }

    /// Set the map name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the merge policy implied by the map kind
    pub fn with_merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    /// Reserve room for `additional` more cells
    pub fn reserve(&mut self, additional: usize) {
        self.cells.reserve(additional);
    }

    /// Add one cell value; zeros are accepted and dropped at build time
    pub fn push(&mut self, row: usize, col: usize, value: f64) -> Result<(), MapError> {
        if !self.shape.contains(row, col) {
            return Err(MapError::OutOfBounds {
                row,
                col,
                shape: self.shape,
            });
        }
        if !value.is_finite() || value < 0.0 {
            return Err(MapError::InvalidValue { row, col, value });
        }
        self.cells.push(Cell { row, col, value });
        Ok(())
    }

    /// Number of triples pushed so far
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when nothing has been pushed
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sort, merge duplicates and drop zero cells
    pub fn build(self) -> IntensityMap {
        let MapBuilder {
            name,
            shape,
            kind,
            merge,
            mut cells,
        } = self;

        // stable sort so `Keep` retains the first pushed value
        cells.sort_by_key(|c| (c.row, c.col));

        let mut merged: Vec<Cell> = Vec::with_capacity(cells.len());
        for cell in cells {
            match merged.last_mut() {
                Some(last) if last.row == cell.row && last.col == cell.col => {
                    last.value = merge.merge(last.value, cell.value);
                }
                _ => merged.push(cell),
            }
        }
        merged.retain(|c| c.value != 0.0);

        IntensityMap::from_sorted_cells(name, shape, kind, merged)
    }
}
