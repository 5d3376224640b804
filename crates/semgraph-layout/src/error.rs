#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph contains an edge with a missing endpoint: {source_id} -> {target_id}")]
    MissingEndpoint {
        source_id: String,
        target_id: String,
    },
    #[error("duplicate node in layout: {name}")]
    DuplicateNode { name: String },
    #[error("layout names a node that is not in the model: {name}")]
    UnknownNode { name: String },
    #[error("node is missing from the layout: {name}")]
    UnplacedNode { name: String },
    #[error("grid of {cells} cells does not fit {rows} rows")]
    GridShape { cells: usize, rows: usize },
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("unknown layout algorithm: {name}")]
    UnknownAlgorithm { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
