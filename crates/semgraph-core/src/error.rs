pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("edge {from} -> {to} references unknown node: {name}")]
    UnknownNode {
        name: String,
        from: String,
        to: String,
    },

    #[error("duplicate node name: {name}")]
    DuplicateNode { name: String },

    #[error("no node named {name}")]
    NoSuchNode { name: String },

    #[error("invalid parameter row {row}: {message}")]
    InvalidParameter { row: usize, message: String },

    #[error("unsupported operator: {op}")]
    UnsupportedOperator { op: String },

    #[error("unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },

    #[error("expression error in `{input}`: {message}")]
    Expression { input: String, message: String },

    #[error("parameter table JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
