#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Graph(#[from] semgraph_core::Error),
    #[error(transparent)]
    Layout(#[from] semgraph_layout::Error),
    #[cfg(feature = "render")]
    #[error(transparent)]
    Render(#[from] semgraph_render::Error),
}

pub type HeadlessResult<T> = std::result::Result<T, HeadlessError>;
