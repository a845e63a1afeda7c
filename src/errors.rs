use generational_arena::Index;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("stale component handle: {0:?}")]
    StaleHandle(Index),

    #[error("parent {parent:?} is not a composite, cannot hold {child:?}")]
    NotComposite { parent: Index, child: Index },

    #[error("cycle detected: {0:?} would become its own ancestor")]
    CycleDetected(Index),
}

pub type TreeResult<T> = Result<T, TreeError>;
