use crate::tree::CompoundTree;

/// Producer of the compound tree for one run.
///
/// Ingestion is the only step outside the pipeline; its errors are handed
/// back to the caller untouched.
pub trait TreeSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load(&self) -> Result<CompoundTree, Self::Error>;
}

impl TreeSource for CompoundTree {
    type Error = std::convert::Infallible;

    fn load(&self) -> Result<CompoundTree, Self::Error> {
        Ok(self.clone())
    }
}
