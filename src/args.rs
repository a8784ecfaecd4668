use clap::Parser;

/// Copy every tag of a source repository to a destination repository
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// The repository to pull the source images from, e.g. `myorg/myimage`
    pub source: String,
    /// The repository to push the renamed images to, e.g. `registry:5000/myorg/myimage`
    pub destination: String,
    /// Perform the copies. Without this flag the planned copies are only reported
    #[clap(long)]
    pub apply: bool,
    #[clap(long)]
    pub debug: bool,
    #[clap(long)]
    pub trace: bool,
}

impl Args {
    pub fn new() -> Self {
        Self::parse()
    }
}
