use clap::Parser;

// command-line arguments are defined here

/// gscp - copy objects from a storage bucket to a local path
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The source bucket url, e.g. gs://bucket/prefix
    pub src_url: String,
    /// The local directory to copy objects into
    pub dst_url: String,
    /// Copy objects recursively under the given prefix
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,
    /// The number of parallel download workers
    #[arg(short = 'm', long = "parallel", default_value_t = 1)]
    pub parallel: usize,
    /// Emit per-object diagnostic logging
    #[arg(long)]
    pub debug: bool,
    /// Override the provider region
    #[arg(long)]
    pub region: Option<String>,
    /// Override the provider endpoint (for S3-compatible stores)
    #[arg(long)]
    pub endpoint: Option<String>,
}
