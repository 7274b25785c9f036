use std::path::PathBuf;

use clap::Parser;

/// Import a CryptoPro key container into the Windows registry
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Key container directory holding name.key and the *.key material files
    pub dir: PathBuf,

    /// User SID to import under; defaults to the current user's SID
    pub sid: Option<String>,
}
