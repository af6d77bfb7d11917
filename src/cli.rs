use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vsixfeed")]
#[command(version)]
#[command(about = "Generates the atom.xml feed for a Visual Studio extension gallery", long_about = None)]
#[command(after_help = "Examples:\n  \
  vsixfeed                       generate atom.xml for the current directory\n  \
  vsixfeed /srv/gallery          generate atom.xml for the given gallery root")]
pub struct Cli {
    /// Path to the root of the extension gallery (default: current directory)
    #[arg(value_name = "GALLERY_ROOT")]
    pub root: Option<PathBuf>,
}

/// Legacy help aliases, checked only as the first raw argument.
pub fn is_help_flag(arg: &str) -> bool {
    matches!(arg, "/?" | "--help" | "--h")
}

/// Usage text printed for the help aliases.
pub fn print_usage() {
    println!("Usage: vsixfeed [GALLERY_ROOT]");
    println!("[GALLERY_ROOT] => The path to the root of the extension gallery.");
    println!("\t\tIf it is not specified, the current working directory");
    println!("\t\twill be used instead.");
}
