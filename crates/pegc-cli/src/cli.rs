use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

/// Compiles a parsing-expression grammar into a standalone Rust parser.
#[derive(Debug, Parser)]
#[command(name = "pegc", version, about)]
pub struct Cli {
    /// Path to the grammar description to compile.
    pub grammar_file: PathBuf,

    /// Where to write the generated parser. Defaults to `Parser.rs` in the
    /// current directory.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Whether to colorize diagnostic output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.out.clone().unwrap_or_else(|| PathBuf::from("Parser.rs"))
    }

    pub fn use_color(&self) -> bool {
        match self.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}
