mod cli;

use std::process::ExitCode;

use clap::Parser as _;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if run(&cli) { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Returns whether compilation succeeded. A `bool` return (rather than
/// `ExitCode` directly) keeps this testable — `ExitCode` has no equality
/// impl to assert against.
fn run(cli: &Cli) -> bool {
    let source = match std::fs::read_to_string(&cli.grammar_file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read {}: {e}", cli.grammar_file.display());
            return false;
        }
    };

    match pegc_core::compile(&source) {
        Ok(generated) => {
            let out = cli.output_path();
            if let Err(e) = std::fs::write(&out, generated) {
                eprintln!("error: could not write {}: {e}", out.display());
                return false;
            }
            true
        }
        Err(pegc_core::Error::CheckFailed(diagnostics)) => {
            let path = cli.grammar_file.to_string_lossy().into_owned();
            let rendered =
                diagnostics.printer(&source).path(&path).colored(cli.use_color()).render();
            eprint!("{rendered}");
            false
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn compiles_a_valid_grammar_file() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("g.peg");
        let mut f = std::fs::File::create(&grammar_path).unwrap();
        writeln!(f, "PEG g(greeting)\ngreeting <- 'hi';\nEND;").unwrap();

        let out_path = dir.path().join("Parser.rs");
        let cli = Cli {
            grammar_file: grammar_path,
            out: Some(out_path.clone()),
            color: cli::ColorMode::Never,
        };

        assert!(run(&cli));
        assert!(out_path.exists());
    }

    #[test]
    fn reports_checker_failures_without_writing_output() {
        let dir = tempfile::tempdir().unwrap();
        let grammar_path = dir.path().join("bad.peg");
        let mut f = std::fs::File::create(&grammar_path).unwrap();
        writeln!(f, "PEG g(r)\nr <- r 'a';\nEND;").unwrap();

        let out_path = dir.path().join("Parser.rs");
        let cli =
            Cli { grammar_file: grammar_path, out: Some(out_path.clone()), color: cli::ColorMode::Never };

        assert!(!run(&cli));
        assert!(!out_path.exists());
    }
}
