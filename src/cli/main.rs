/*!
A simple CLI interface to the library.

# Use

```sh
stoat_cli file.smt2 [file.smt2 ...]
```

Each file is parsed as an SMT-LIB script and executed, in order, against a single shared interpreter.
After each file, accumulated error messages are printed in `(line, col): description` form and cleared.

The exit code is zero on successful execution --- even if formulas are unsatisfiable or the script contains SMT-LIB errors, as these are reported on stdout --- and nonzero only on an I/O failure.
*/

use clap::Parser;

use stoat_smt::smtlib::{Interpreter, MessageSet, Position};

/// An experimental SMT solver for a small subset of SMT-LIB.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Files in the SMT-LIB language.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<std::path::PathBuf>,
}

/// Entrypoint to the CLI.
fn main() {
    env_logger::init();
    let args = Args::parse();

    let messages = MessageSet::default();
    let mut interpreter = Interpreter::new();

    for path in &args.files {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                std::process::exit(1);
            }
        };

        let pos = Position::beginning_of(&path.display().to_string(), &text);
        interpreter.execute(pos, &messages);

        for message in messages.iter() {
            println!("{message}");
        }
        messages.clear();
    }
}
