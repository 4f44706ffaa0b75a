use std::{env, process};

use tutor_core::{
    cli::{self, output, CliError},
    init,
};

fn main() {
    init();

    if let Err(err) = cli::run_cli(env::args().skip(1)) {
        output::error(&err);
        let code = match err {
            CliError::Usage(_) => 2,
            _ => 1,
        };
        process::exit(code);
    }
}
