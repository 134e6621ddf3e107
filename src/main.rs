use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use rlox_tree::Lox;

const EXIT_USAGE: u8 = 64;

fn main() -> ExitCode {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let print_ast = if let Some(pos) = args.iter().position(|a| a == "--ast") {
        args.remove(pos);
        true
    } else {
        false
    };

    let mut lox = Lox::new().with_ast_printing(print_ast);

    match args.len() {
        0 => lox.run_prompt(),
        1 => lox.run_file(&PathBuf::from(&args[0])),
        _ => {
            eprintln!("Usage: lox [--ast] [path]");
            ExitCode::from(EXIT_USAGE)
        }
    }
}
