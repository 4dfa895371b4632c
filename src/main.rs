use std::{env, process};

use lumen_lang::Lumen;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

fn history_path() -> Option<std::path::PathBuf> {
    home::home_dir().map(|home| home.join(".lumen_history"))
}

fn run_prompt() {
    let mut output = std::io::stdout();
    let mut lumen = Lumen::new(&mut output);

    let mut editor = DefaultEditor::new().expect("readline editor to initialize");
    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                if line.trim() == "exit" || line.trim() == "q" {
                    break;
                }

                let _ = editor.add_history_entry(line.as_str());
                lumen.run_line(line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Readline error: {err}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    match args.len() {
        n if n > 2 => {
            println!("Usage: lumen [script]");
            process::exit(64);
        }
        2 => {
            let mut output = std::io::stdout();
            let mut lumen = Lumen::new(&mut output);
            lumen.run_file(args[1].clone());

            if lumen.had_error() {
                process::exit(lumen_lang::EX_STATIC_ERROR);
            }
            if lumen.had_runtime_error() {
                process::exit(lumen_lang::EX_RUNTIME_ERROR);
            }
        }
        _ => run_prompt(),
    };
}
