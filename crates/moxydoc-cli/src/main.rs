use std::process;

fn main() {
    match moxydoc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("moxydoc error: {err:#}");
            process::exit(moxydoc_cli::exit_code_for(&err));
        }
    }
}
