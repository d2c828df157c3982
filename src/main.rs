use colored::Colorize;
use std::process;

fn main() {
    robo::ui::install_panic_hook();

    match robo::cli::run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    }
}
