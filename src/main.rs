use voter_ledger::{cli, ui::output};

fn main() {
    if let Err(e) = cli::run() {
        output::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
