use std::process;

fn main() {
    env_logger::init();

    if let Err(err) = regex_template::run() {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
