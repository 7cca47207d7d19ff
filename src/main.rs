use chessnote::tui;

fn main() {
    env_logger::init();
    if let Err(e) = tui::run() {
        eprintln!("terminal error: {e}");
    }
}
