mod app;
mod art;
mod audio;
mod config;
mod logging;
mod mpris;
mod runtime;
mod track;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
