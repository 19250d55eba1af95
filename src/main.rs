#![warn(clippy::all, rust_2018_idioms)]

use eframe_flipbook::FlipbookApp;

fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Flipbook"),
        ..Default::default()
    };

    eframe::run_native(
        "Flipbook",
        options,
        Box::new(|cc| Ok(Box::new(FlipbookApp::new(cc)))),
    )
}
