#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the diagram builder; PDF exports run on this runtime
    diagram_builder::run_app()
}

// The web build starts from the library's `start` entry point
#[cfg(target_arch = "wasm32")]
fn main() {}
