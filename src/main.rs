#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    flow_showroom::flow::init_logging();
    let config = flow_showroom::config::ViewerConfig::load()?;
    flow_showroom::flow::run(config)
}

// The web build starts from the library's wasm entry point.
#[cfg(target_arch = "wasm32")]
fn main() {}
