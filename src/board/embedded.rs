use rust_embed::RustEmbed;

/// Browser client assets, compiled into the binary from `ui/`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/ui/"]
pub struct Assets;
