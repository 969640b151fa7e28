use std::path::Path;

use anyhow::{Context, Result};
use rust_icon_encoder::{
    image::{ImageEncoder, Rgba},
    pattern::BorderPattern,
    png::{PNGEncoder, PNGInfo},
};

const BORDER_COLOR: Rgba = Rgba::from_hex(0x3b82f6);
const INTERIOR_COLOR: Rgba = Rgba::from_hex(0x0f172a);

/// One square icon written by this tool
struct IconSpec {
    file_name: &'static str,
    size: u32,
    border_thickness: u32,
}

const ICONS: [IconSpec; 2] = [
    IconSpec {
        file_name: "icon-192.png",
        size: 192,
        border_thickness: 10,
    },
    IconSpec {
        file_name: "icon-512.png",
        size: 512,
        border_thickness: 20,
    },
];

fn write_icon(icon: &IconSpec, dir: &Path) -> Result<PNGInfo> {
    let bitmap = BorderPattern {
        thickness: icon.border_thickness,
        border: BORDER_COLOR,
        interior: INTERIOR_COLOR,
    }
    .render(icon.size, icon.size);

    let path = dir.join(icon.file_name);
    PNGEncoder::new(&bitmap).encode_to_file(&path)?;

    let written = std::fs::read(&path)?;
    let info = PNGInfo::from_bytes(&written)?;
    tracing::debug!(
        chunks = ?info.chunk_tags,
        image_data = info.image_data_length,
        "verified {}",
        path.display()
    );
    tracing::info!("Wrote {} ({} bytes)", path.display(), written.len());
    Ok(info)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    for icon in &ICONS {
        write_icon(icon, Path::new("."))
            .with_context(|| format!("Failed to write {}", icon.file_name))?;
    }
    Ok(())
}

#[test]
fn writes_verified_icons() {
    let dir = std::env::temp_dir().join(format!("icon-encoder-app-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    for icon in &ICONS {
        let info = write_icon(icon, &dir).unwrap();
        assert_eq!((info.header.width, info.header.height), (icon.size, icon.size));
        assert_eq!(info.chunk_tags, ["IHDR", "IDAT", "IEND"]);
        assert!(dir.join(icon.file_name).is_file());
    }
    std::fs::remove_dir_all(&dir).unwrap();
}
