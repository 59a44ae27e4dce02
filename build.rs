use std::env;
use std::path::{Path, PathBuf};

/// Headers ffmpeg-sys-next needs to bind the decoder and scaler.
const REQUIRED_HEADERS: &[&str] = &["libavformat/avformat.h", "libswscale/swscale.h"];

fn main() {
    for variable in ["FFMPEG_DIR", "VCPKG_ROOT", "VCPKGRS_DYNAMIC", "VCPKGRS_TRIPLET"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    if let Some(ffmpeg_dir) = env::var_os("FFMPEG_DIR") {
        check_install(Path::new(&ffmpeg_dir), "FFMPEG_DIR");
        return;
    }

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=Neither FFMPEG_DIR nor VCPKG_ROOT is set. vidsheet needs the FFmpeg development libraries; on Windows install them with `vcpkg install ffmpeg` and set FFMPEG_DIR."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let install = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);
    if !install.exists() {
        println!(
            "cargo:warning=VCPKG_ROOT is set but {} does not exist. Install FFmpeg for the `{triplet}` triplet.",
            install.display(),
        );
        return;
    }

    if check_install(&install, "vcpkg") {
        println!(
            "cargo:warning=Using FFmpeg from {}. Set FFMPEG_DIR to the same path to skip this lookup.",
            install.display(),
        );
    }
    if env::var_os("VCPKGRS_DYNAMIC").is_none() {
        println!("cargo:warning=Set VCPKGRS_DYNAMIC=1 if your vcpkg FFmpeg is a dynamic build.");
    }
}

/// Warn about any missing header under `root/include`. Returns whether all
/// were found.
fn check_install(root: &Path, origin: &str) -> bool {
    let include = root.join("include");
    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|header| !include.join(header).exists())
        .collect();

    for header in &missing {
        println!(
            "cargo:warning={origin} points at {} but {header} is missing from its include directory.",
            root.display(),
        );
    }
    missing.is_empty()
}
