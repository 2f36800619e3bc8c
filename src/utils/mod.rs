// crop1080/src/utils/mod.rs
use std::path::{Path, PathBuf};

/// Extensions picked up when walking a directory, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff"];

pub fn is_supported_format(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Output path for a single input file.
///
/// An explicit output with an extension is used as-is, one without is
/// treated as a directory. The default is `<input dir>/_out/<file name>`.
pub fn single_file_output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    let file_name = input.file_name().unwrap_or(input.as_os_str());

    match output {
        Some(path) if path.extension().is_some() => path.to_path_buf(),
        Some(dir) => dir.join(file_name),
        None => input
            .parent()
            .unwrap_or(Path::new(""))
            .join("_out")
            .join(file_name),
    }
}

/// Output root for a directory input: the explicit output, or a sibling
/// directory named `<dir name>_out`.
pub fn directory_output_root(input_dir: &Path, output: Option<&Path>) -> PathBuf {
    if let Some(path) = output {
        return path.to_path_buf();
    }

    // `.` and `..` have no name of their own; resolve them so the output
    // lands next to the directory instead of inside it.
    let resolved;
    let input_dir = if input_dir.file_name().is_none() {
        resolved = input_dir
            .canonicalize()
            .unwrap_or_else(|_| input_dir.to_path_buf());
        resolved.as_path()
    } else {
        input_dir
    };

    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "images".to_string());

    input_dir
        .parent()
        .unwrap_or(Path::new(""))
        .join(format!("{}_out", name))
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}
