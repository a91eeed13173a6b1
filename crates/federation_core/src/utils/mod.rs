pub mod log;
mod parse;
pub use parse::*;
mod patcher;
pub use patcher::*;
mod replace;
pub use replace::*;

use std::path::Path;

use sugar_path::SugarPath;

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Directory part of an output path, `.` for files at the output root.
pub fn dirname(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir,
        _ => ".",
    }
}

pub fn join_file(dir: &str, file_name: &str) -> String {
    if dir.is_empty() || dir == "." {
        file_name.to_string()
    } else {
        format!("{dir}/{file_name}")
    }
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(index) => &file_name[..index],
    }
}

/// File name without directory and without up to two extensions,
/// `assets/Button.a1b2c3.js` gives `Button`.
pub fn logical_name(path: &str) -> &str {
    strip_extension(strip_extension(basename(path)))
}

/// Quotes text as a JavaScript string literal.
pub fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

pub fn is_css(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map_or(false, |ext| ext == "css")
}

pub fn normalize_path(path: &Path) -> String {
    path.normalize().to_slash_lossy().to_string()
}

/// Compares two module paths, ignoring an extension only one side carries.
pub fn is_same_file_path(left: &str, right: &str) -> bool {
    let left = normalize_path(Path::new(left));
    let right = normalize_path(Path::new(right));
    let left_ext = Path::new(&left).extension().map(|ext| ext.to_string_lossy().to_string());
    let right_ext = Path::new(&right).extension().map(|ext| ext.to_string_lossy().to_string());
    match (&left_ext, &right_ext) {
        (Some(l), Some(r)) if l != r => false,
        _ => {
            let trim = |path: &str, ext: &Option<String>| match ext {
                Some(ext) => path[..path.len() - ext.len() - 1].to_string(),
                None => path.to_string(),
            };
            trim(&left, &left_ext) == trim(&right, &right_ext)
        }
    }
}

/// Relative import specifier from one output file to another.
pub fn relative_specifier(from_file: &str, to_file: &str) -> String {
    let from_dir = match dirname(from_file) {
        "." => "/".to_string(),
        dir => format!("/{dir}"),
    };
    let relative = Path::new(&format!("/{to_file}"))
        .relative(from_dir)
        .to_slash_lossy()
        .to_string();
    if relative.starts_with("../") {
        relative
    } else {
        format!("./{relative}")
    }
}

/// Output path a relative specifier written inside `from_file` points at.
pub fn resolve_specifier(from_file: &str, specifier: &str) -> String {
    let from_dir = match dirname(from_file) {
        "." => "/".to_string(),
        dir => format!("/{dir}"),
    };
    let resolved = normalize_path(&Path::new(&from_dir).join(specifier));
    resolved.trim_start_matches('/').to_string()
}
