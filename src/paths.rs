// Path resolution: command-line paths become absolute, and with no
// arguments the interactive picker supplies them.

use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::error::AppError;
use crate::platform::picker::Picker;

/// Turn command-line paths into absolute paths, or ask `picker` when there
/// are none. Order is preserved.
pub fn resolve_paths(
    args: &[PathBuf],
    cwd: &Path,
    picker: &dyn Picker,
    start_dir: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    if !args.is_empty() {
        return Ok(args.iter().map(|p| absolutize(p, cwd)).collect());
    }

    info!(start_dir = %start_dir.display(), "opening file selection dialog");
    let selected = picker.pick(start_dir).map_err(AppError::Picker)?;
    let selected: Vec<PathBuf> = selected
        .into_iter()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| absolutize(&p, cwd))
        .collect();

    if selected.is_empty() {
        return Err(AppError::NoSelection);
    }
    Ok(selected)
}

/// Join a relative path onto `cwd` and fold `.` and `..` lexically.
/// Absolute paths are returned unchanged.
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    let mut out = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    struct FixedPicker {
        paths: Vec<PathBuf>,
        calls: Cell<usize>,
    }

    impl FixedPicker {
        fn new(paths: &[&str]) -> Self {
            Self {
                paths: paths.iter().map(PathBuf::from).collect(),
                calls: Cell::new(0),
            }
        }
    }

    impl Picker for FixedPicker {
        fn pick(&self, _start_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.paths.clone())
        }
    }

    struct BrokenPicker;

    impl Picker for BrokenPicker {
        fn pick(&self, _start_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
            anyhow::bail!("display not available")
        }
    }

    #[test]
    fn test_relative_paths_resolved_against_cwd() {
        let picker = FixedPicker::new(&[]);
        let args = vec![PathBuf::from("a.png"), PathBuf::from("/abs/b.png")];
        let resolved = resolve_paths(&args, Path::new("/work"), &picker, Path::new("/pics")).unwrap();
        assert_eq!(resolved, vec![PathBuf::from("/work/a.png"), PathBuf::from("/abs/b.png")]);
        assert_eq!(picker.calls.get(), 0);
    }

    #[test]
    fn test_absolute_path_is_unchanged() {
        let once = absolutize(Path::new("/abs/b.png"), Path::new("/work"));
        assert_eq!(once, PathBuf::from("/abs/b.png"));
        assert_eq!(absolutize(&once, Path::new("/elsewhere")), once);
    }

    #[test]
    fn test_dot_components_are_folded() {
        assert_eq!(
            absolutize(Path::new("./shots/../a.png"), Path::new("/work/sub")),
            PathBuf::from("/work/sub/a.png")
        );
        assert_eq!(
            absolutize(Path::new("../a.png"), Path::new("/work/sub")),
            PathBuf::from("/work/a.png")
        );
    }

    #[test]
    fn test_empty_args_use_picker() {
        let picker = FixedPicker::new(&["/pics/one.png", "/pics/two.jpg"]);
        let resolved = resolve_paths(&[], Path::new("/work"), &picker, Path::new("/pics")).unwrap();
        assert_eq!(resolved, vec![PathBuf::from("/pics/one.png"), PathBuf::from("/pics/two.jpg")]);
        assert_eq!(picker.calls.get(), 1);
    }

    #[test]
    fn test_empty_selection_is_no_selection_error() {
        let picker = FixedPicker::new(&[]);
        let err = resolve_paths(&[], Path::new("/work"), &picker, Path::new("/pics")).unwrap_err();
        assert!(matches!(err, AppError::NoSelection));
    }

    #[test]
    fn test_picker_failure_is_fatal() {
        let err = resolve_paths(&[], Path::new("/work"), &BrokenPicker, Path::new("/pics")).unwrap_err();
        assert!(matches!(err, AppError::Picker(_)));
        assert!(err.to_string().contains("display not available"));
    }
}
