use std::path::{Path, PathBuf};

use xshell::{cmd, Shell};

#[test]
fn test_formatting() {
    let sh = Shell::new().unwrap();
    cmd!(sh, "cargo fmt -- --check").run().unwrap()
}

#[test]
fn test_whitespace() {
    let sh = Shell::new().unwrap();
    let root = project_root();
    for path in rust_files(&sh, &root) {
        let text = sh.read_file(&path).unwrap();
        for (i, line) in text.lines().enumerate() {
            if line.ends_with(' ') || line.ends_with('\t') {
                panic!("trailing whitespace at {}:{}", path.display(), i + 1)
            }
        }
        if !text.ends_with('\n') {
            panic!("missing trailing newline in {}", path.display())
        }
    }
}

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap().to_path_buf()
}

fn rust_files(sh: &Shell, root: &Path) -> Vec<PathBuf> {
    let mut res = Vec::new();
    for dir in ["src", "tests", "demos", "xtask/src"] {
        let files = sh.read_dir(root.join(dir)).unwrap_or_default();
        let mut stack = files;
        while let Some(path) = stack.pop() {
            if path.is_dir() {
                stack.extend(sh.read_dir(&path).unwrap());
            } else if path.extension().map_or(false, |it| it == "rs") {
                res.push(path);
            }
        }
    }
    res
}
