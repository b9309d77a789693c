//! Fake analyzer executables for tests that spawn real processes
//!
//! All scripts are written once, before any test in the binary spawns
//! anything: exec'ing a file while another thread still holds it open for
//! writing fails with "text file busy".

#![cfg(unix)]
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const TABLE: &str = "Tipo,Lexema,Linea,Columna\n\
KEYWORD,\"int\",1,1\n\
ID,\"x\",1,5\n\
OP,\"=\",1,7\n\
NUM,\"10\",1,9\n\
PUNCT,\";\",1,11\n";

const SCRIPTS: &[(&str, &str)] = &[
    (
        "table",
        "cat > /dev/null\ncat <<'CSV'\nTipo,Lexema,Linea,Columna\nKEYWORD,\"int\",1,1\nID,\"x\",1,5\nOP,\"=\",1,7\nNUM,\"10\",1,9\nPUNCT,\";\",1,11\nCSV\n",
    ),
    ("echo", "cat\n"),
    (
        "diagnostic",
        "cat > /dev/null\nprintf 'partial output\\n'\nprintf 'unexpected char at 1:4' >&2\nexit 2\n",
    ),
    (
        "benign-exit",
        "cat > /dev/null\nprintf 'Tipo,Lexema,Linea,Columna\\nID,\"x\",1,5\\n'\nexit 1\n",
    ),
    (
        "malformed",
        "cat > /dev/null\nprintf 'Tipo,Lexema,Linea,Columna\\nID,\"x\",one,5\\n'\n",
    ),
    // 1 MiB of diagnostics before the first byte of input is read
    (
        "stderr-flood",
        "head -c 1048576 /dev/zero | tr '\\0' 'e' >&2\ncat\n",
    ),
    (
        "stdout-flood",
        "head -c 1048576 /dev/zero | tr '\\0' 'o'\ncat > /dev/null\n",
    ),
    (
        "refuses-input",
        "printf 'no input accepted' >&2\nexit 3\n",
    ),
    ("hang", "exec sleep 30\n"),
];

fn analyzer_dir() -> &'static Path {
    static DIR: OnceLock<PathBuf> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = Path::new(env!("CARGO_TARGET_TMPDIR"))
            .join("lexbridge-analyzers")
            .join(env!("CARGO_CRATE_NAME"));
        fs::create_dir_all(&dir).unwrap();

        for (name, body) in SCRIPTS {
            let path = dir.join(name);
            fs::write(&path, format!("#!/bin/sh\n{}", body)).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let plain = dir.join("not-executable");
        fs::write(&plain, "#!/bin/sh\ncat\n").unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        dir
    })
}

/// Path of a fake analyzer by name
pub fn analyzer(name: &str) -> PathBuf {
    let path = analyzer_dir().join(name);
    assert!(path.exists(), "no fake analyzer named {name}");
    path
}
