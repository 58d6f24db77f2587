//! Shared fixtures for pipeline tests: a fake `uv`, a fake interpreter whose
//! `-m venv` lays down a venv with a scripted `pip`, and a one-file HTTP
//! server for the source archive.

#![allow(dead_code)]

use awscli_bundle::bundler::{AppSettings, SettingsBuilder, ToolLocation};
use flate2::{Compression, write::GzEncoder};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const VERSION: &str = "2.15.24";

const FAKE_UV: &str = r##"#!/bin/sh
if [ "$1" = "--version" ]; then
  echo "uv 0.4.0 (fake)"
  exit 0
fi
case "$2" in
  find)
    [ -f "@TOOLS@/installed" ] || exit 2
    echo "@TOOLS@/cpython-3.12/bin/python3.12"
    ;;
  install)
    touch "@TOOLS@/installed"
    ;;
  *)
    exit 64
    ;;
esac
"##;

const FAKE_PYTHON: &str = r##"#!/bin/sh
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  set -e
  d="$3"
  mkdir -p "$d/bin" "$d/lib/python3.12/site-packages" "$d/include/python3.12"
  ln -s "$0" "$d/bin/python"
  ln -s python "$d/bin/python3"
  ln -s python "$d/bin/python3.12"
  for f in activate activate.csh activate.fish Activate.ps1; do
    echo "# $f" > "$d/bin/$f"
  done
  cp "@TOOLS@/pip" "$d/bin/pip"
  cp "@TOOLS@/pip" "$d/bin/pip3"
  cp "@TOOLS@/pip" "$d/bin/pip3.12"
  printf 'home = @TOOLS@/cpython-3.12/bin\ncommand = %s -m venv %s\n' "$0" "$d" > "$d/pyvenv.cfg"
  exit 0
fi
echo "fake-python $*"
"##;

const FAKE_PIP_OK: &str = r##"#!/bin/sh
set -e
venv="$(cd "$(dirname "$0")/.." && pwd)"
[ "$1" = "install" ] || exit 64
[ -f pyproject.toml ] || exit 65
site="$venv/lib/python3.12/site-packages"
mkdir -p "$site/awscli/__pycache__" "$site/awscli/tests/unit" "$site/awscli/data"
mkdir -p "$site/awscli-2.15.24.dist-info" "$site/pip-24.0.dist-info" "$site/setuptools-69.0.dist-info"
mkdir -p "$site/pip" "$site/setuptools" "$site/_distutils_hack" "$site/pkg_resources"
cp awscli/__init__.py "$site/awscli/__init__.py"
echo "{}" > "$site/awscli/data/cli.json"
touch "$site/awscli/__pycache__/__init__.cpython-312.pyc" "$site/awscli/tests/unit/test_cli.py"
touch "$site/awscli/crt.h" "$site/awscli-2.15.24.dist-info/RECORD" "$site/pip-24.0.dist-info/RECORD"
touch "$site/pip/__init__.py" "$site/setuptools/__init__.py"
printf '#!%s/bin/python\n# -*- coding: utf-8 -*-\nimport sys\nfrom awscli.clidriver import main\nif __name__ == "__main__":\n    sys.exit(main())\n' "$venv" > "$venv/bin/aws"
printf '#!%s/bin/python\n# -*- coding: utf-8 -*-\nimport sys\nfrom awscli.autocomplete.main import autocomplete\nif __name__ == "__main__":\n    sys.exit(autocomplete())\n' "$venv" > "$venv/bin/aws_completer"
chmod +x "$venv/bin/aws" "$venv/bin/aws_completer"
"##;

const FAKE_PIP_FAIL: &str = "#!/bin/sh\necho 'error: metadata-generation-failed' >&2\nexit 1\n";

/// File name of the shared runtime library for this platform.
pub fn libpython_name() -> &'static str {
    if cfg!(target_os = "macos") {
        "libpython3.12.dylib"
    } else {
        "libpython3.12.so.1.0"
    }
}

fn write_script(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Fake toolchain rooted at a directory.
pub struct FakeTools {
    pub dir: PathBuf,
}

impl FakeTools {
    /// Lays out `uv`, the provisioned interpreter prefix, and a `pip` that
    /// either installs a fake awscli or fails.
    pub fn new(dir: &Path, pip_succeeds: bool) -> Self {
        let tools = dir.to_string_lossy().into_owned();
        write_script(&dir.join("uv"), &FAKE_UV.replace("@TOOLS@", &tools));
        write_script(
            &dir.join("cpython-3.12/bin/python3.12"),
            &FAKE_PYTHON.replace("@TOOLS@", &tools),
        );
        std::fs::create_dir_all(dir.join("cpython-3.12/lib/python3.12")).unwrap();
        std::fs::create_dir_all(dir.join("workspaces")).unwrap();
        std::fs::write(dir.join("cpython-3.12/lib").join(libpython_name()), "shared").unwrap();
        std::fs::write(dir.join("cpython-3.12/lib/libpython3.12.a"), "static").unwrap();
        write_script(
            &dir.join("pip"),
            if pip_succeeds { FAKE_PIP_OK } else { FAKE_PIP_FAIL },
        );
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn uv(&self) -> PathBuf {
        self.dir.join("uv")
    }

    pub fn interpreter(&self) -> PathBuf {
        self.dir.join("cpython-3.12/bin/python3.12")
    }

    /// Parent of the build workspaces, empty whenever no build is running.
    pub fn workspaces(&self) -> PathBuf {
        self.dir.join("workspaces")
    }

    pub fn libpython(&self) -> PathBuf {
        self.dir.join("cpython-3.12/lib").join(libpython_name())
    }
}

/// gzip'd tarball shaped like a GitHub source archive.
pub fn source_archive(version: &str) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let files = [
        ("pyproject.toml", "[project]\nname = \"awscli\"\n".to_string()),
        ("awscli/__init__.py", format!("__version__ = '{version}'\n")),
    ];
    for (path, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder
            .append_data(
                &mut header,
                format!("aws-cli-{version}/{path}"),
                data.as_bytes(),
            )
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Minimal HTTP server answering every request with the same response.
pub struct ArchiveServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl ArchiveServer {
    pub async fn start(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let body = Arc::new(body);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);
                let body = body.clone();
                tokio::spawn(async move {
                    let mut request: Vec<u8> = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let reason = if status == 200 { "OK" } else { "Not Found" };
                    let head = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/gzip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Application settings pointing the download at this server.
    pub fn app(&self) -> AppSettings {
        AppSettings {
            source_url_template: format!("{}/aws/aws-cli/archive/{{version}}.tar.gz", self.base_url),
            ..AppSettings::default()
        }
    }
}

/// Settings for a build against the fake tools and server.
pub fn settings(server: &ArchiveServer, tools: &FakeTools, out: &Path) -> SettingsBuilder {
    SettingsBuilder::new()
        .version(VERSION)
        .output_directory(out)
        .app(server.app())
        .uv_locations(vec![ToolLocation::ExplicitPath(tools.uv())])
        .workspace_parent(tools.workspaces())
}

/// Relative paths of every entry below `root`, sorted.
pub fn file_set(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            e.unwrap()
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Names in `dir`, sorted.
pub fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
