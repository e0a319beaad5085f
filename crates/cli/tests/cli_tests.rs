//! End-to-end tests for the three srcfetch binaries.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tool(name: &str, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(name).unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG").env_remove("SPACK_BIN");
    cmd
}

#[test]
fn test_wrong_argument_count_exits_1() {
    let temp = TempDir::new().unwrap();

    tool("get-sources", temp.path())
        .args(["hdf5", "whitelist.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    tool("merge-sources", temp.path())
        .arg("only-one.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    tool("merge-sources", temp.path())
        .args(["a.txt", "b.txt", "c.txt"])
        .assert()
        .code(1);

    tool("fetch-sources", temp.path()).assert().code(1);
}

#[test]
fn test_help_exits_0() {
    let temp = TempDir::new().unwrap();
    tool("fetch-sources", temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--target-dir"));
}

#[test]
fn test_merge_first_file_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();
    fs::write(
        path.join("a.txt"),
        "pkg@1.0 -> https://a.example/pkg-1.0.tar.gz\nnot a record\n",
    )
    .unwrap();
    fs::write(
        path.join("b.txt"),
        "pkg@2.0 -> https://b.example/pkg-2.0.tar.gz\nzlib@1.3.1 -> https://zlib.net/zlib-1.3.1.tar.gz\n",
    )
    .unwrap();

    tool("merge-sources", path)
        .args(["a.txt", "b.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Merged output written to: merge_to_download.txt",
        ));

    assert_eq!(
        fs::read_to_string(path.join("merge_to_download.txt")).unwrap(),
        "pkg@1.0 -> https://a.example/pkg-1.0.tar.gz\nzlib@1.3.1 -> https://zlib.net/zlib-1.3.1.tar.gz\n"
    );

    tool("merge-sources", path)
        .args(["b.txt", "a.txt", "--output", "reversed.txt"])
        .assert()
        .success();
    let reversed = fs::read_to_string(path.join("reversed.txt")).unwrap();
    assert!(reversed.contains("pkg@2.0 -> https://b.example/pkg-2.0.tar.gz"));
}

#[test]
fn test_merge_missing_input_exits_1() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "").unwrap();

    tool("merge-sources", temp.path())
        .args(["a.txt", "missing.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.txt"));
}

#[test]
fn test_fetch_skips_without_network() {
    let temp = TempDir::new().unwrap();
    let path = temp.path();
    // Target already present, so no download is attempted
    fs::create_dir(path.join("zlib-1.3.1")).unwrap();
    fs::write(
        path.join("manifest.txt"),
        "zlib@1.3.1 -> https://zlib.net/fossils/zlib-1.3.1.tar.gz\n\
         garbage -> https://example.org/garbage.tar.gz\n\
         foo@1.0 -> https://example.org/foo-1.0.zip\n\
         \n\
         no arrow here\n",
    )
    .unwrap();

    tool("fetch-sources", path)
        .arg("manifest.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetched 0, skipped 3, failed 0"))
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_fetch_missing_manifest_exits_1() {
    let temp = TempDir::new().unwrap();
    tool("fetch-sources", temp.path())
        .arg("nope.txt")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope.txt"));
}

#[cfg(unix)]
mod with_fake_spack {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_SPACK: &str = r#"#!/bin/sh
case "$1" in
  spec)
    cat <<'OUT'
Concretized
--------------------------------
 -   hdf5@1.14.3%gcc@11.4.0+mpi
 -       ^cmake@3.27.9%gcc@11.4.0~doc
 -       ^zlib@1.3.1%gcc@11.4.0+optimize
 -       ^openmpi@4.1.6%gcc@11.4.0
 -       ^py-numpy@1.26.2%gcc@11.4.0
OUT
    ;;
  info)
    case "$2" in
      zlib@1.3.1)
        printf 'Safe versions:\n    1.3.1    https://zlib.net/fossils/zlib-1.3.1.tar.gz\n\n' ;;
      cmake@3.27.9)
        printf 'Safe versions:\n    3.27.9    https://cmake.org/files/cmake-3.27.9.tar.gz\n\n' ;;
      openmpi@4.1.6)
        printf 'Safe versions:\n    4.1.6    [git] https://github.com/open-mpi/ompi.git at commit 0123abcd\n\n' ;;
      *) exit 1 ;;
    esac
    ;;
  *) exit 2 ;;
esac
"#;

    fn install_fake_spack(dir: &Path, script: &str) -> std::path::PathBuf {
        let path = dir.join("fake-spack");
        fs::write(&path, script).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_get_sources_writes_both_manifests() {
        let temp = TempDir::new().unwrap();
        let path = temp.path();
        let spack = install_fake_spack(path, FAKE_SPACK);
        fs::write(path.join("whitelist.txt"), "# tracked\nzlib\ncmake\nopenmpi\npy-numpy\n").unwrap();
        fs::write(path.join("urls.txt"), "zlib.net\ngithub.com\n").unwrap();

        tool("get-sources", path)
            .args(["hdf5@1.14%gcc", "whitelist.txt", "urls.txt", "--spack"])
            .arg(&spack)
            .assert()
            .success()
            .stdout(
                "zlib@1.3.1 -> https://zlib.net/fossils/zlib-1.3.1.tar.gz\n\
                 openmpi@4.1.6 -> https://github.com/open-mpi/ompi.git at commit 0123abcd\n",
            );

        assert_eq!(
            fs::read_to_string(path.join("packages_parsed.hdf5_1.14_gcc.txt")).unwrap(),
            "cmake 3.27.9\nzlib 1.3.1\nopenmpi 4.1.6\npy-numpy 1.26.2\n"
        );
        assert_eq!(
            fs::read_to_string(path.join("packages_to_download.hdf5_1.14_gcc.txt")).unwrap(),
            "zlib@1.3.1 -> https://zlib.net/fossils/zlib-1.3.1.tar.gz\n\
             openmpi@4.1.6 -> https://github.com/open-mpi/ompi.git at commit 0123abcd\n"
        );
    }

    #[test]
    fn test_get_sources_resolver_failure_exits_1() {
        let temp = TempDir::new().unwrap();
        let path = temp.path();
        let spack = install_fake_spack(path, "#!/bin/sh\necho 'Error: unknown package' >&2\nexit 1\n");
        fs::write(path.join("whitelist.txt"), "zlib\n").unwrap();
        fs::write(path.join("urls.txt"), "zlib.net\n").unwrap();

        tool("get-sources", path)
            .args(["nosuchpkg", "whitelist.txt", "urls.txt"])
            .env("SPACK_BIN", &spack)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unknown"));
    }

    #[test]
    fn test_get_sources_missing_whitelist_exits_1() {
        let temp = TempDir::new().unwrap();
        let path = temp.path();
        let spack = install_fake_spack(path, FAKE_SPACK);
        fs::write(path.join("urls.txt"), "zlib.net\n").unwrap();

        tool("get-sources", path)
            .args(["hdf5", "whitelist.txt", "urls.txt", "--spack"])
            .arg(&spack)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("whitelist.txt"));
        assert!(!path.join("packages_parsed.hdf5.txt").exists());
    }
}
