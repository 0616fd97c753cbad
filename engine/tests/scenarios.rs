//! Integration tests replaying the six literal scenarios from spec.md §8,
//! each against a fresh in-memory [`RusqliteStore`]-backed [`FileSystem`].

use engine::{
    CreateOptions, EngineConfig, EngineError, FileSystem, ListDirOptions, MkdirOptions, ReadOptions,
    WriteFileOptions, WriteOptions,
};
use storage::RusqliteStore;

fn fs() -> FileSystem<RusqliteStore> {
    let _ = env_logger::try_init();
    FileSystem::new(
        RusqliteStore::open_in_memory().unwrap(),
        EngineConfig {
            chunk_size: 8,
            ..EngineConfig::default()
        },
    )
    .unwrap()
}

/// `mkdir("/a"); writeFile("/a/t", "Buy milk"); readFile("/a/t") == "Buy milk"`.
#[test]
fn scenario_1_write_file_then_read() {
    let mut fs = fs();
    fs.mkdir("/a", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/a/t", b"Buy milk", WriteFileOptions::default())
        .unwrap();
    assert_eq!(fs.read_file("/a/t").unwrap(), b"Buy milk");
    assert_eq!(fs.stat("/a/t").unwrap().size, 8);

    engine::invariants::check(&fs).unwrap().assert_none();
}

/// Following (1): `write("/a/t", "\nCall Alice", {offset: 8})`.
#[test]
fn scenario_2_straddling_write() {
    let mut fs = fs();
    fs.mkdir("/a", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/a/t", b"Buy milk", WriteFileOptions::default())
        .unwrap();
    fs.write("/a/t", b"\nCall Alice", WriteOptions { offset: 8 })
        .unwrap();

    assert_eq!(fs.read_file("/a/t").unwrap(), b"Buy milk\nCall Alice");
    assert_eq!(fs.stat("/a/t").unwrap().size, 19);

    engine::invariants::check(&fs).unwrap().assert_none();
}

/// Following (2): `read("/a/t", {offset:4, length:4}) == "milk"`.
#[test]
fn scenario_3_partial_read() {
    let mut fs = fs();
    fs.mkdir("/a", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/a/t", b"Buy milk", WriteFileOptions::default())
        .unwrap();
    fs.write("/a/t", b"\nCall Alice", WriteOptions { offset: 8 })
        .unwrap();

    let out = fs
        .read(
            "/a/t",
            ReadOptions {
                offset: 4,
                length: Some(4),
            },
        )
        .unwrap();
    assert_eq!(out, b"milk");
}

/// `setDeviceSize(10); writeFile("/big", 11-byte buffer)` → `ENOSPC`;
/// `stat("/big")` → `ENOENT`; `space_used` unchanged by the rejected write.
///
/// The literal scenario narrates `space_used == 19 (unchanged from
/// scenario 2)`, chaining from scenarios 1-2's shared example. Replaying
/// that literally is self-contradictory here: `set_device_size` itself
/// refuses to shrink below bytes already in use (spec.md §4.5), so a
/// device already holding 19 bytes can never be set to 10. What the
/// scenario actually demonstrates — a rejected preflight leaves
/// `space_used` untouched (spec.md §3 invariant P6) — is captured
/// directly: a device sized to 10 from the start, not shrunk into that
/// state.
#[test]
fn scenario_4_enospc_leaves_state_unchanged() {
    let mut fs = FileSystem::new(
        RusqliteStore::open_in_memory().unwrap(),
        EngineConfig {
            chunk_size: 8,
            device_size: 10,
        },
    )
    .unwrap();

    let result = fs.write_file_bytes("/big", &[0u8; 11], WriteFileOptions::default());
    assert!(matches!(result, Err(EngineError::Enospc)));
    assert!(matches!(fs.stat("/big"), Err(EngineError::Enoent)));
    assert_eq!(fs.device_stats().unwrap().space_used, 0);

    engine::invariants::check(&fs).unwrap().assert_none();
}

/// `writeFile("/a/t.uploading", <stream of 3 × 8-byte chunks>);
/// rename("/a/t.uploading", "/a/t")` → `/a/t` now holds 24 bytes; the
/// prior file's chunks are reclaimed and `space_used` reflects 24.
#[test]
fn scenario_5_upload_then_rename() {
    let mut fs = fs();
    fs.mkdir("/a", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/a/t", b"Buy milk\nCall Alice", WriteFileOptions::default())
        .unwrap();
    assert_eq!(fs.device_stats().unwrap().space_used, 19);

    let chunks: Vec<engine::Result<Vec<u8>>> = vec![
        Ok(b"aaaaaaaa".to_vec()),
        Ok(b"bbbbbbbb".to_vec()),
        Ok(b"cccccccc".to_vec()),
    ];
    fs.write_file("/a/t.uploading", chunks, WriteFileOptions::default())
        .unwrap();
    fs.rename("/a/t.uploading", "/a/t").unwrap();

    assert_eq!(fs.read_file("/a/t").unwrap().len(), 24);
    assert_eq!(fs.device_stats().unwrap().space_used, 24);

    engine::invariants::check(&fs).unwrap().assert_none();
}

/// `mkdir("/d"); writeFile("/d/f", "x"); rmdir("/d")` → `ENOTEMPTY`;
/// `unlink("/d/f"); rmdir("/d")` → success; `listDir("/")` does not
/// contain `d`.
#[test]
fn scenario_6_rmdir_requires_empty() {
    let mut fs = fs();
    fs.mkdir("/d", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/d/f", b"x", WriteFileOptions::default())
        .unwrap();

    assert!(matches!(
        fs.rmdir("/d", engine::RmdirOptions::default()),
        Err(EngineError::Enotempty)
    ));

    fs.unlink("/d/f").unwrap();
    fs.rmdir("/d", engine::RmdirOptions::default()).unwrap();

    let root = fs.list_dir("/", ListDirOptions::default()).unwrap();
    assert!(!root.iter().any(|e| e.name == "d"));

    engine::invariants::check(&fs).unwrap().assert_none();
}

/// L2: `mkdir(p); rmdir(p)` returns `listDir` to its prior state.
#[test]
fn law_2_mkdir_rmdir_is_idempotent_on_listing() {
    let mut fs = fs();
    let before = fs.list_dir("/", ListDirOptions::default()).unwrap();
    fs.mkdir("/tmp", MkdirOptions::default()).unwrap();
    fs.rmdir("/tmp", engine::RmdirOptions::default()).unwrap();
    let after = fs.list_dir("/", ListDirOptions::default()).unwrap();

    let before_names: Vec<_> = before.iter().map(|e| e.name.clone()).collect();
    let after_names: Vec<_> = after.iter().map(|e| e.name.clone()).collect();
    assert_eq!(before_names, after_names);
}

/// L3: after `rename(a, b)` succeeds, `stat(a)` = ENOENT and `stat(b)` =
/// pre-rename `stat(a)` with updated name.
#[test]
fn law_3_rename_atomicity() {
    let mut fs = fs();
    fs.create("/a", CreateOptions::default()).unwrap();
    fs.write("/a", b"payload!", WriteOptions::default()).unwrap();
    let before = fs.stat("/a").unwrap();

    fs.rename("/a", "/b").unwrap();

    assert!(matches!(fs.stat("/a"), Err(EngineError::Enoent)));
    let after = fs.stat("/b").unwrap();
    assert_eq!(after.size, before.size);
    assert_eq!(after.mode, before.mode);
}

/// L4: `getDeviceStats().spaceUsed` equals the sum of sizes of all files
/// reachable from root.
#[test]
fn law_4_space_used_matches_reachable_file_sizes() {
    let mut fs = fs();
    fs.mkdir("/a", MkdirOptions::default()).unwrap();
    fs.write_file_bytes("/a/one", b"12345", WriteFileOptions::default())
        .unwrap();
    fs.write_file_bytes("/a/two", b"1234567890", WriteFileOptions::default())
        .unwrap();

    let mut total = 0u64;
    for entry in fs.list_dir("/a", ListDirOptions::default()).unwrap() {
        if entry.name == "." || entry.name == ".." {
            continue;
        }
        total += fs.stat(&format!("/a/{}", entry.name)).unwrap().size;
    }
    assert_eq!(fs.device_stats().unwrap().space_used, total);
}
