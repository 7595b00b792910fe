//! Canonical JSON and atomic writes.
//! - Objects: keys sorted lexicographically (UTF-8 byte order), whatever the
//!   insertion order of the source map
//! - Arrays: order preserved (caller is responsible for stable ordering)
//! - Strings and keys: escaped by serde_json
//! - Output: compact, no trailing newline
//! - Atomic write: every file is staged in a temp file next to its target;
//!   targets are renamed into place only after all stages succeeded

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::{IoError, IoResult};

/// Canonical bytes of an already-built JSON value.
pub fn to_canonical_json_bytes(v: &Value) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(1024);
    write_canonical_value(v, &mut out)?;
    Ok(out)
}

/// Canonical bytes of any serializable value.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    to_canonical_json_bytes(&v)
}

struct Staged<'a> {
    tmp: PathBuf,
    path: &'a Path,
    bytes: &'a [u8],
}

/// Write every `(path, bytes)` pair, or none of them.
///
/// A failure while staging removes the temp files. A failure while renaming
/// also removes the targets this call already put in place.
pub fn write_all_atomic(files: &[(&Path, &[u8])]) -> IoResult<()> {
    let mut staged: Vec<Staged<'_>> = Vec::with_capacity(files.len());
    for &(path, bytes) in files {
        match stage(path, bytes) {
            Ok(tmp) => staged.push(Staged { tmp, path, bytes }),
            Err(e) => {
                for s in &staged {
                    let _ = fs::remove_file(&s.tmp);
                }
                return Err(e);
            }
        }
    }

    for (i, s) in staged.iter().enumerate() {
        if let Err(e) = commit(s) {
            for done in &staged[..i] {
                let _ = fs::remove_file(done.path);
            }
            for pending in &staged[i + 1..] {
                let _ = fs::remove_file(&pending.tmp);
            }
            return Err(e);
        }
    }
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn stage(path: &Path, bytes: &[u8]) -> IoResult<PathBuf> {
    if path.is_dir() {
        return Err(IoError::Path(format!("{}: is a directory", path.display())));
    }
    let parent = parent_dir(path);
    fs::create_dir_all(&parent)
        .map_err(|e| IoError::Path(format!("{}: {e}", parent.display())))?;

    let tmp = make_unique_tmp_path(&parent, path);
    let written = (|| -> std::io::Result<()> {
        let mut tf = OpenOptions::new().write(true).create_new(true).open(&tmp)?;
        tf.write_all(bytes)?;
        tf.sync_all()
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(IoError::Path(format!("{}: {e}", path.display())));
    }
    Ok(tmp)
}

/// Rename into place; direct write as a fallback when rename fails (cross-device).
fn commit(s: &Staged<'_>) -> IoResult<()> {
    if fs::rename(&s.tmp, s.path).is_err() {
        let direct = (|| -> std::io::Result<()> {
            let mut f = OpenOptions::new().write(true).create(true).truncate(true).open(s.path)?;
            f.write_all(s.bytes)?;
            f.sync_all()
        })();
        let _ = fs::remove_file(&s.tmp);
        direct.map_err(|e| IoError::Path(format!("{}: {e}", s.path.display())))?;
    }
    let _ = fsync_dir(&parent_dir(s.path));
    Ok(())
}

fn write_canonical_value(v: &Value, out: &mut Vec<u8>) -> IoResult<()> {
    match v {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => out.extend_from_slice(n.to_string().as_bytes()),
        Value::String(s) => out.extend_from_slice(serde_json::to_string(s)?.as_bytes()),
        Value::Array(arr) => {
            out.push(b'[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical_value(elem, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            out.push(b'{');
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (i, (k, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                out.extend_from_slice(serde_json::to_string(k)?.as_bytes());
                out.push(b':');
                write_canonical_value(val, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

/// "<filename>.<pid>.<counter>.tmp" inside `dir`.
fn make_unique_tmp_path(dir: &Path, target: &Path) -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let pid = std::process::id();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let fname = target.file_name().and_then(|s| s.to_str()).unwrap_or("file");
    dir.join(format!("{fname}.{pid}.{n}.tmp"))
}

#[cfg(unix)]
fn fsync_dir(dir: &Path) -> std::io::Result<()> {
    OpenOptions::new().read(true).open(dir)?.sync_all()
}

#[cfg(not(unix))]
#[inline]
fn fsync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn objects_are_sorted_arrays_preserved() {
        let v = json!({
            "b": 1,
            "a": { "y": 1, "x": 2 },
            "arr": [ {"k":2,"j":1}, 3, "z" ]
        });
        let s = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(s, r#"{"a":{"x":2,"y":1},"arr":[{"j":1,"k":2},3,"z"],"b":1}"#);
    }

    #[test]
    fn strings_escape_like_serde_json() {
        let v = json!({"név": "Mi \"Hazánk\"\n\u{1}"});
        let ours = String::from_utf8(to_canonical_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(ours, serde_json::to_string(&v).unwrap());
    }

    #[test]
    fn atomic_write_creates_dirs_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let bytes = to_canonical_bytes(&json!({"z": 1, "a": [1.5]})).unwrap();
        write_all_atomic(&[(path.as_path(), bytes.as_slice())]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"a":[1.5],"z":1}"#);

        write_all_atomic(&[(path.as_path(), &b"x"[..])]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"x");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn one_bad_target_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("districts.csv");
        let bad = dir.path().join("record");
        fs::create_dir(&bad).unwrap();

        let files = [(good.as_path(), &b"a"[..]), (bad.as_path(), &b"b"[..])];
        let err = write_all_atomic(&files).unwrap_err();
        assert!(matches!(err, IoError::Path(_)));
        assert!(!good.exists());
        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![std::ffi::OsString::from("record")]);
    }
}
